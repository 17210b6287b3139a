//! Emergency withdraw instruction - principal back, no settlement, pending reward forfeited
//! Needs no reward accounts, so it works even when reward minting is blocked

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::FarmError;
use crate::events::EmergencyWithdrawn;
use crate::farm;
use crate::state::*;
use crate::token_ledger::SplTokenLedger;

pub fn handler(ctx: Context<EmergencyWithdraw>) -> Result<()> {
  let reward_mint_key = ctx.accounts.farm.reward_mint;
  let bump = [ctx.accounts.farm.bump];
  let seeds: &[&[u8]] = &[FARM_SEED, reward_mint_key.as_ref(), &bump];
  let signer = &[seeds];

  let mut stake = SplTokenLedger::new(
    ctx.accounts.token_program.to_account_info(),
    &ctx.accounts.stake_mint,
    ctx.accounts.stake_vault.to_account_info(),
    ctx.accounts.farm.to_account_info(),
    signer,
  )
  .with_counterparty(ctx.accounts.user_stake_account.to_account_info());

  let recipient = ctx.accounts.user_stake_account.key();

  let amount = farm::emergency_withdraw(
    &mut ctx.accounts.farm,
    &mut ctx.accounts.pool,
    &mut ctx.accounts.position,
    &recipient,
    &mut stake,
  )?;

  emit!(EmergencyWithdrawn {
    user: ctx.accounts.user.key(),
    pool: ctx.accounts.pool.key(),
    amount,
    timestamp: Clock::get()?.unix_timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
  pub user: Signer<'info>,

  #[account(
    mut,
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  #[account(
    mut,
    seeds = [POOL_SEED, farm.key().as_ref(), stake_mint.key().as_ref()],
    bump = pool.bump,
    has_one = farm @ FarmError::InvalidAccountState,
    has_one = stake_mint @ FarmError::InvalidAccountState,
    has_one = stake_vault @ FarmError::InvalidAccountState,
  )]
  pub pool: Box<Account<'info, Pool>>,

  #[account(
    mut,
    seeds = [POSITION_SEED, pool.key().as_ref(), user.key().as_ref()],
    bump = position.bump,
    constraint = position.owner == user.key() @ FarmError::Unauthorized,
  )]
  pub position: Box<Account<'info, UserPosition>>,

  pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

  #[account(mut)]
  pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

  #[account(
    mut,
    token::mint = stake_mint,
    token::authority = user,
  )]
  pub user_stake_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
}
