//! Withdraw instruction - unstakes part or all of a position
//! Harvest is paid first; withdrawal fee and early-exit penalty go to the pool's fee account

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::FarmError;
use crate::events::Withdrawn;
use crate::farm::{self, Depositor, Tick};
use crate::state::*;
use crate::token_ledger::SplTokenLedger;

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
  let tick = Tick::now()?;

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
  .with_counterparty(ctx.accounts.user_stake_account.to_account_info())
  .with_counterparty(ctx.accounts.fee_account.to_account_info());

  let mut rewards = SplTokenLedger::new(
    ctx.accounts.token_program.to_account_info(),
    &ctx.accounts.reward_mint,
    ctx.accounts.reward_vault.to_account_info(),
    ctx.accounts.farm.to_account_info(),
    signer,
  )
  .with_counterparty(ctx.accounts.user_reward_account.to_account_info())
  .with_counterparty(ctx.accounts.reward_fee_account.to_account_info())
  .with_supply_cap(ctx.accounts.farm.reward_cap);

  let depositor = Depositor {
    stake_account: ctx.accounts.user_stake_account.key(),
    reward_account: ctx.accounts.user_reward_account.key(),
  };

  let receipt = farm::withdraw(
    &mut ctx.accounts.farm,
    &mut ctx.accounts.pool,
    &mut ctx.accounts.position,
    tick,
    amount,
    &depositor,
    &mut stake,
    &mut rewards,
  )?;

  msg!("Position remaining: {}", ctx.accounts.position.amount);

  emit!(Withdrawn {
    user: ctx.accounts.user.key(),
    pool: ctx.accounts.pool.key(),
    amount,
    fee: receipt.fee,
    penalty: receipt.penalty,
    returned: receipt.returned,
    reward_paid: receipt.harvest.paid,
    pool_total_staked: ctx.accounts.pool.total_staked,
    timestamp: tick.timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
  #[account(mut)]
  pub user: Signer<'info>,

  #[account(
    mut,
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
    has_one = reward_mint @ FarmError::InvalidAccountState,
    has_one = reward_vault @ FarmError::InvalidAccountState,
    has_one = reward_fee_account @ FarmError::InvalidAccountState,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  #[account(
    mut,
    seeds = [POOL_SEED, farm.key().as_ref(), stake_mint.key().as_ref()],
    bump = pool.bump,
    has_one = farm @ FarmError::InvalidAccountState,
    has_one = stake_mint @ FarmError::InvalidAccountState,
    has_one = stake_vault @ FarmError::InvalidAccountState,
    has_one = fee_account @ FarmError::InvalidAccountState,
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

  #[account(mut)]
  pub fee_account: Box<InterfaceAccount<'info, TokenAccount>>,

  #[account(mut)]
  pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

  #[account(mut)]
  pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

  #[account(mut)]
  pub reward_fee_account: Box<InterfaceAccount<'info, TokenAccount>>,

  #[account(
    init_if_needed,
    payer = user,
    associated_token::mint = reward_mint,
    associated_token::authority = user,
    associated_token::token_program = token_program,
  )]
  pub user_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
  pub associated_token_program: Program<'info, AssociatedToken>,
  pub system_program: Program<'info, System>,
}
