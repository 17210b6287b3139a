//! Settle pool instruction - permissionless accumulator update
//! Mints the pool's emission since the last settlement into reward custody

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::FarmError;
use crate::events::PoolSettled;
use crate::farm::{self, Tick};
use crate::state::*;
use crate::token_ledger::SplTokenLedger;

pub fn handler(ctx: Context<SettlePool>) -> Result<()> {
  let tick = Tick::now()?;

  let reward_mint_key = ctx.accounts.farm.reward_mint;
  let bump = [ctx.accounts.farm.bump];
  let seeds: &[&[u8]] = &[FARM_SEED, reward_mint_key.as_ref(), &bump];
  let signer = &[seeds];

  let mut rewards = SplTokenLedger::new(
    ctx.accounts.token_program.to_account_info(),
    &ctx.accounts.reward_mint,
    ctx.accounts.reward_vault.to_account_info(),
    ctx.accounts.farm.to_account_info(),
    signer,
  )
  .with_supply_cap(ctx.accounts.farm.reward_cap);

  let emission = farm::settle_pool(&ctx.accounts.farm, &mut ctx.accounts.pool, tick, &mut rewards)?;

  msg!("Pool settled at block {}: minted {}", tick.block, emission);

  emit!(PoolSettled {
    pool: ctx.accounts.pool.key(),
    emission,
    acc_reward_per_unit: ctx.accounts.pool.acc_reward_per_unit,
    block: tick.block,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct SettlePool<'info> {
  #[account(
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
    has_one = reward_mint @ FarmError::InvalidAccountState,
    has_one = reward_vault @ FarmError::InvalidAccountState,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  #[account(
    mut,
    seeds = [POOL_SEED, farm.key().as_ref(), pool.stake_mint.as_ref()],
    bump = pool.bump,
    has_one = farm @ FarmError::InvalidAccountState,
  )]
  pub pool: Box<Account<'info, Pool>>,

  #[account(mut)]
  pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

  #[account(mut)]
  pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
}
