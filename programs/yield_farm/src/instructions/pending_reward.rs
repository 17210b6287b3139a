//! Pending reward view - raw reward a position could harvest at the current slot

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FarmError;
use crate::farm::{self, Tick};
use crate::state::*;

pub fn handler(ctx: Context<PendingReward>) -> Result<u64> {
  let tick = Tick::now()?;
  let pending = farm::pending_reward(&ctx.accounts.farm, &ctx.accounts.pool, &ctx.accounts.position, tick)?;

  msg!("Pending at block {}: {}", tick.block, pending);
  Ok(pending)
}

#[derive(Accounts)]
pub struct PendingReward<'info> {
  #[account(
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  #[account(
    seeds = [POOL_SEED, farm.key().as_ref(), pool.stake_mint.as_ref()],
    bump = pool.bump,
    has_one = farm @ FarmError::InvalidAccountState,
  )]
  pub pool: Box<Account<'info, Pool>>,

  #[account(
    constraint = position.pool == pool.key() @ FarmError::InvalidAccountState,
  )]
  pub position: Box<Account<'info, UserPosition>>,
}
