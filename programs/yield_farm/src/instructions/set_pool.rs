//! Set pool instruction - reweights, reprices or (de)activates a pool
//! The pool is settled under its old weight before anything changes. Every other pool of
//! the farm is passed as a remaining account, already settled at the current slot.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::FarmError;
use crate::events::PoolUpdated;
use crate::farm::{self, PoolParams, Tick};
use crate::instructions::admin::load_farm_pools;
use crate::state::*;
use crate::token_ledger::SplTokenLedger;

pub fn handler<'info>(
  ctx: Context<'_, '_, 'info, 'info, SetPool<'info>>,
  params: PoolParams,
  active: bool,
) -> Result<()> {
  let tick = Tick::now()?;
  let old_alloc_weight = ctx.accounts.pool.alloc_weight;

  let siblings = load_farm_pools(&ctx.accounts.farm.key(), ctx.remaining_accounts)?;
  let siblings: Vec<&Pool> = siblings.iter().map(|pool| &**pool).collect();

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

  let settled_emission = farm::set_pool(
    &mut ctx.accounts.farm,
    &mut ctx.accounts.pool,
    &siblings,
    tick,
    params,
    active,
    &mut rewards,
  )?;

  emit!(PoolUpdated {
    pool: ctx.accounts.pool.key(),
    old_alloc_weight,
    new_alloc_weight: params.alloc_weight,
    total_alloc_weight: ctx.accounts.farm.total_alloc_weight,
    active,
    settled_emission,
    block: tick.block,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct SetPool<'info> {
  pub authority: Signer<'info>,

  #[account(
    mut,
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
    has_one = authority @ FarmError::Unauthorized,
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
