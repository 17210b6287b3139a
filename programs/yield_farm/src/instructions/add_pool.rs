//! Add pool instruction - registers a stakeable asset with its allocation weight
//! Existing pools are passed as remaining accounts, already settled at the current slot

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::FarmError;
use crate::events::PoolAdded;
use crate::farm::{self, PoolParams, Tick};
use crate::instructions::admin::load_farm_pools;
use crate::state::*;

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, AddPool<'info>>, params: PoolParams) -> Result<()> {
  let tick = Tick::now()?;
  let existing = load_farm_pools(&ctx.accounts.farm.key(), ctx.remaining_accounts)?;
  let existing: Vec<&Pool> = existing.iter().map(|pool| &**pool).collect();

  let pool = &mut ctx.accounts.pool;
  pool.farm = ctx.accounts.farm.key();
  pool.stake_mint = ctx.accounts.stake_mint.key();
  pool.stake_vault = ctx.accounts.stake_vault.key();
  pool.fee_account = ctx.accounts.fee_account.key();
  pool.bump = ctx.bumps.pool;
  pool.vault_bump = ctx.bumps.stake_vault;

  farm::add_pool(&mut ctx.accounts.farm, &mut ctx.accounts.pool, &existing, tick, params)?;

  msg!("Stake mint: {}", ctx.accounts.stake_mint.key());
  msg!("Fees: withdrawal {}bps, penalty {}bps over {}s", params.withdrawal_fee_bps, params.penalty_bps, params.min_stake_time);

  emit!(PoolAdded {
    farm: ctx.accounts.farm.key(),
    pool: ctx.accounts.pool.key(),
    stake_mint: ctx.accounts.stake_mint.key(),
    alloc_weight: params.alloc_weight,
    total_alloc_weight: ctx.accounts.farm.total_alloc_weight,
    withdrawal_fee_bps: params.withdrawal_fee_bps,
    penalty_bps: params.penalty_bps,
    min_stake_time: params.min_stake_time,
    block: tick.block,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct AddPool<'info> {
  #[account(mut)]
  pub authority: Signer<'info>,

  #[account(
    mut,
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
    has_one = authority @ FarmError::Unauthorized,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Pool PDA - one per (farm, stake mint)
  #[account(
    init,
    payer = authority,
    space = Pool::LEN,
    seeds = [POOL_SEED, farm.key().as_ref(), stake_mint.key().as_ref()],
    bump
  )]
  pub pool: Box<Account<'info, Pool>>,

  /// Stake custody, owned by the farm PDA
  #[account(
    init,
    payer = authority,
    seeds = [STAKE_VAULT_SEED, pool.key().as_ref()],
    bump,
    token::mint = stake_mint,
    token::authority = farm,
    token::token_program = token_program,
  )]
  pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

  /// Receives withdrawal fees and early-withdrawal penalties
  #[account(
    token::mint = stake_mint,
    token::token_program = token_program,
  )]
  pub fee_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
  pub system_program: Program<'info, System>,
}
