//! Farm controller - deposit, withdraw, harvest and pool administration
//!
//! Every action follows the same shape:
//! 1. validate inputs against the current state
//! 2. stage copies of farm / pool / position and run all checked math on them
//!    (settle first, then record_stake_change, then multipliers and fees)
//! 3. move tokens through the `TokenLedger`s
//! 4. commit the staged copies
//!
//! Balances are checked up front, so the reward mint is the only ledger call that can
//! still fail in step 3, and it runs first. Any error before step 4 leaves the caller's
//! state and every ledger balance exactly as they were.

use anchor_lang::prelude::*;

use crate::error::FarmError;
use crate::invariants::*;
use crate::ledger;
use crate::math::{apply_fee, percent_of};
use crate::state::{FarmConfig, MultiplierEngine, Pool, UserPosition};
use crate::token_ledger::TokenLedger;
use crate::yield_model::early_withdrawal_penalty;

/// Block height and wall-clock time of the current action
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
  pub block: u64,
  pub timestamp: i64,
}

impl Tick {
  pub fn new(block: u64, timestamp: i64) -> Self {
    Self { block, timestamp }
  }

  /// Read slot and unix timestamp from the Clock sysvar
  pub fn now() -> Result<Self> {
    let clock = Clock::get()?;
    Ok(Self::new(clock.slot, clock.unix_timestamp))
  }
}

/// Depositor's token accounts for the staked and the reward asset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Depositor {
  pub stake_account: Pubkey,
  pub reward_account: Pubkey,
}

/// Administrative pool parameters
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolParams {
  pub alloc_weight: u64,
  pub withdrawal_fee_bps: u64,
  pub penalty_bps: u64,
  pub min_stake_time: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestReceipt {
  /// Ledger reward before multipliers
  pub raw: u64,
  /// After tier, market and health multipliers
  pub boosted: u64,
  /// Protocol fee skimmed from `boosted`
  pub fee: u64,
  /// Delivered to the depositor
  pub paid: u64,
}

impl HarvestReceipt {
  /// Reward minted on top of the pool emission
  pub fn bonus(&self) -> u64 {
    self.boosted.saturating_sub(self.raw)
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositReceipt {
  pub harvest: HarvestReceipt,
  pub deposited: u64,
  pub staked: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawReceipt {
  pub harvest: HarvestReceipt,
  pub withdrawn: u64,
  pub fee: u64,
  pub penalty: u64,
  pub returned: u64,
}

/// Price a raw reward: multipliers, ceiling check, protocol fee
pub fn quote_harvest(
  engine: &MultiplierEngine,
  protocol_fee_bps: u64,
  tier: u8,
  raw: u64,
  elapsed_since_start: u64,
) -> Result<HarvestReceipt> {
  let boosted = engine.final_yield(raw, tier, elapsed_since_start)?;
  assert_within_multiplier_ceiling(raw, boosted)?;

  let (paid, fee) = apply_fee(boosted, protocol_fee_bps)?;
  Ok(HarvestReceipt { raw, boosted, fee, paid })
}

fn credit_harvest(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  position: &mut UserPosition,
  receipt: &HarvestReceipt,
) -> Result<()> {
  farm.bonus_minted = farm
    .bonus_minted
    .checked_add(receipt.bonus())
    .ok_or(FarmError::ArithmeticOverflow)?;
  pool.reward_paid = pool
    .reward_paid
    .checked_add(receipt.raw)
    .ok_or(FarmError::ArithmeticOverflow)?;
  position.total_claimed = position
    .total_claimed
    .checked_add(receipt.paid)
    .ok_or(FarmError::ArithmeticOverflow)?;
  Ok(())
}

/// Mint the settled emission plus the multiplier bonus into custody, then pay out
fn pay_rewards<R: TokenLedger>(
  rewards: &mut R,
  emission: u64,
  receipt: &HarvestReceipt,
  recipient: &Pubkey,
  fee_account: &Pubkey,
) -> Result<()> {
  let custody = rewards.custody();
  let to_mint = emission
    .checked_add(receipt.bonus())
    .ok_or(FarmError::ArithmeticOverflow)?;

  let available = rewards.balance_of(&custody).saturating_add(to_mint);
  assert_custody_covers(available, receipt.boosted)?;

  rewards.mint(&custody, to_mint)?;
  rewards.transfer(recipient, receipt.paid)?;
  rewards.transfer(fee_account, receipt.fee)?;
  Ok(())
}

// USER ACTIONS

/// Stake `amount` into `pool` under `tier`, harvesting anything already earned.
#[allow(clippy::too_many_arguments)]
pub fn deposit<S: TokenLedger, R: TokenLedger>(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  position: &mut UserPosition,
  tick: Tick,
  amount: u64,
  tier: u8,
  depositor: &Depositor,
  stake: &mut S,
  rewards: &mut R,
) -> Result<DepositReceipt> {
  require!(amount > 0, FarmError::ZeroAmount);
  require!(pool.active, FarmError::InactivePool);
  require!(farm.engine.tier(tier)?.active, FarmError::InactiveTier);
  require!(position.amount == 0 || position.tier == tier, FarmError::TierLocked);
  require!(stake.balance_of(&depositor.stake_account) >= amount, FarmError::InsufficientFunds);

  let mut next_farm = farm.clone();
  let mut next_pool = pool.clone();
  let mut next_position = position.clone();

  let emission = ledger::settle(&mut next_pool, tick.block, farm.emission_per_block, farm.total_alloc_weight)?;

  let old_amount = position.amount;
  let new_amount = old_amount.checked_add(amount).ok_or(FarmError::ArithmeticOverflow)?;
  let elapsed = position.elapsed_since_deposit(tick.timestamp);

  let raw = ledger::record_stake_change(&mut next_pool, &mut next_position, tick.block, new_amount)?;
  let harvest = quote_harvest(&farm.engine, farm.protocol_fee_bps, position.tier, raw, elapsed)?;
  credit_harvest(&mut next_farm, &mut next_pool, &mut next_position, &harvest)?;

  if old_amount == 0 {
    next_farm.engine.open_position(tier)?;
    next_pool.depositor_count = next_pool
      .depositor_count
      .checked_add(1)
      .ok_or(FarmError::ArithmeticOverflow)?;
  }
  next_farm.engine.record_stake_delta(old_amount, new_amount)?;

  next_position.tier = tier;
  next_position.deposit_timestamp = tick.timestamp;

  assert_accumulator_monotonic(pool.acc_reward_per_unit, next_pool.acc_reward_per_unit)?;

  pay_rewards(rewards, emission, &harvest, &depositor.reward_account, &farm.reward_fee_account)?;
  stake.collect(&depositor.stake_account, amount)?;

  msg!("Deposited {} (tier {}), position now {}", amount, tier, new_amount);
  if harvest.raw > 0 {
    msg!("Harvested {} raw -> {} boosted, fee {}", harvest.raw, harvest.boosted, harvest.fee);
  }

  *farm = next_farm;
  *pool = next_pool;
  *position = next_position;

  Ok(DepositReceipt {
    harvest,
    deposited: amount,
    staked: new_amount,
  })
}

/// Unstake `amount`, harvesting first; withdrawal fee and any early-exit penalty
/// go to the pool's fee account.
#[allow(clippy::too_many_arguments)]
pub fn withdraw<S: TokenLedger, R: TokenLedger>(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  position: &mut UserPosition,
  tick: Tick,
  amount: u64,
  depositor: &Depositor,
  stake: &mut S,
  rewards: &mut R,
) -> Result<WithdrawReceipt> {
  require!(amount > 0, FarmError::ZeroAmount);
  require!(amount <= position.amount, FarmError::InsufficientStake);
  assert_custody_covers(stake.balance_of(&stake.custody()), amount)?;

  let mut next_farm = farm.clone();
  let mut next_pool = pool.clone();
  let mut next_position = position.clone();

  let emission = ledger::settle(&mut next_pool, tick.block, farm.emission_per_block, farm.total_alloc_weight)?;

  let old_amount = position.amount;
  let new_amount = old_amount - amount;
  let elapsed = position.elapsed_since_deposit(tick.timestamp);

  let raw = ledger::record_stake_change(&mut next_pool, &mut next_position, tick.block, new_amount)?;
  let harvest = quote_harvest(&farm.engine, farm.protocol_fee_bps, position.tier, raw, elapsed)?;
  credit_harvest(&mut next_farm, &mut next_pool, &mut next_position, &harvest)?;

  let fee = percent_of(amount, pool.withdrawal_fee_bps)?;
  let penalty = early_withdrawal_penalty(amount, pool.penalty_bps, elapsed, pool.min_stake_time)?;
  let total_fee = fee.checked_add(penalty).ok_or(FarmError::ArithmeticOverflow)?;
  let returned = amount.checked_sub(total_fee).ok_or(FarmError::ArithmeticOverflow)?;

  if new_amount == 0 {
    next_farm.engine.close_position(position.tier)?;
    next_pool.depositor_count = next_pool.depositor_count.saturating_sub(1);
  }
  next_farm.engine.record_stake_delta(old_amount, new_amount)?;

  assert_accumulator_monotonic(pool.acc_reward_per_unit, next_pool.acc_reward_per_unit)?;

  pay_rewards(rewards, emission, &harvest, &depositor.reward_account, &farm.reward_fee_account)?;
  stake.transfer(&depositor.stake_account, returned)?;
  stake.transfer(&pool.fee_account, total_fee)?;

  msg!("Withdrew {}: fee {}, penalty {}, returned {}", amount, fee, penalty, returned);

  *farm = next_farm;
  *pool = next_pool;
  *position = next_position;

  Ok(WithdrawReceipt {
    harvest,
    withdrawn: amount,
    fee,
    penalty,
    returned,
  })
}

/// Claim the boosted reward without touching the stake
pub fn harvest<R: TokenLedger>(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  position: &mut UserPosition,
  tick: Tick,
  recipient: &Pubkey,
  rewards: &mut R,
) -> Result<HarvestReceipt> {
  let mut next_farm = farm.clone();
  let mut next_pool = pool.clone();
  let mut next_position = position.clone();

  let emission = ledger::settle(&mut next_pool, tick.block, farm.emission_per_block, farm.total_alloc_weight)?;

  let elapsed = position.elapsed_since_deposit(tick.timestamp);
  let raw = ledger::record_stake_change(&mut next_pool, &mut next_position, tick.block, position.amount)?;
  let receipt = quote_harvest(&farm.engine, farm.protocol_fee_bps, position.tier, raw, elapsed)?;
  credit_harvest(&mut next_farm, &mut next_pool, &mut next_position, &receipt)?;

  assert_accumulator_monotonic(pool.acc_reward_per_unit, next_pool.acc_reward_per_unit)?;

  pay_rewards(rewards, emission, &receipt, recipient, &farm.reward_fee_account)?;

  msg!("Harvested {} raw -> {} boosted, paid {}, fee {}", receipt.raw, receipt.boosted, receipt.paid, receipt.fee);

  *farm = next_farm;
  *pool = next_pool;
  *position = next_position;

  Ok(receipt)
}

/// Return the full principal with no settlement. Pending reward is forfeited.
pub fn emergency_withdraw<S: TokenLedger>(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  position: &mut UserPosition,
  recipient: &Pubkey,
  stake: &mut S,
) -> Result<u64> {
  let amount = position.amount;
  require!(amount > 0, FarmError::ZeroAmount);

  let mut next_farm = farm.clone();
  let mut next_pool = pool.clone();
  let mut next_position = position.clone();

  next_pool.total_staked = next_pool
    .total_staked
    .checked_sub(amount)
    .ok_or(FarmError::InvalidAccountState)?;
  next_pool.depositor_count = next_pool.depositor_count.saturating_sub(1);
  next_position.amount = 0;
  next_position.reward_debt = 0;

  next_farm.engine.close_position(position.tier)?;
  next_farm.engine.record_stake_delta(amount, 0)?;

  stake.transfer(recipient, amount)?;

  msg!("Emergency withdrawal of {}, pending reward forfeited", amount);

  *farm = next_farm;
  *pool = next_pool;
  *position = next_position;

  Ok(amount)
}

/// Raw reward the position could harvest at `tick`
pub fn pending_reward(farm: &FarmConfig, pool: &Pool, position: &UserPosition, tick: Tick) -> Result<u64> {
  ledger::pending_reward(pool, position, tick.block, farm.emission_per_block, farm.total_alloc_weight)
}

// POOL ADMINISTRATION

/// Weight and emission changes reprice every unsettled interval in every pool.
///
/// `pools` must hold each pool of the farm exactly once (keyed by stake mint), and every
/// pool that can still accrue must already be settled through `tick`.
pub fn assert_farm_settled<'p>(
  farm: &FarmConfig,
  pools: impl IntoIterator<Item = &'p Pool>,
  tick: Tick,
) -> Result<()> {
  let mut seen: Vec<Pubkey> = Vec::new();
  for pool in pools {
    require!(!seen.contains(&pool.stake_mint), FarmError::InvalidAccountState);
    seen.push(pool.stake_mint);

    let idle = !pool.active || pool.total_staked == 0;
    require!(idle || pool.is_settled_through(tick.block), FarmError::StaleSettlement);
  }

  require!(seen.len() as u64 == farm.pool_count, FarmError::StaleSettlement);
  Ok(())
}

/// Register `pool` with the farm. `existing` are the farm's other pools.
pub fn add_pool(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  existing: &[&Pool],
  tick: Tick,
  params: PoolParams,
) -> Result<()> {
  assert_pool_fees_valid(params.withdrawal_fee_bps, params.penalty_bps)?;
  assert_farm_settled(farm, existing.iter().copied(), tick)?;

  let total_alloc_weight = farm
    .total_alloc_weight
    .checked_add(params.alloc_weight)
    .ok_or(FarmError::ArithmeticOverflow)?;
  let pool_count = farm.pool_count.checked_add(1).ok_or(FarmError::ArithmeticOverflow)?;

  pool.alloc_weight = params.alloc_weight;
  pool.withdrawal_fee_bps = params.withdrawal_fee_bps;
  pool.penalty_bps = params.penalty_bps;
  pool.min_stake_time = params.min_stake_time;
  pool.last_reward_block = tick.block;
  pool.acc_reward_per_unit = 0;
  pool.total_staked = 0;
  pool.active = true;

  farm.total_alloc_weight = total_alloc_weight;
  farm.pool_count = pool_count;

  msg!("Pool added: weight {}, total weight {}", params.alloc_weight, total_alloc_weight);
  Ok(())
}

/// Settle the pool under its old weight, then apply new parameters.
///
/// `siblings` are the farm's other pools, already settled through `tick`.
/// A deactivated pool stops earning and leaves `total_alloc_weight`; it keeps serving
/// withdrawals and harvests of what it earned before.
#[allow(clippy::too_many_arguments)]
pub fn set_pool<R: TokenLedger>(
  farm: &mut FarmConfig,
  pool: &mut Pool,
  siblings: &[&Pool],
  tick: Tick,
  params: PoolParams,
  active: bool,
  rewards: &mut R,
) -> Result<u64> {
  assert_pool_fees_valid(params.withdrawal_fee_bps, params.penalty_bps)?;

  let mut next_pool = pool.clone();
  let emission = ledger::settle(&mut next_pool, tick.block, farm.emission_per_block, farm.total_alloc_weight)?;
  assert_farm_settled(farm, siblings.iter().copied().chain([&next_pool]), tick)?;

  let old_weight = if pool.active { pool.alloc_weight } else { 0 };
  let new_weight = if active { params.alloc_weight } else { 0 };
  let total_alloc_weight = farm
    .total_alloc_weight
    .checked_sub(old_weight)
    .and_then(|rest| rest.checked_add(new_weight))
    .ok_or(FarmError::ArithmeticOverflow)?;

  next_pool.alloc_weight = params.alloc_weight;
  next_pool.withdrawal_fee_bps = params.withdrawal_fee_bps;
  next_pool.penalty_bps = params.penalty_bps;
  next_pool.min_stake_time = params.min_stake_time;
  next_pool.active = active;

  let custody = rewards.custody();
  rewards.mint(&custody, emission)?;

  msg!(
    "Pool updated: weight {} -> {}, active {}, total weight {}",
    pool.alloc_weight,
    params.alloc_weight,
    active,
    total_alloc_weight
  );

  farm.total_alloc_weight = total_alloc_weight;
  *pool = next_pool;
  Ok(emission)
}

/// Permissionless accumulator update
pub fn settle_pool<R: TokenLedger>(farm: &FarmConfig, pool: &mut Pool, tick: Tick, rewards: &mut R) -> Result<u64> {
  let mut next_pool = pool.clone();
  let emission = ledger::settle(&mut next_pool, tick.block, farm.emission_per_block, farm.total_alloc_weight)?;
  assert_accumulator_monotonic(pool.acc_reward_per_unit, next_pool.acc_reward_per_unit)?;

  let custody = rewards.custody();
  rewards.mint(&custody, emission)?;

  *pool = next_pool;
  Ok(emission)
}

/// Change emission and protocol fee on a live farm; every pool must be settled first
pub fn update_farm_params(
  farm: &mut FarmConfig,
  pools: &[&Pool],
  tick: Tick,
  emission_per_block: u64,
  protocol_fee_bps: u64,
) -> Result<()> {
  assert_farm_settled(farm, pools.iter().copied(), tick)?;
  set_farm_params(farm, emission_per_block, protocol_fee_bps)
}

pub fn set_farm_params(farm: &mut FarmConfig, emission_per_block: u64, protocol_fee_bps: u64) -> Result<()> {
  assert_protocol_fee_valid(protocol_fee_bps)?;

  farm.emission_per_block = emission_per_block;
  farm.protocol_fee_bps = protocol_fee_bps;
  Ok(())
}
