//! Reward accounting ledger
//!
//! Each pool carries `acc_reward_per_unit`, the reward earned by one staked unit since the
//! pool was created (scaled by ACC_PRECISION). A position stores `reward_debt`, the share
//! of that accumulator it was already credited with, so
//!
//!   pending = amount * acc_reward_per_unit / ACC_PRECISION - reward_debt
//!
//! Ordering rule: `settle` runs before anything reads the accumulator in an action, and
//! `record_stake_change` recomputes the debt in the same call that changes the stake.

use anchor_lang::prelude::*;

use crate::constants::ACC_PRECISION;
use crate::error::FarmError;
use crate::math::{mul_div, to_u64};
use crate::state::{Pool, UserPosition};

/// Emission owed to a pool for `[last_reward_block, current_block)`
pub fn pool_emission(
  pool: &Pool,
  current_block: u64,
  emission_per_block: u64,
  total_alloc_weight: u64,
) -> Result<u64> {
  if current_block <= pool.last_reward_block
    || !pool.active
    || pool.alloc_weight == 0
    || total_alloc_weight == 0
  {
    return Ok(0);
  }

  let blocks = (current_block - pool.last_reward_block) as u128;
  let gross = blocks
    .checked_mul(emission_per_block as u128)
    .ok_or(FarmError::ArithmeticOverflow)?;

  to_u64(mul_div(gross, pool.alloc_weight as u128, total_alloc_weight as u128)?)
}

/// Accumulator increment for `reward` spread across `total_staked`
fn acc_increment(reward: u64, total_staked: u64) -> Result<u128> {
  mul_div(reward as u128, ACC_PRECISION, total_staked as u128)
}

/// Accumulator value `settle` would produce at `current_block`, without mutating
pub fn projected_acc_reward_per_unit(
  pool: &Pool,
  current_block: u64,
  emission_per_block: u64,
  total_alloc_weight: u64,
) -> Result<u128> {
  if current_block <= pool.last_reward_block || pool.total_staked == 0 {
    return Ok(pool.acc_reward_per_unit);
  }

  let reward = pool_emission(pool, current_block, emission_per_block, total_alloc_weight)?;
  pool
    .acc_reward_per_unit
    .checked_add(acc_increment(reward, pool.total_staked)?)
    .ok_or_else(|| error!(FarmError::ArithmeticOverflow))
}

/// Bring the pool's accumulator up to `current_block`.
///
/// Returns the reward that must be minted into custody for this interval. Unstaked
/// intervals advance the block without earning anything.
pub fn settle(
  pool: &mut Pool,
  current_block: u64,
  emission_per_block: u64,
  total_alloc_weight: u64,
) -> Result<u64> {
  if current_block <= pool.last_reward_block {
    return Ok(0);
  }

  if pool.total_staked == 0 {
    pool.last_reward_block = current_block;
    return Ok(0);
  }

  let reward = pool_emission(pool, current_block, emission_per_block, total_alloc_weight)?;
  let next_acc = pool
    .acc_reward_per_unit
    .checked_add(acc_increment(reward, pool.total_staked)?)
    .ok_or(FarmError::ArithmeticOverflow)?;
  let next_minted = pool
    .reward_minted
    .checked_add(reward)
    .ok_or(FarmError::ArithmeticOverflow)?;

  pool.acc_reward_per_unit = next_acc;
  pool.reward_minted = next_minted;
  pool.last_reward_block = current_block;

  Ok(reward)
}

/// `amount * acc / ACC_PRECISION`, the position's share of the accumulator
pub fn accumulated_share(amount: u64, acc_reward_per_unit: u128) -> Result<u128> {
  mul_div(amount as u128, acc_reward_per_unit, ACC_PRECISION)
}

fn harvestable(position: &UserPosition, acc_reward_per_unit: u128) -> Result<u64> {
  let share = accumulated_share(position.amount, acc_reward_per_unit)?;
  // Negative means a stale debt slipped past record_stake_change
  let owed = share
    .checked_sub(position.reward_debt)
    .ok_or(FarmError::StaleSettlement)?;
  to_u64(owed)
}

/// Raw (pre-multiplier) reward the position could harvest at `current_block`.
///
/// Identical to the amount `record_stake_change` would return after `settle` at the
/// same block.
pub fn pending_reward(
  pool: &Pool,
  position: &UserPosition,
  current_block: u64,
  emission_per_block: u64,
  total_alloc_weight: u64,
) -> Result<u64> {
  let acc = projected_acc_reward_per_unit(pool, current_block, emission_per_block, total_alloc_weight)?;
  harvestable(position, acc)
}

/// Change the position's stake to `new_amount` and return what it had earned.
///
/// Must follow `settle(pool, current_block, ..)` within the same action. Reward debt is
/// recomputed here and nowhere else, and the pool total follows the position.
pub fn record_stake_change(
  pool: &mut Pool,
  position: &mut UserPosition,
  current_block: u64,
  new_amount: u64,
) -> Result<u64> {
  require!(pool.is_settled_through(current_block), FarmError::StaleSettlement);

  let owed = harvestable(position, pool.acc_reward_per_unit)?;
  let new_debt = accumulated_share(new_amount, pool.acc_reward_per_unit)?;

  let new_total = pool
    .total_staked
    .checked_sub(position.amount)
    .and_then(|rest| rest.checked_add(new_amount))
    .ok_or(FarmError::ArithmeticOverflow)?;

  pool.total_staked = new_total;
  position.amount = new_amount;
  position.reward_debt = new_debt;

  Ok(owed)
}

#[cfg(test)]
mod tests {
  use super::*;

  const EMISSION: u64 = 10;

  fn pool(alloc_weight: u64) -> Pool {
    Pool {
      alloc_weight,
      active: true,
      ..Default::default()
    }
  }

  fn deposit(pool: &mut Pool, position: &mut UserPosition, block: u64, total_alloc: u64, amount: u64) -> u64 {
    settle(pool, block, EMISSION, total_alloc).unwrap();
    let new_amount = position.amount + amount;
    record_stake_change(pool, position, block, new_amount).unwrap()
  }

  #[test]
  fn test_single_pool_accrues_full_emission() {
    let mut p = pool(100);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 1_000);

    assert_eq!(pending_reward(&p, &user, 10, EMISSION, 100).unwrap(), 100);
    assert_eq!(settle(&mut p, 10, EMISSION, 100).unwrap(), 100);
    assert_eq!(record_stake_change(&mut p, &mut user, 10, 1_000).unwrap(), 100);
    assert_eq!(pending_reward(&p, &user, 10, EMISSION, 100).unwrap(), 0);
  }

  #[test]
  fn test_two_pools_split_by_weight() {
    let mut a = pool(100);
    let mut b = pool(300);
    let mut ua = UserPosition::default();
    let mut ub = UserPosition::default();
    deposit(&mut a, &mut ua, 0, 400, 50);
    deposit(&mut b, &mut ub, 0, 400, 70);

    assert_eq!(settle(&mut a, 10, EMISSION, 400).unwrap(), 25);
    assert_eq!(settle(&mut b, 10, EMISSION, 400).unwrap(), 75);
    assert_eq!(a.reward_minted + b.reward_minted, 100);
  }

  #[test]
  fn test_settle_is_idempotent_at_same_block() {
    let mut p = pool(100);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 1_000);

    settle(&mut p, 7, EMISSION, 100).unwrap();
    let snapshot = (p.acc_reward_per_unit, p.last_reward_block, p.reward_minted);

    assert_eq!(settle(&mut p, 7, EMISSION, 100).unwrap(), 0);
    assert_eq!(settle(&mut p, 3, EMISSION, 100).unwrap(), 0);
    assert_eq!((p.acc_reward_per_unit, p.last_reward_block, p.reward_minted), snapshot);
  }

  #[test]
  fn test_unstaked_interval_earns_nothing() {
    let mut p = pool(100);
    assert_eq!(settle(&mut p, 50, EMISSION, 100).unwrap(), 0);
    assert_eq!(p.last_reward_block, 50);
    assert_eq!(p.acc_reward_per_unit, 0);

    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 50, 100, 1_000);
    assert_eq!(pending_reward(&p, &user, 60, EMISSION, 100).unwrap(), 100);
  }

  #[test]
  fn test_late_depositor_gets_no_retroactive_reward() {
    let mut p = pool(100);
    let mut early = UserPosition::default();
    let mut late = UserPosition::default();

    deposit(&mut p, &mut early, 0, 100, 1_000);
    deposit(&mut p, &mut late, 10, 100, 1_000);

    assert_eq!(pending_reward(&p, &late, 10, EMISSION, 100).unwrap(), 0);
    // blocks 10..20 split evenly
    assert_eq!(pending_reward(&p, &early, 20, EMISSION, 100).unwrap(), 150);
    assert_eq!(pending_reward(&p, &late, 20, EMISSION, 100).unwrap(), 50);
  }

  #[test]
  fn test_pending_matches_settle_then_record() {
    let mut p = pool(37);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 3, 91, 777);

    let projected = pending_reward(&p, &user, 129, 13, 91).unwrap();
    settle(&mut p, 129, 13, 91).unwrap();
    let amount = user.amount;
    let harvested = record_stake_change(&mut p, &mut user, 129, amount).unwrap();
    assert_eq!(projected, harvested);
  }

  #[test]
  fn test_record_without_settle_is_stale() {
    let mut p = pool(100);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 1_000);

    let err = record_stake_change(&mut p, &mut user, 5, 0).unwrap_err();
    assert_eq!(err, FarmError::StaleSettlement.into());
    assert_eq!(user.amount, 1_000);
  }

  #[test]
  fn test_record_stake_change_tracks_pool_total() {
    let mut p = pool(100);
    let mut a = UserPosition::default();
    let mut b = UserPosition::default();
    deposit(&mut p, &mut a, 0, 100, 400);
    deposit(&mut p, &mut b, 0, 100, 600);
    assert_eq!(p.total_staked, 1_000);

    settle(&mut p, 4, EMISSION, 100).unwrap();
    record_stake_change(&mut p, &mut a, 4, 100).unwrap();
    assert_eq!(p.total_staked, 700);
    assert_eq!(a.reward_debt, accumulated_share(100, p.acc_reward_per_unit).unwrap());
  }

  #[test]
  fn test_accumulator_never_decreases() {
    let mut p = pool(100);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 3);

    let mut prev = p.acc_reward_per_unit;
    for block in [1u64, 1, 2, 9, 9, 40, 41, 1_000] {
      settle(&mut p, block, EMISSION, 100).unwrap();
      assert!(p.acc_reward_per_unit >= prev);
      prev = p.acc_reward_per_unit;
    }
  }

  #[test]
  fn test_inactive_pool_earns_nothing() {
    let mut p = pool(100);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 1_000);
    p.active = false;
    assert_eq!(pending_reward(&p, &user, 10, EMISSION, 100).unwrap(), 0);
    assert_eq!(settle(&mut p, 10, EMISSION, 100).unwrap(), 0);
  }

  #[test]
  fn test_zero_alloc_pool_earns_nothing() {
    let mut p = pool(0);
    let mut user = UserPosition::default();
    deposit(&mut p, &mut user, 0, 100, 1_000);
    assert_eq!(settle(&mut p, 10, EMISSION, 100).unwrap(), 0);
    assert_eq!(p.last_reward_block, 10);
  }
}
