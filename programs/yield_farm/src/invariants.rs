//! Invariant assertions for the farm
//! Checked by the controller on staged state before anything is committed

use anchor_lang::prelude::*;

use crate::constants::{
  BPS_PRECISION, MAX_MULTIPLIER_BPS, MAX_PENALTY_BPS, MAX_PROTOCOL_FEE_BPS, MAX_WITHDRAWAL_FEE_BPS,
};
use crate::error::FarmError;
use crate::math::apply_multiplier;

/// Assert the pool fee schedule is within configured limits
pub fn assert_pool_fees_valid(withdrawal_fee_bps: u64, penalty_bps: u64) -> Result<()> {
  require!(withdrawal_fee_bps <= MAX_WITHDRAWAL_FEE_BPS, FarmError::InvalidParameter);
  require!(penalty_bps <= MAX_PENALTY_BPS, FarmError::InvalidParameter);
  // fee and penalty together can never consume the whole withdrawal
  require!(withdrawal_fee_bps + penalty_bps < BPS_PRECISION, FarmError::InvalidParameter);
  Ok(())
}

pub fn assert_protocol_fee_valid(protocol_fee_bps: u64) -> Result<()> {
  require!(protocol_fee_bps <= MAX_PROTOCOL_FEE_BPS, FarmError::InvalidParameter);
  Ok(())
}

/// Assert a boosted payout never exceeds the global multiplier ceiling
///
/// # Arguments
/// * `base` - Raw reward before multipliers
/// * `boosted` - Reward after tier, market and health multipliers
pub fn assert_within_multiplier_ceiling(base: u64, boosted: u64) -> Result<()> {
  let ceiling = apply_multiplier(base, MAX_MULTIPLIER_BPS)?;
  require!(boosted <= ceiling, FarmError::InvalidParameter);
  Ok(())
}

/// Assert the pool accumulator did not move backwards across an action
pub fn assert_accumulator_monotonic(before: u128, after: u128) -> Result<()> {
  require!(after >= before, FarmError::InvalidAccountState);
  Ok(())
}

/// Assert custody holds enough to cover a payout
pub fn assert_custody_covers(custody_balance: u64, required: u64) -> Result<()> {
  require!(custody_balance >= required, FarmError::InsufficientFunds);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pool_fees_valid() {
    assert!(assert_pool_fees_valid(200, 200).is_ok());
    assert!(assert_pool_fees_valid(MAX_WITHDRAWAL_FEE_BPS, MAX_PENALTY_BPS).is_ok());
  }

  #[test]
  fn test_pool_fees_above_limits() {
    assert!(assert_pool_fees_valid(MAX_WITHDRAWAL_FEE_BPS + 1, 0).is_err());
    assert!(assert_pool_fees_valid(0, MAX_PENALTY_BPS + 1).is_err());
  }

  #[test]
  fn test_protocol_fee_limit() {
    assert!(assert_protocol_fee_valid(MAX_PROTOCOL_FEE_BPS).is_ok());
    assert!(assert_protocol_fee_valid(MAX_PROTOCOL_FEE_BPS + 1).is_err());
  }

  #[test]
  fn test_multiplier_ceiling_exact() {
    assert!(assert_within_multiplier_ceiling(1_000, 3_000).is_ok());
    assert!(assert_within_multiplier_ceiling(1_000, 3_001).is_err());
    assert!(assert_within_multiplier_ceiling(0, 0).is_ok());
  }

  #[test]
  fn test_accumulator_monotonic() {
    assert!(assert_accumulator_monotonic(5, 5).is_ok());
    assert!(assert_accumulator_monotonic(5, 6).is_ok());
    assert!(assert_accumulator_monotonic(6, 5).is_err());
  }

  #[test]
  fn test_custody_covers() {
    assert!(assert_custody_covers(100, 100).is_ok());
    assert!(assert_custody_covers(99, 100).is_err());
  }
}
