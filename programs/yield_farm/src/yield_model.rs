//! Time-based yield curves
//!
//! Pure projections of what a principal earns over an elapsed period at a given APY.
//! Every function is total: zero inputs produce zero yield and any intermediate value
//! that leaves the 128-bit working width is reported as `ArithmeticOverflow`.

use anchor_lang::prelude::*;

use crate::constants::{
  BPS_PRECISION, MAX_MULTIPLIER_BPS, MAX_TIME_BONUS_BPS, NEUTRAL_MULTIPLIER_BPS, SECONDS_PER_YEAR, WAD,
};
use crate::error::FarmError;
use crate::math::{apply_multiplier, exp_taylor3, mul_div, mul_div_down, percent_of, to_u64};

const YEAR_BPS_DENOMINATOR: u128 = BPS_PRECISION as u128 * SECONDS_PER_YEAR as u128;

/// Linear (non-compounding) yield.
///
/// `principal * apy_bps * elapsed / (10_000 * SECONDS_PER_YEAR)`
pub fn simple_yield(principal: u64, apy_bps: u64, elapsed_seconds: u64) -> Result<u64> {
  if principal == 0 || apy_bps == 0 || elapsed_seconds == 0 {
    return Ok(0);
  }

  let principal_rate = (principal as u128)
    .checked_mul(apy_bps as u128)
    .ok_or(FarmError::ArithmeticOverflow)?;

  to_u64(mul_div(principal_rate, elapsed_seconds as u128, YEAR_BPS_DENOMINATOR)?)
}

/// Continuously-compounded yield approximated by `1 + rt + rt²/2 + rt³/6`.
///
/// Valid for `apy_bps <= COMPOUND_MAX_APY_BPS` and `elapsed <= COMPOUND_MAX_DURATION`.
/// The cubic always under-estimates `e^rt`: by under 0.03% of the final amount at
/// rt = 0.3 and by about 7% at the envelope corner (rt = 1.5). Beyond that the gap
/// keeps widening; the result stays monotonic and overflow is still reported.
pub fn compound_yield(principal: u64, apy_bps: u64, elapsed_seconds: u64) -> Result<u64> {
  if principal == 0 || apy_bps == 0 || elapsed_seconds == 0 {
    return Ok(0);
  }

  // rt in WAD: apy/10_000 * elapsed/year
  let rate_time = (apy_bps as u128)
    .checked_mul(elapsed_seconds as u128)
    .ok_or(FarmError::ArithmeticOverflow)?;
  let rt_wad = mul_div(rate_time, WAD, YEAR_BPS_DENOMINATOR)?;

  let growth_wad = exp_taylor3(rt_wad)?;
  let final_amount = to_u64(mul_div(principal as u128, growth_wad, WAD)?)?;

  Ok(final_amount.saturating_sub(principal))
}

/// Yield at an APY that slides linearly from `initial_apy_bps` to `final_apy_bps`
/// over `total_duration`, held at the final rate afterwards.
pub fn decaying_yield(
  amount: u64,
  initial_apy_bps: u64,
  final_apy_bps: u64,
  elapsed: u64,
  total_duration: u64,
) -> Result<u64> {
  let effective_apy = if total_duration == 0 || elapsed >= total_duration {
    final_apy_bps
  } else if initial_apy_bps >= final_apy_bps {
    let drop = mul_div_down(initial_apy_bps - final_apy_bps, elapsed, total_duration)
      .ok_or(FarmError::ArithmeticOverflow)?;
    initial_apy_bps - drop
  } else {
    let rise = mul_div_down(final_apy_bps - initial_apy_bps, elapsed, total_duration)
      .ok_or(FarmError::ArithmeticOverflow)?;
    initial_apy_bps + rise
  };

  simple_yield(amount, effective_apy, elapsed)
}

/// Penalty charged when leaving before `minimum_stake_time`.
///
/// The rate shrinks linearly with time staked and is exactly zero from the minimum on.
pub fn early_withdrawal_penalty(
  amount: u64,
  penalty_rate_bps: u64,
  time_staked: u64,
  minimum_stake_time: u64,
) -> Result<u64> {
  require!(penalty_rate_bps <= BPS_PRECISION, FarmError::InvalidParameter);

  if time_staked >= minimum_stake_time {
    return Ok(0);
  }

  let remaining = minimum_stake_time - time_staked;
  let adjusted_rate = mul_div_down(penalty_rate_bps, remaining, minimum_stake_time)
    .ok_or(FarmError::ArithmeticOverflow)?;

  percent_of(amount, adjusted_rate)
}

/// Loyalty bonus in bps: grows linearly to `MAX_TIME_BONUS_BPS` over one year
pub fn time_bonus_bps(elapsed_seconds: u64) -> u64 {
  mul_div_down(elapsed_seconds, MAX_TIME_BONUS_BPS, SECONDS_PER_YEAR)
    .unwrap_or(MAX_TIME_BONUS_BPS)
    .min(MAX_TIME_BONUS_BPS)
}

/// Simple yield boosted by a tier multiplier and the loyalty bonus.
///
/// The combined boost is clamped to `MAX_MULTIPLIER_BPS`.
pub fn boosted_yield(
  principal: u64,
  apy_bps: u64,
  elapsed_seconds: u64,
  tier_multiplier_bps: u64,
) -> Result<u64> {
  require!(
    (NEUTRAL_MULTIPLIER_BPS..=MAX_MULTIPLIER_BPS).contains(&tier_multiplier_bps),
    FarmError::InvalidParameter
  );

  let base = simple_yield(principal, apy_bps, elapsed_seconds)?;
  let loyalty = NEUTRAL_MULTIPLIER_BPS + time_bonus_bps(elapsed_seconds);

  let combined = mul_div_down(tier_multiplier_bps, loyalty, BPS_PRECISION)
    .ok_or(FarmError::ArithmeticOverflow)?
    .min(MAX_MULTIPLIER_BPS);

  apply_multiplier(base, combined)
}
