//! Pure fixed-point arithmetic for the farm
//! All functions are deterministic integer math, no floating point anywhere
//! Nothing here reads accounts or the clock, so everything is testable in isolation

use anchor_lang::prelude::*;

use crate::constants::{BPS_PRECISION, WAD};
use crate::error::FarmError;

/// Multiply two u64 values and divide by a third, rounding DOWN
/// Returns None on overflow or zero denominator
pub fn mul_div_down(a: u64, b: u64, c: u64) -> Option<u64> {
  if c == 0 {
    return None;
  }

  let result = (a as u128)
    .checked_mul(b as u128)?
    .checked_div(c as u128)?;

  u64::try_from(result).ok()
}

/// Wide multiply-then-divide, rounding down.
///
/// Fails with `ArithmeticOverflow` when `a * b` does not fit in 128 bits or the
/// denominator is zero. Callers narrow the result themselves.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
  require!(denominator != 0, FarmError::ArithmeticOverflow);

  let product = a.checked_mul(b).ok_or(FarmError::ArithmeticOverflow)?;
  Ok(product / denominator)
}

/// Checked narrowing from the 128-bit working width back to token units
pub fn to_u64(value: u128) -> Result<u64> {
  u64::try_from(value).map_err(|_| error!(FarmError::ArithmeticOverflow))
}

/// `value * basis_points / 10_000`, rounding down
pub fn percent_of(value: u64, basis_points: u64) -> Result<u64> {
  mul_div_down(value, basis_points, BPS_PRECISION).ok_or_else(|| error!(FarmError::ArithmeticOverflow))
}

/// Scale an amount by a multiplier expressed in bps (10_000 = 1x)
pub fn apply_multiplier(value: u64, multiplier_bps: u64) -> Result<u64> {
  percent_of(value, multiplier_bps)
}

/// Apply a fee to an amount and return net amount + fee
///
/// # Arguments
/// * `amount` - Gross amount before fee
/// * `fee_bps` - Fee in basis points (e.g., 200 = 2%)
///
/// # Returns
/// (net_amount, fee_amount)
pub fn apply_fee(amount: u64, fee_bps: u64) -> Result<(u64, u64)> {
  require!(fee_bps <= BPS_PRECISION, FarmError::InvalidParameter);

  let fee_amount = percent_of(amount, fee_bps)?;
  let net_amount = amount
    .checked_sub(fee_amount)
    .ok_or(FarmError::ArithmeticOverflow)?;

  Ok((net_amount, fee_amount))
}

/// Third-order Taylor expansion of e^x in WAD fixed point.
///
/// `1 + x + x²/2 + x³/6` with every term floored, so the result is monotonic in `x`
/// and never above the true exponential for `x >= 0`.
pub fn exp_taylor3(x_wad: u128) -> Result<u128> {
  let x2 = mul_div(x_wad, x_wad, WAD)?;
  let x3 = mul_div(x2, x_wad, WAD)?;

  WAD
    .checked_add(x_wad)
    .and_then(|v| v.checked_add(x2 / 2))
    .and_then(|v| v.checked_add(x3 / 6))
    .ok_or_else(|| error!(FarmError::ArithmeticOverflow))
}
