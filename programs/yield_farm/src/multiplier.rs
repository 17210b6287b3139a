//! Dynamic reward multiplier
//!
//! A depositor's raw reward is scaled three times, each a bps multiply-then-divide:
//! tier commitment, market condition and protocol health. The composed result is
//! clamped to `MAX_MULTIPLIER_BPS` of the base, whatever bonuses stack.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FarmError;
use crate::math::{apply_multiplier, mul_div_down};
use crate::state::{MarketCondition, MultiplierEngine, MultiplierParams, Tier};

fn multiplier_in_bounds(multiplier_bps: u64) -> bool {
  (NEUTRAL_MULTIPLIER_BPS..=MAX_MULTIPLIER_BPS).contains(&multiplier_bps)
}

impl MultiplierEngine {
  /// Engine with the default tier table and market parameters installed
  pub fn with_defaults() -> Self {
    let mut engine = Self::default();

    for (slot, (lock_period, multiplier_bps)) in engine.tiers.iter_mut().zip(DEFAULT_TIERS) {
      *slot = Tier {
        lock_period,
        multiplier_bps,
        active: true,
        open_positions: 0,
      };
    }

    engine.params = MultiplierParams {
      stability_threshold_bps: DEFAULT_STABILITY_THRESHOLD_BPS,
      stability_bonus_bps: DEFAULT_STABILITY_BONUS_BPS,
      growth_bonus_bps: DEFAULT_GROWTH_BONUS_BPS,
    };

    // Neutral volatility until the first market update
    engine.market.volatility_index_bps = MAX_VOLATILITY_BPS;
    engine
  }

  pub fn tier(&self, tier: u8) -> Result<&Tier> {
    self
      .tiers
      .get(tier as usize)
      .ok_or_else(|| error!(FarmError::InactiveTier))
  }

  /// Tier multiplier once the lock period has elapsed, neutral otherwise
  pub fn tier_multiplier(&self, tier: u8, elapsed_since_start: u64) -> Result<u64> {
    let tier = self.tier(tier)?;
    let lock_period = u64::try_from(tier.lock_period).unwrap_or(0);

    if tier.active && elapsed_since_start >= lock_period {
      Ok(tier.multiplier_bps)
    } else {
      Ok(NEUTRAL_MULTIPLIER_BPS)
    }
  }

  /// Stability and growth bonuses, stacking multiplicatively
  pub fn market_multiplier(&self) -> Result<u64> {
    let mut multiplier = NEUTRAL_MULTIPLIER_BPS;

    if self.market.volatility_index_bps < self.params.stability_threshold_bps {
      multiplier = mul_div_down(multiplier, self.params.stability_bonus_bps, BPS_PRECISION)
        .ok_or(FarmError::ArithmeticOverflow)?;
    }

    if self.market.tvl_growth_rate_bps > TVL_GROWTH_THRESHOLD_BPS {
      multiplier = mul_div_down(multiplier, self.params.growth_bonus_bps, BPS_PRECISION)
        .ok_or(FarmError::ArithmeticOverflow)?;
    }

    Ok(multiplier)
  }

  /// True when staked/TVL lies in the health band, compared exactly in u128
  pub fn in_health_band(&self) -> bool {
    if self.protocol_tvl == 0 || self.total_staked == 0 {
      return false;
    }
    let scaled_stake = self.total_staked as u128 * BPS_PRECISION as u128;
    let tvl = self.protocol_tvl as u128;

    scaled_stake >= HEALTH_MIN_STAKE_RATIO_BPS as u128 * tvl
      && scaled_stake <= HEALTH_MAX_STAKE_RATIO_BPS as u128 * tvl
  }

  pub fn health_multiplier(&self) -> u64 {
    if self.in_health_band() {
      HEALTH_BONUS_BPS
    } else {
      NEUTRAL_MULTIPLIER_BPS
    }
  }

  /// Apply tier, market and health multipliers to `base_amount` and clamp to the ceiling
  pub fn final_yield(&self, base_amount: u64, tier: u8, elapsed_since_start: u64) -> Result<u64> {
    if base_amount == 0 {
      return Ok(0);
    }

    let after_tier = apply_multiplier(base_amount, self.tier_multiplier(tier, elapsed_since_start)?)?;
    let after_market = apply_multiplier(after_tier, self.market_multiplier()?)?;
    let after_health = apply_multiplier(after_market, self.health_multiplier())?;

    let ceiling = apply_multiplier(base_amount, MAX_MULTIPLIER_BPS)?;
    Ok(after_health.min(ceiling))
  }

  // ADMIN SETTERS

  pub fn set_tier(&mut self, tier: u8, lock_period: i64, multiplier_bps: u64, active: bool) -> Result<()> {
    require!(lock_period >= 0, FarmError::InvalidParameter);
    require!(multiplier_in_bounds(multiplier_bps), FarmError::InvalidParameter);

    let slot = self
      .tiers
      .get_mut(tier as usize)
      .ok_or(FarmError::InvalidParameter)?;

    // Lock terms are frozen for positions already committed to them
    require!(
      slot.open_positions == 0 || slot.lock_period == lock_period,
      FarmError::TierInUse
    );

    slot.lock_period = lock_period;
    slot.multiplier_bps = multiplier_bps;
    slot.active = active;
    Ok(())
  }

  pub fn set_market_condition(&mut self, volatility_index_bps: u64, tvl_growth_rate_bps: i64, now: i64) -> Result<()> {
    require!(volatility_index_bps <= MAX_VOLATILITY_BPS, FarmError::InvalidParameter);

    self.market = MarketCondition {
      volatility_index_bps,
      tvl_growth_rate_bps,
      updated_at: now,
    };
    Ok(())
  }

  pub fn set_params(&mut self, params: MultiplierParams) -> Result<()> {
    require!(params.stability_threshold_bps <= MAX_VOLATILITY_BPS, FarmError::InvalidParameter);
    require!(multiplier_in_bounds(params.stability_bonus_bps), FarmError::InvalidParameter);
    require!(multiplier_in_bounds(params.growth_bonus_bps), FarmError::InvalidParameter);

    self.params = params;
    Ok(())
  }

  pub fn set_protocol_tvl(&mut self, protocol_tvl: u64) {
    self.protocol_tvl = protocol_tvl;
  }

  // POSITION BOOKKEEPING

  /// A position gained stake under `tier`
  pub fn open_position(&mut self, tier: u8) -> Result<()> {
    let slot = self.tiers.get_mut(tier as usize).ok_or(FarmError::InactiveTier)?;
    require!(slot.active, FarmError::InactiveTier);

    slot.open_positions = slot
      .open_positions
      .checked_add(1)
      .ok_or(FarmError::ArithmeticOverflow)?;
    Ok(())
  }

  /// A position under `tier` was fully withdrawn
  pub fn close_position(&mut self, tier: u8) -> Result<()> {
    let slot = self.tiers.get_mut(tier as usize).ok_or(FarmError::InvalidParameter)?;

    slot.open_positions = slot
      .open_positions
      .checked_sub(1)
      .ok_or(FarmError::InvalidAccountState)?;
    Ok(())
  }

  pub fn record_stake_delta(&mut self, old_amount: u64, new_amount: u64) -> Result<()> {
    self.total_staked = if new_amount >= old_amount {
      self.total_staked.checked_add(new_amount - old_amount)
    } else {
      self.total_staked.checked_sub(old_amount - new_amount)
    }
    .ok_or(FarmError::ArithmeticOverflow)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn engine() -> MultiplierEngine {
    MultiplierEngine::with_defaults()
  }

  #[test]
  fn test_defaults_are_neutral_outside_tiers() {
    let e = engine();
    assert_eq!(e.market_multiplier().unwrap(), NEUTRAL_MULTIPLIER_BPS);
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);
    assert_eq!(e.final_yield(100, 0, 0).unwrap(), 100);
  }

  #[test]
  fn test_tier_multiplier_unlocks_at_exact_lock_period() {
    let e = engine();
    let lock = DEFAULT_TIERS[1].0 as u64;
    assert_eq!(e.tier_multiplier(1, lock - 1).unwrap(), NEUTRAL_MULTIPLIER_BPS);
    assert_eq!(e.tier_multiplier(1, lock).unwrap(), 12_500);
  }

  #[test]
  fn test_inactive_tier_is_neutral() {
    let mut e = engine();
    e.set_tier(2, 0, 15_000, false).unwrap();
    assert_eq!(e.tier_multiplier(2, 1_000_000).unwrap(), NEUTRAL_MULTIPLIER_BPS);
  }

  #[test]
  fn test_unknown_tier_rejected() {
    assert!(engine().tier_multiplier(MAX_TIERS as u8, 0).is_err());
  }

  #[test]
  fn test_market_bonuses_stack() {
    let mut e = engine();
    e.set_market_condition(1_000, 1_500, 0).unwrap();
    // 1.1 * 1.15 = 1.265
    assert_eq!(e.market_multiplier().unwrap(), 12_650);

    e.set_market_condition(1_000, 1_000, 0).unwrap();
    assert_eq!(e.market_multiplier().unwrap(), 11_000);

    e.set_market_condition(5_000, 1_001, 0).unwrap();
    assert_eq!(e.market_multiplier().unwrap(), 11_500);
  }

  #[test]
  fn test_health_band_is_inclusive() {
    let mut e = engine();
    e.set_protocol_tvl(1_000);

    e.total_staked = 200;
    assert_eq!(e.health_multiplier(), HEALTH_BONUS_BPS);
    e.total_staked = 800;
    assert_eq!(e.health_multiplier(), HEALTH_BONUS_BPS);
    e.total_staked = 199;
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);
    e.total_staked = 801;
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);

    e.set_protocol_tvl(0);
    e.total_staked = 500;
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);
  }

  #[test]
  fn test_health_band_does_not_round_into_range() {
    let mut e = engine();
    e.set_protocol_tvl(100_000);

    // 80.009% floors to 8_000 bps but is outside the band
    e.total_staked = 80_009;
    assert!(!e.in_health_band());
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);

    // just under 20%
    e.total_staked = 19_999;
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);

    e.total_staked = 80_000;
    assert_eq!(e.health_multiplier(), HEALTH_BONUS_BPS);

    // staked above TVL must not overflow
    e.set_protocol_tvl(1);
    e.total_staked = u64::MAX;
    assert_eq!(e.health_multiplier(), NEUTRAL_MULTIPLIER_BPS);
  }

  #[test]
  fn test_final_yield_composes_in_order() {
    let mut e = engine();
    e.set_market_condition(1_000, 0, 0).unwrap();
    e.set_protocol_tvl(1_000);
    e.total_staked = 500;

    let lock = DEFAULT_TIERS[2].0 as u64;
    // 1000 -> x1.5 = 1500 -> x1.1 = 1650 -> x1.1 = 1815
    assert_eq!(e.final_yield(1_000, 2, lock).unwrap(), 1_815);
  }

  #[test]
  fn test_final_yield_clamped_to_ceiling() {
    let mut e = engine();
    e.set_tier(3, 0, MAX_MULTIPLIER_BPS, true).unwrap();
    e.set_params(MultiplierParams {
      stability_threshold_bps: 10_000,
      stability_bonus_bps: MAX_MULTIPLIER_BPS,
      growth_bonus_bps: MAX_MULTIPLIER_BPS,
    })
    .unwrap();
    e.set_market_condition(0, 5_000, 0).unwrap();
    e.set_protocol_tvl(1_000);
    e.total_staked = 500;

    assert_eq!(e.final_yield(1_000, 3, 0).unwrap(), 3_000);
  }

  #[test]
  fn test_setters_validate_bounds() {
    let mut e = engine();
    assert!(e.set_tier(0, 0, 9_999, true).is_err());
    assert!(e.set_tier(0, 0, MAX_MULTIPLIER_BPS + 1, true).is_err());
    assert!(e.set_tier(0, -1, 10_000, true).is_err());
    assert!(e.set_market_condition(10_001, 0, 0).is_err());
    assert!(e
      .set_params(MultiplierParams {
        stability_threshold_bps: 10_001,
        stability_bonus_bps: 11_000,
        growth_bonus_bps: 11_000,
      })
      .is_err());
  }

  #[test]
  fn test_tier_lock_frozen_while_referenced() {
    let mut e = engine();
    e.open_position(1).unwrap();

    assert_eq!(e.set_tier(1, 0, 12_500, true).unwrap_err(), FarmError::TierInUse.into());
    // multiplier and active flag stay adjustable
    let lock = e.tiers[1].lock_period;
    e.set_tier(1, lock, 13_000, false).unwrap();

    e.close_position(1).unwrap();
    e.set_tier(1, 0, 13_000, true).unwrap();
  }

  #[test]
  fn test_open_position_requires_active_tier() {
    let mut e = engine();
    e.set_tier(0, 0, 10_000, false).unwrap();
    assert!(e.open_position(0).is_err());
    assert!(e.close_position(0).is_err());
  }

  #[test]
  fn test_record_stake_delta() {
    let mut e = engine();
    e.record_stake_delta(0, 500).unwrap();
    e.record_stake_delta(500, 200).unwrap();
    assert_eq!(e.total_staked, 200);
    assert!(e.record_stake_delta(1_000, 0).is_err());
  }
}
