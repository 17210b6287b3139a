//! Protocol-wide constants
//! Centralized location for all configuration values

// PRECISION CONSTANTS
pub const BPS_PRECISION: u64 = 10_000;                     // 100% = 10000 bps
pub const ACC_PRECISION: u128 = 1_000_000_000_000_000_000; // 1e18 scale for reward-per-unit
pub const WAD: u128 = 1_000_000_000_000_000_000;           // 1e18 fixed point for growth math

// TIME
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

// MULTIPLIERS (1x = 10_000 bps)
pub const NEUTRAL_MULTIPLIER_BPS: u64 = 10_000;
pub const MAX_MULTIPLIER_BPS: u64 = 30_000;                // 3x global ceiling
pub const HEALTH_BONUS_BPS: u64 = 11_000;                  // 1.1x
pub const HEALTH_MIN_STAKE_RATIO_BPS: u64 = 2_000;         // 20% of TVL
pub const HEALTH_MAX_STAKE_RATIO_BPS: u64 = 8_000;         // 80% of TVL
pub const TVL_GROWTH_THRESHOLD_BPS: i64 = 1_000;           // 10%
pub const MAX_VOLATILITY_BPS: u64 = 10_000;

// Loyalty bonus used by boosted yield projections
pub const MAX_TIME_BONUS_BPS: u64 = 2_500;                 // +25% after one year

// Accuracy envelope of the cubic e^x approximation
pub const COMPOUND_MAX_APY_BPS: u64 = 3_000;
pub const COMPOUND_MAX_DURATION: u64 = 5 * SECONDS_PER_YEAR;

// FEE LIMITS
pub const MAX_WITHDRAWAL_FEE_BPS: u64 = 1_000;             // 10%
pub const MAX_PENALTY_BPS: u64 = 2_500;                    // 25%
pub const MAX_PROTOCOL_FEE_BPS: u64 = 2_000;               // 20%

// TIERS
pub const MAX_TIERS: usize = 4;

// Default tier table: (lock seconds, multiplier bps)
pub const DEFAULT_TIERS: [(i64, u64); MAX_TIERS] = [
  (7 * SECONDS_PER_DAY as i64, 11_000),   // 1.1x after a week
  (30 * SECONDS_PER_DAY as i64, 12_500),  // 1.25x after a month
  (90 * SECONDS_PER_DAY as i64, 15_000),  // 1.5x after a quarter
  (180 * SECONDS_PER_DAY as i64, 20_000), // 2x after half a year
];

// Default market parameters
pub const DEFAULT_STABILITY_THRESHOLD_BPS: u64 = 3_000;
pub const DEFAULT_STABILITY_BONUS_BPS: u64 = 11_000;
pub const DEFAULT_GROWTH_BONUS_BPS: u64 = 11_500;

// REWARD MINT
pub const REWARD_DECIMALS: u8 = 9;

// PDA SEEDS
pub const FARM_SEED: &[u8] = b"farm";
pub const POOL_SEED: &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";
