//! State accounts for the farm
//! FarmConfig is the singleton per reward mint; Pool and UserPosition hold the ledger

use anchor_lang::prelude::*;

use crate::constants::MAX_TIERS;

/// Lock-commitment tier. Slot index in the tier table is the tier id.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tier {
  /// Seconds a position must be held before the multiplier applies
  pub lock_period: i64,

  /// Multiplier in bps, within [1x, MAX_MULTIPLIER_BPS]
  pub multiplier_bps: u64,

  pub active: bool,

  /// Positions with stake currently referencing this tier
  pub open_positions: u32,
}

impl Tier {
  pub const LEN: usize = 8 + 8 + 1 + 4;
}

/// Latest market signals, overwritten wholesale on every update
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarketCondition {
  /// Volatility index in bps, [0, 10_000]
  pub volatility_index_bps: u64,

  /// TVL growth rate in bps, may be negative
  pub tvl_growth_rate_bps: i64,

  pub updated_at: i64,
}

impl MarketCondition {
  pub const LEN: usize = 8 + 8 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultiplierParams {
  /// Volatility below this earns the stability bonus
  pub stability_threshold_bps: u64,

  pub stability_bonus_bps: u64,

  pub growth_bonus_bps: u64,
}

impl MultiplierParams {
  pub const LEN: usize = 8 + 8 + 8;
}

/// Everything the dynamic multiplier reads, owned by the farm and passed explicitly
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultiplierEngine {
  pub tiers: [Tier; MAX_TIERS],

  pub market: MarketCondition,

  pub params: MultiplierParams,

  /// Protocol TVL signal, set by the authority
  pub protocol_tvl: u64,

  /// Sum of stake across all pools of the farm
  pub total_staked: u64,
}

impl MultiplierEngine {
  pub const LEN: usize = Tier::LEN * MAX_TIERS + MarketCondition::LEN + MultiplierParams::LEN + 8 + 8;
}

/// Farm configuration - one per reward mint
#[account]
#[derive(Default, Debug)]
pub struct FarmConfig {
  /// Farm authority (admin)
  pub authority: Pubkey,

  pub reward_mint: Pubkey,

  /// Custody of minted, not yet harvested rewards
  pub reward_vault: Pubkey,

  /// Reward token account receiving the protocol harvest fee
  pub reward_fee_account: Pubkey,

  pub emission_per_block: u64,

  /// Sum of alloc_weight over active pools
  pub total_alloc_weight: u64,

  pub protocol_fee_bps: u64,

  /// Hard cap on reward mint supply (0 = uncapped)
  pub reward_cap: u64,

  pub pool_count: u64,

  /// Rewards minted on top of emission by multipliers
  pub bonus_minted: u64,

  pub engine: MultiplierEngine,

  pub bump: u8,

  pub vault_bump: u8,
}

impl FarmConfig {
  pub const LEN: usize = 8 + // discriminator
    32 + // authority
    32 + // reward_mint
    32 + // reward_vault
    32 + // reward_fee_account
    8 + // emission_per_block
    8 + // total_alloc_weight
    8 + // protocol_fee_bps
    8 + // reward_cap
    8 + // pool_count
    8 + // bonus_minted
    MultiplierEngine::LEN + // engine
    1 + // bump
    1; // vault_bump
}

/// A stakeable asset and its reward accumulator
#[account]
#[derive(Default, Debug)]
pub struct Pool {
  pub farm: Pubkey,

  pub stake_mint: Pubkey,

  /// Custody of staked principal, owned by the farm PDA
  pub stake_vault: Pubkey,

  /// Stake token account receiving withdrawal fees and penalties
  pub fee_account: Pubkey,

  /// Share of the farm emission
  pub alloc_weight: u64,

  pub last_reward_block: u64,

  /// Reward per staked unit, scaled by ACC_PRECISION. Never decreases.
  pub acc_reward_per_unit: u128,

  pub total_staked: u64,

  pub withdrawal_fee_bps: u64,

  /// Early-withdrawal penalty at time zero, decays to 0 at min_stake_time
  pub penalty_bps: u64,

  pub min_stake_time: u64,

  /// Lifetime emission minted for this pool
  pub reward_minted: u64,

  /// Lifetime raw (pre-multiplier) reward paid out of this pool
  pub reward_paid: u64,

  pub depositor_count: u64,

  pub active: bool,

  pub bump: u8,

  pub vault_bump: u8,
}

impl Pool {
  pub const LEN: usize = 8 + // discriminator
    32 + // farm
    32 + // stake_mint
    32 + // stake_vault
    32 + // fee_account
    8 + // alloc_weight
    8 + // last_reward_block
    16 + // acc_reward_per_unit
    8 + // total_staked
    8 + // withdrawal_fee_bps
    8 + // penalty_bps
    8 + // min_stake_time
    8 + // reward_minted
    8 + // reward_paid
    8 + // depositor_count
    1 + // active
    1 + // bump
    1; // vault_bump

  /// True once settle has run for `current_block` (or the pool starts later)
  pub fn is_settled_through(&self, current_block: u64) -> bool {
    self.last_reward_block >= current_block
  }
}

/// One depositor's stake in one pool
#[account]
#[derive(Default, Debug)]
pub struct UserPosition {
  pub owner: Pubkey,

  pub pool: Pubkey,

  pub amount: u64,

  /// amount * acc_reward_per_unit / ACC_PRECISION at the last stake change
  pub reward_debt: u128,

  pub tier: u8,

  /// Restarted on every deposit
  pub deposit_timestamp: i64,

  /// Lifetime reward received, after multipliers and fees
  pub total_claimed: u64,

  pub bump: u8,
}

impl UserPosition {
  pub const LEN: usize = 8 + // discriminator
    32 + // owner
    32 + // pool
    8 + // amount
    16 + // reward_debt
    1 + // tier
    8 + // deposit_timestamp
    8 + // total_claimed
    1; // bump

  /// Seconds since the last deposit, 0 if the clock reads earlier
  pub fn elapsed_since_deposit(&self, now: i64) -> u64 {
    u64::try_from(now.saturating_sub(self.deposit_timestamp)).unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_farm_config_len() {
    let encoded = borsh::to_vec(&FarmConfig::default()).unwrap();
    assert_eq!(encoded.len() + 8, FarmConfig::LEN);
  }

  #[test]
  fn test_pool_len() {
    let encoded = borsh::to_vec(&Pool::default()).unwrap();
    assert_eq!(encoded.len() + 8, Pool::LEN);
  }

  #[test]
  fn test_user_position_len() {
    let encoded = borsh::to_vec(&UserPosition::default()).unwrap();
    assert_eq!(encoded.len() + 8, UserPosition::LEN);
  }

  #[test]
  fn test_elapsed_since_deposit_never_negative() {
    let position = UserPosition { deposit_timestamp: 1_000, ..Default::default() };
    assert_eq!(position.elapsed_since_deposit(1_500), 500);
    assert_eq!(position.elapsed_since_deposit(900), 0);
  }
}
