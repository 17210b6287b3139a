use anchor_lang::prelude::*;

#[event]
pub struct FarmInitialized {
  pub authority: Pubkey,
  pub reward_mint: Pubkey,
  pub reward_vault: Pubkey,
  pub emission_per_block: u64,
  pub protocol_fee_bps: u64,
  pub reward_cap: u64,
  pub timestamp: i64,
}

#[event]
pub struct PoolAdded {
  pub farm: Pubkey,
  pub pool: Pubkey,
  pub stake_mint: Pubkey,
  pub alloc_weight: u64,
  pub total_alloc_weight: u64,
  pub withdrawal_fee_bps: u64,
  pub penalty_bps: u64,
  pub min_stake_time: u64,
  pub block: u64,
}

#[event]
pub struct PoolUpdated {
  pub pool: Pubkey,
  pub old_alloc_weight: u64,
  pub new_alloc_weight: u64,
  pub total_alloc_weight: u64,
  pub active: bool,
  pub settled_emission: u64,
  pub block: u64,
}

#[event]
pub struct PoolSettled {
  pub pool: Pubkey,
  pub emission: u64,
  pub acc_reward_per_unit: u128,
  pub block: u64,
}

#[event]
pub struct TierUpdated {
  pub tier: u8,
  pub lock_period: i64,
  pub multiplier_bps: u64,
  pub active: bool,
  pub timestamp: i64,
}

#[event]
pub struct MarketConditionUpdated {
  pub volatility_index_bps: u64,
  pub tvl_growth_rate_bps: i64,
  pub market_multiplier_bps: u64,
  pub timestamp: i64,
}

#[event]
pub struct MultiplierParamsUpdated {
  pub stability_threshold_bps: u64,
  pub stability_bonus_bps: u64,
  pub growth_bonus_bps: u64,
  pub timestamp: i64,
}

#[event]
pub struct ProtocolTvlUpdated {
  pub old_tvl: u64,
  pub new_tvl: u64,
  pub health_multiplier_bps: u64,
  pub timestamp: i64,
}

#[event]
pub struct FarmParamsUpdated {
  pub old_emission_per_block: u64,
  pub new_emission_per_block: u64,
  pub old_protocol_fee_bps: u64,
  pub new_protocol_fee_bps: u64,
  pub timestamp: i64,
}

#[event]
pub struct Deposited {
  pub user: Pubkey,
  pub pool: Pubkey,
  pub amount: u64,
  pub tier: u8,
  pub staked: u64,
  pub pool_total_staked: u64,
  pub reward_paid: u64,
  pub timestamp: i64,
}

#[event]
pub struct Withdrawn {
  pub user: Pubkey,
  pub pool: Pubkey,
  pub amount: u64,
  pub fee: u64,
  pub penalty: u64,
  pub returned: u64,
  pub reward_paid: u64,
  pub pool_total_staked: u64,
  pub timestamp: i64,
}

#[event]
pub struct Harvested {
  pub user: Pubkey,
  pub pool: Pubkey,
  pub raw_reward: u64,
  pub boosted_reward: u64,
  pub fee: u64,
  pub paid: u64,
  pub timestamp: i64,
}

#[event]
pub struct EmergencyWithdrawn {
  pub user: Pubkey,
  pub pool: Pubkey,
  pub amount: u64,
  pub timestamp: i64,
}
