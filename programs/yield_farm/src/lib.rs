use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod farm;
pub mod instructions;
pub mod invariants;
pub mod ledger;
pub mod math;
pub mod multiplier;
pub mod state;
pub mod token_ledger;
pub mod yield_model;

use instructions::*;

pub use farm::PoolParams;
pub use state::MultiplierParams;

declare_id!("8YxVMnZz7FBgME6dJWmmozkJk7AzXrkVKXDPbBBhZgQ4");

#[program]
pub mod yield_farm {
    use super::*;

    /// Create the farm, its reward mint, reward custody and fee account
    pub fn initialize_farm(
        ctx: Context<InitializeFarm>,
        emission_per_block: u64,
        protocol_fee_bps: u64,
        reward_cap: u64,
    ) -> Result<()> {
        instructions::initialize_farm::handler(ctx, emission_per_block, protocol_fee_bps, reward_cap)
    }

    pub fn add_pool<'info>(ctx: Context<'_, '_, 'info, 'info, AddPool<'info>>, params: PoolParams) -> Result<()> {
        instructions::add_pool::handler(ctx, params)
    }

    /// Reweight, reprice or (de)activate a pool. Settles the pool first.
    pub fn set_pool<'info>(
        ctx: Context<'_, '_, 'info, 'info, SetPool<'info>>,
        params: PoolParams,
        active: bool,
    ) -> Result<()> {
        instructions::set_pool::handler(ctx, params, active)
    }

    pub fn set_tier(
        ctx: Context<FarmAdmin>,
        tier: u8,
        lock_period: i64,
        multiplier_bps: u64,
        active: bool,
    ) -> Result<()> {
        instructions::set_tier::handler(ctx, tier, lock_period, multiplier_bps, active)
    }

    pub fn update_market_condition(
        ctx: Context<FarmAdmin>,
        volatility_index_bps: u64,
        tvl_growth_rate_bps: i64,
    ) -> Result<()> {
        instructions::update_market_condition::handler(ctx, volatility_index_bps, tvl_growth_rate_bps)
    }

    pub fn set_multiplier_params(ctx: Context<FarmAdmin>, params: MultiplierParams) -> Result<()> {
        instructions::set_multiplier_params::handler(ctx, params)
    }

    pub fn set_protocol_tvl(ctx: Context<FarmAdmin>, protocol_tvl: u64) -> Result<()> {
        instructions::set_protocol_tvl::handler(ctx, protocol_tvl)
    }

    /// Change emission or protocol fee. Every pool goes in as a remaining account,
    /// settled earlier in the same transaction.
    pub fn set_farm_params<'info>(
        ctx: Context<'_, '_, 'info, 'info, FarmAdmin<'info>>,
        emission_per_block: u64,
        protocol_fee_bps: u64,
    ) -> Result<()> {
        instructions::set_farm_params::handler(ctx, emission_per_block, protocol_fee_bps)
    }

    /// Permissionless accumulator update for one pool
    pub fn settle_pool(ctx: Context<SettlePool>) -> Result<()> {
        instructions::settle_pool::handler(ctx)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64, tier: u8) -> Result<()> {
        instructions::deposit::handler(ctx, amount, tier)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest::handler(ctx)
    }

    /// Return principal without settling; pending reward is forfeited
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>) -> Result<()> {
        instructions::emergency_withdraw::handler(ctx)
    }

    /// Raw reward the position could harvest now
    pub fn pending_reward(ctx: Context<PendingReward>) -> Result<u64> {
        instructions::pending_reward::handler(ctx)
    }
}
