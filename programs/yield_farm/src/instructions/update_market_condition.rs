//! Market signal update - overwrites the stored condition wholesale

use anchor_lang::prelude::*;

use crate::events::MarketConditionUpdated;
use crate::instructions::admin::FarmAdmin;

pub fn handler(ctx: Context<FarmAdmin>, volatility_index_bps: u64, tvl_growth_rate_bps: i64) -> Result<()> {
  let now = Clock::get()?.unix_timestamp;
  let farm = &mut ctx.accounts.farm;

  farm.engine.set_market_condition(volatility_index_bps, tvl_growth_rate_bps, now)?;
  let market_multiplier_bps = farm.engine.market_multiplier()?;

  msg!("Volatility: {}bps", volatility_index_bps);
  msg!("TVL growth: {}bps", tvl_growth_rate_bps);
  msg!("Market multiplier: {}bps", market_multiplier_bps);

  emit!(MarketConditionUpdated {
    volatility_index_bps,
    tvl_growth_rate_bps,
    market_multiplier_bps,
    timestamp: now,
  });

  Ok(())
}
