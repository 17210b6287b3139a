use anchor_lang::prelude::*;

use crate::events::TierUpdated;
use crate::instructions::admin::FarmAdmin;

pub fn handler(
  ctx: Context<FarmAdmin>,
  tier: u8,
  lock_period: i64,
  multiplier_bps: u64,
  active: bool,
) -> Result<()> {
  let farm = &mut ctx.accounts.farm;
  farm.engine.set_tier(tier, lock_period, multiplier_bps, active)?;

  msg!("Tier {}: lock {}s, {}bps, active {}", tier, lock_period, multiplier_bps, active);

  emit!(TierUpdated {
    tier,
    lock_period,
    multiplier_bps,
    active,
    timestamp: Clock::get()?.unix_timestamp,
  });

  Ok(())
}
