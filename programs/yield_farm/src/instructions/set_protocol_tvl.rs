use anchor_lang::prelude::*;

use crate::events::ProtocolTvlUpdated;
use crate::instructions::admin::FarmAdmin;

pub fn handler(ctx: Context<FarmAdmin>, protocol_tvl: u64) -> Result<()> {
  let farm = &mut ctx.accounts.farm;
  let old_tvl = farm.engine.protocol_tvl;

  farm.engine.set_protocol_tvl(protocol_tvl);
  let health_multiplier_bps = farm.engine.health_multiplier();

  msg!("Protocol TVL: {} -> {}", old_tvl, protocol_tvl);
  msg!("Staked: {}, health multiplier {}bps", farm.engine.total_staked, health_multiplier_bps);

  emit!(ProtocolTvlUpdated {
    old_tvl,
    new_tvl: protocol_tvl,
    health_multiplier_bps,
    timestamp: Clock::get()?.unix_timestamp,
  });

  Ok(())
}
