//! Emission and protocol fee update
//! Every pool of the farm is passed as a remaining account and must already be settled
//! at the current slot (batch a settle_pool per pool ahead of this instruction).

use anchor_lang::prelude::*;

use crate::events::FarmParamsUpdated;
use crate::farm::{update_farm_params, Tick};
use crate::instructions::admin::{load_farm_pools, FarmAdmin};
use crate::state::Pool;

pub fn handler<'info>(
  ctx: Context<'_, '_, 'info, 'info, FarmAdmin<'info>>,
  emission_per_block: u64,
  protocol_fee_bps: u64,
) -> Result<()> {
  let tick = Tick::now()?;
  let pools = load_farm_pools(&ctx.accounts.farm.key(), ctx.remaining_accounts)?;
  let pools: Vec<&Pool> = pools.iter().map(|pool| &**pool).collect();

  let farm = &mut ctx.accounts.farm;
  let old_emission_per_block = farm.emission_per_block;
  let old_protocol_fee_bps = farm.protocol_fee_bps;

  update_farm_params(farm, &pools, tick, emission_per_block, protocol_fee_bps)?;

  msg!("Emission: {} -> {} per block", old_emission_per_block, emission_per_block);
  msg!("Protocol fee: {}bps -> {}bps", old_protocol_fee_bps, protocol_fee_bps);

  emit!(FarmParamsUpdated {
    old_emission_per_block,
    new_emission_per_block: emission_per_block,
    old_protocol_fee_bps,
    new_protocol_fee_bps: protocol_fee_bps,
    timestamp: tick.timestamp,
  });

  Ok(())
}
