use anchor_lang::prelude::*;

use crate::events::MultiplierParamsUpdated;
use crate::instructions::admin::FarmAdmin;
use crate::state::MultiplierParams;

pub fn handler(ctx: Context<FarmAdmin>, params: MultiplierParams) -> Result<()> {
  ctx.accounts.farm.engine.set_params(params)?;

  msg!(
    "Stability: below {}bps -> {}bps, growth bonus {}bps",
    params.stability_threshold_bps,
    params.stability_bonus_bps,
    params.growth_bonus_bps
  );

  emit!(MultiplierParamsUpdated {
    stability_threshold_bps: params.stability_threshold_bps,
    stability_bonus_bps: params.stability_bonus_bps,
    growth_bonus_bps: params.growth_bonus_bps,
    timestamp: Clock::get()?.unix_timestamp,
  });

  Ok(())
}
