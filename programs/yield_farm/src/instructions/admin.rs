//! Accounts shared by the farm-level admin setters

use anchor_lang::prelude::*;

use crate::constants::FARM_SEED;
use crate::error::FarmError;
use crate::state::{FarmConfig, Pool};

#[derive(Accounts)]
pub struct FarmAdmin<'info> {
  pub authority: Signer<'info>,

  #[account(
    mut,
    seeds = [FARM_SEED, farm.reward_mint.as_ref()],
    bump = farm.bump,
    has_one = authority @ FarmError::Unauthorized,
  )]
  pub farm: Box<Account<'info, FarmConfig>>,
}

/// Deserialize the farm's pools passed as remaining accounts.
/// Ownership and discriminator are checked by `Account::try_from`.
pub fn load_farm_pools<'info>(
  farm: &Pubkey,
  accounts: &'info [AccountInfo<'info>],
) -> Result<Vec<Account<'info, Pool>>> {
  accounts
    .iter()
    .map(|info| {
      let pool = Account::<'info, Pool>::try_from(info)?;
      require_keys_eq!(pool.farm, *farm, FarmError::InvalidAccountState);
      Ok(pool)
    })
    .collect()
}
