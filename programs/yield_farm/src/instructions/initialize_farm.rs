//! Initialize instruction - sets up the farm
//! Creates FarmConfig, the reward mint, reward custody and the protocol fee account

use anchor_lang::prelude::*;
use anchor_spl::{
  associated_token::AssociatedToken,
  token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::*;
use crate::events::FarmInitialized;
use crate::farm::{set_farm_params, Tick};
use crate::state::*;

pub fn handler(
  ctx: Context<InitializeFarm>,
  emission_per_block: u64,
  protocol_fee_bps: u64,
  reward_cap: u64,
) -> Result<()> {
  let tick = Tick::now()?;
  let farm = &mut ctx.accounts.farm;

  farm.authority = ctx.accounts.authority.key();
  farm.reward_mint = ctx.accounts.reward_mint.key();
  farm.reward_vault = ctx.accounts.reward_vault.key();
  farm.reward_fee_account = ctx.accounts.reward_fee_account.key();

  set_farm_params(farm, emission_per_block, protocol_fee_bps)?;
  farm.reward_cap = reward_cap;

  farm.total_alloc_weight = 0;
  farm.pool_count = 0;
  farm.bonus_minted = 0;

  farm.engine = MultiplierEngine::with_defaults();
  farm.engine.market.updated_at = tick.timestamp;

  farm.bump = ctx.bumps.farm;
  farm.vault_bump = ctx.bumps.reward_vault;

  msg!("Farm initialized!");
  msg!("Reward mint: {}", farm.reward_mint);
  msg!("Emission: {} per block", emission_per_block);
  msg!("Protocol fee: {}bps", protocol_fee_bps);
  msg!("Reward cap: {}", reward_cap);

  emit!(FarmInitialized {
    authority: farm.authority,
    reward_mint: farm.reward_mint,
    reward_vault: farm.reward_vault,
    emission_per_block,
    protocol_fee_bps,
    reward_cap,
    timestamp: tick.timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct InitializeFarm<'info> {
  #[account(mut)]
  pub authority: Signer<'info>,

  /// FarmConfig PDA - one per reward mint
  #[account(
    init,
    payer = authority,
    space = FarmConfig::LEN,
    seeds = [FARM_SEED, reward_mint.key().as_ref()],
    bump
  )]
  pub farm: Box<Account<'info, FarmConfig>>,

  /// Reward token mint, minted only by the farm PDA
  #[account(
    init,
    payer = authority,
    mint::decimals = REWARD_DECIMALS,
    mint::authority = farm,
    mint::token_program = token_program,
  )]
  pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Reward custody - minted emission waits here until harvested
  #[account(
    init,
    payer = authority,
    seeds = [REWARD_VAULT_SEED, farm.key().as_ref()],
    bump,
    token::mint = reward_mint,
    token::authority = farm,
    token::token_program = token_program,
  )]
  pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

  /// Receives the protocol fee skimmed from harvests
  #[account(
    init,
    payer = authority,
    associated_token::mint = reward_mint,
    associated_token::authority = fee_recipient,
    associated_token::token_program = token_program,
  )]
  pub reward_fee_account: Box<InterfaceAccount<'info, TokenAccount>>,

  /// CHECK: Any wallet; only used as the fee account owner
  pub fee_recipient: UncheckedAccount<'info>,

  pub token_program: Interface<'info, TokenInterface>,
  pub associated_token_program: Program<'info, AssociatedToken>,
  pub system_program: Program<'info, System>,
}
