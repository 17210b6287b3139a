use anchor_lang::prelude::*;

#[error_code]
#[derive(PartialEq, Eq)]
pub enum FarmError {
  #[msg("Arithmetic overflow - fixed-point result cannot be represented exactly")]
  ArithmeticOverflow,

  #[msg("Invalid parameter value provided")]
  InvalidParameter,

  #[msg("Tier is inactive or does not exist")]
  InactiveTier,

  #[msg("Pool is inactive - deposits are disabled")]
  InactivePool,

  #[msg("Withdrawal exceeds the staked amount of this position")]
  InsufficientStake,

  #[msg("Stake change attempted before the pool was settled for the current block")]
  StaleSettlement,

  #[msg("Insufficient token balance to complete the transfer")]
  InsufficientFunds,

  #[msg("Minting would exceed the reward supply cap")]
  CapExceeded,

  #[msg("Amount must be greater than zero")]
  ZeroAmount,

  #[msg("Position has an active stake - tier cannot be changed until it is fully withdrawn")]
  TierLocked,

  #[msg("Tier lock period cannot change while positions reference it")]
  TierInUse,

  #[msg("Unauthorized: caller is not the farm authority")]
  Unauthorized,

  #[msg("Token account was not supplied to this instruction")]
  UnknownTokenAccount,

  #[msg("Invalid account state - unexpected account configuration")]
  InvalidAccountState,
}
