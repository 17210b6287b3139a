//! Balance service seen by the farm controller
//!
//! The controller never talks to a token program directly. It asks a `TokenLedger` to
//! mint into custody, pay out of custody, or pull a deposit into custody. On-chain the
//! ledger is `SplTokenLedger`, a thin wrapper over token-interface CPIs signed by the
//! farm PDA.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, MintTo, TokenAccount, TransferChecked};

use crate::error::FarmError;

/// Atomic balance operations on one asset with one custody account.
///
/// Each call either fully succeeds or fails with `InsufficientFunds` / `CapExceeded`.
pub trait TokenLedger {
  /// Custody account of this asset held by the farm
  fn custody(&self) -> Pubkey;

  /// Create `amount` new units in `to`
  fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

  /// Move `amount` out of custody into `to`
  fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

  /// Move `amount` from a depositor's account into custody
  fn collect(&mut self, from: &Pubkey, amount: u64) -> Result<()>;

  fn balance_of(&self, account: &Pubkey) -> u64;
}

/// SPL token / token-2022 ledger for a single mint.
///
/// Out-flows from custody and mints are signed by `authority` with `signer_seeds`;
/// `collect` is signed by the depositor supplied with `with_depositor`.
pub struct SplTokenLedger<'a, 'info> {
  token_program: AccountInfo<'info>,
  mint: AccountInfo<'info>,
  decimals: u8,
  custody: AccountInfo<'info>,
  authority: AccountInfo<'info>,
  signer_seeds: &'a [&'a [&'a [u8]]],
  depositor: Option<AccountInfo<'info>>,
  counterparties: Vec<AccountInfo<'info>>,
  supply_cap: Option<u64>,
}

impl<'a, 'info> SplTokenLedger<'a, 'info> {
  pub fn new(
    token_program: AccountInfo<'info>,
    mint: &InterfaceAccount<'info, Mint>,
    custody: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &'a [&'a [&'a [u8]]],
  ) -> Self {
    Self {
      token_program,
      mint: mint.to_account_info(),
      decimals: mint.decimals,
      custody,
      authority,
      signer_seeds,
      depositor: None,
      counterparties: Vec::new(),
      supply_cap: None,
    }
  }

  /// Signer allowed to move funds into custody
  pub fn with_depositor(mut self, depositor: AccountInfo<'info>) -> Self {
    self.depositor = Some(depositor);
    self
  }

  /// Token account that may appear as a transfer target or source
  pub fn with_counterparty(mut self, account: AccountInfo<'info>) -> Self {
    self.counterparties.push(account);
    self
  }

  /// Refuse mints that would push supply above `cap` (0 = uncapped)
  pub fn with_supply_cap(mut self, cap: u64) -> Self {
    self.supply_cap = (cap > 0).then_some(cap);
    self
  }

  fn account(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
    if self.custody.key == key {
      return Ok(self.custody.clone());
    }
    self
      .counterparties
      .iter()
      .find(|info| info.key == key)
      .cloned()
      .ok_or_else(|| error!(FarmError::UnknownTokenAccount))
  }

  fn current_supply(&self) -> Result<u64> {
    let data = self.mint.try_borrow_data()?;
    Ok(Mint::try_deserialize(&mut &data[..])?.supply)
  }
}

impl<'a, 'info> TokenLedger for SplTokenLedger<'a, 'info> {
  fn custody(&self) -> Pubkey {
    self.custody.key()
  }

  fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
    if amount == 0 {
      return Ok(());
    }

    if let Some(cap) = self.supply_cap {
      let next_supply = self
        .current_supply()?
        .checked_add(amount)
        .ok_or(FarmError::CapExceeded)?;
      require!(next_supply <= cap, FarmError::CapExceeded);
    }

    let mint_to = MintTo {
      mint: self.mint.clone(),
      to: self.account(to)?,
      authority: self.authority.clone(),
    };
    token_interface::mint_to(
      CpiContext::new_with_signer(self.token_program.clone(), mint_to, self.signer_seeds),
      amount,
    )
  }

  fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
    if amount == 0 {
      return Ok(());
    }
    require!(self.balance_of(&self.custody.key()) >= amount, FarmError::InsufficientFunds);

    let transfer = TransferChecked {
      from: self.custody.clone(),
      mint: self.mint.clone(),
      to: self.account(to)?,
      authority: self.authority.clone(),
    };
    token_interface::transfer_checked(
      CpiContext::new_with_signer(self.token_program.clone(), transfer, self.signer_seeds),
      amount,
      self.decimals,
    )
  }

  fn collect(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
    if amount == 0 {
      return Ok(());
    }
    require!(self.balance_of(from) >= amount, FarmError::InsufficientFunds);

    let depositor = self
      .depositor
      .clone()
      .ok_or(FarmError::InvalidAccountState)?;

    let transfer = TransferChecked {
      from: self.account(from)?,
      mint: self.mint.clone(),
      to: self.custody.clone(),
      authority: depositor,
    };
    token_interface::transfer_checked(
      CpiContext::new(self.token_program.clone(), transfer),
      amount,
      self.decimals,
    )
  }

  fn balance_of(&self, account: &Pubkey) -> u64 {
    let Ok(info) = self.account(account) else {
      return 0;
    };
    let Ok(data) = info.try_borrow_data() else {
      return 0;
    };
    TokenAccount::try_deserialize(&mut &data[..])
      .map(|token_account| token_account.amount)
      .unwrap_or(0)
  }
}
