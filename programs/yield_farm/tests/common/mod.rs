#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::prelude::*;
use yield_farm::error::FarmError;
use yield_farm::farm::{self, Depositor, PoolParams, Tick};
use yield_farm::state::{FarmConfig, MultiplierEngine, Pool, UserPosition};
use yield_farm::token_ledger::TokenLedger;

/// In-memory balance service for one asset
#[derive(Clone, Debug)]
pub struct MemoryLedger {
    custody: Pubkey,
    balances: HashMap<Pubkey, u64>,
    supply: u64,
    cap: Option<u64>,
}

impl MemoryLedger {
    pub fn new(custody: Pubkey) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
            supply: 0,
            cap: None,
        }
    }

    pub fn with_cap(mut self, cap: u64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Credit `amount` out of thin air (test setup)
    pub fn fund(&mut self, account: &Pubkey, amount: u64) {
        *self.balances.entry(*account).or_default() += amount;
        self.supply += amount;
    }

    pub fn supply(&self) -> u64 {
        self.supply
    }

    fn debit(&mut self, account: &Pubkey, amount: u64) -> Result<()> {
        let balance = self.balances.entry(*account).or_default();
        require!(*balance >= amount, FarmError::InsufficientFunds);
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, account: &Pubkey, amount: u64) {
        *self.balances.entry(*account).or_default() += amount;
    }
}

impl TokenLedger for MemoryLedger {
    fn custody(&self) -> Pubkey {
        self.custody
    }

    fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        let next_supply = self.supply.checked_add(amount).ok_or(FarmError::CapExceeded)?;
        if let Some(cap) = self.cap {
            require!(next_supply <= cap, FarmError::CapExceeded);
        }
        self.supply = next_supply;
        self.credit(to, amount);
        Ok(())
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        let custody = self.custody;
        self.debit(&custody, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    fn collect(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.debit(from, amount)?;
        let custody = self.custody;
        self.credit(&custody, amount);
        Ok(())
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}

pub struct Staker {
    pub position: UserPosition,
    pub depositor: Depositor,
}

impl Staker {
    pub fn new(pool: Pubkey) -> Self {
        Self {
            position: UserPosition {
                owner: Pubkey::new_unique(),
                pool,
                ..Default::default()
            },
            depositor: Depositor {
                stake_account: Pubkey::new_unique(),
                reward_account: Pubkey::new_unique(),
            },
        }
    }
}

/// Farm with one staked asset shared by every pool in the test
pub struct Harness {
    pub farm: FarmConfig,
    pub pools: Vec<Pool>,
    pub stake: MemoryLedger,
    pub rewards: MemoryLedger,
}

impl Harness {
    pub fn new(emission_per_block: u64, protocol_fee_bps: u64) -> Self {
        let reward_vault = Pubkey::new_unique();
        let mut farm = FarmConfig {
            authority: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            reward_vault,
            reward_fee_account: Pubkey::new_unique(),
            engine: MultiplierEngine::with_defaults(),
            ..Default::default()
        };
        farm::set_farm_params(&mut farm, emission_per_block, protocol_fee_bps).unwrap();

        Self {
            farm,
            pools: Vec::new(),
            stake: MemoryLedger::new(Pubkey::new_unique()),
            rewards: MemoryLedger::new(reward_vault),
        }
    }

    pub fn add_pool(&mut self, block: u64, params: PoolParams) -> usize {
        let mut pool = Pool {
            farm: Pubkey::new_unique(),
            stake_mint: Pubkey::new_unique(),
            stake_vault: self.stake.custody(),
            fee_account: Pubkey::new_unique(),
            ..Default::default()
        };
        let existing: Vec<&Pool> = self.pools.iter().collect();
        farm::add_pool(&mut self.farm, &mut pool, &existing, Tick::new(block, 0), params).unwrap();
        self.pools.push(pool);
        self.pools.len() - 1
    }

    /// Settle every pool through `tick`, returning the total minted
    pub fn settle_all(&mut self, tick: Tick) -> u64 {
        let mut minted = 0;
        for pool in self.pools.iter_mut() {
            minted += farm::settle_pool(&self.farm, pool, tick, &mut self.rewards).unwrap();
        }
        minted
    }

    pub fn set_pool(&mut self, pool: usize, tick: Tick, params: PoolParams, active: bool) -> Result<u64> {
        let siblings: Vec<Pool> = self
            .pools
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pool)
            .map(|(_, p)| p.clone())
            .collect();
        let siblings: Vec<&Pool> = siblings.iter().collect();
        farm::set_pool(&mut self.farm, &mut self.pools[pool], &siblings, tick, params, active, &mut self.rewards)
    }

    pub fn update_farm_params(&mut self, tick: Tick, emission_per_block: u64, protocol_fee_bps: u64) -> Result<()> {
        let pools: Vec<&Pool> = self.pools.iter().collect();
        farm::update_farm_params(&mut self.farm, &pools, tick, emission_per_block, protocol_fee_bps)
    }

    pub fn staker(&mut self, pool: usize, balance: u64) -> Staker {
        let staker = Staker::new(self.pools[pool].stake_vault);
        self.stake.fund(&staker.depositor.stake_account, balance);
        staker
    }

    pub fn deposit(&mut self, pool: usize, staker: &mut Staker, tick: Tick, amount: u64, tier: u8) -> Result<farm::DepositReceipt> {
        farm::deposit(
            &mut self.farm,
            &mut self.pools[pool],
            &mut staker.position,
            tick,
            amount,
            tier,
            &staker.depositor,
            &mut self.stake,
            &mut self.rewards,
        )
    }

    pub fn withdraw(&mut self, pool: usize, staker: &mut Staker, tick: Tick, amount: u64) -> Result<farm::WithdrawReceipt> {
        farm::withdraw(
            &mut self.farm,
            &mut self.pools[pool],
            &mut staker.position,
            tick,
            amount,
            &staker.depositor,
            &mut self.stake,
            &mut self.rewards,
        )
    }

    pub fn harvest(&mut self, pool: usize, staker: &mut Staker, tick: Tick) -> Result<farm::HarvestReceipt> {
        farm::harvest(
            &mut self.farm,
            &mut self.pools[pool],
            &mut staker.position,
            tick,
            &staker.depositor.reward_account,
            &mut self.rewards,
        )
    }

    pub fn emergency_withdraw(&mut self, pool: usize, staker: &mut Staker) -> Result<u64> {
        farm::emergency_withdraw(
            &mut self.farm,
            &mut self.pools[pool],
            &mut staker.position,
            &staker.depositor.stake_account,
            &mut self.stake,
        )
    }

    pub fn pending(&self, pool: usize, staker: &Staker, block: u64) -> u64 {
        farm::pending_reward(&self.farm, &self.pools[pool], &staker.position, Tick::new(block, 0)).unwrap()
    }
}

pub fn params(alloc_weight: u64) -> PoolParams {
    PoolParams {
        alloc_weight,
        withdrawal_fee_bps: 0,
        penalty_bps: 0,
        min_stake_time: 0,
    }
}

pub fn xorshift64(seed: &mut u64) -> u64 {
    let mut x = *seed;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *seed = x;
    x
}

pub fn rand_range(seed: &mut u64, lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        return lo;
    }
    lo + (xorshift64(seed) % (hi - lo + 1))
}
