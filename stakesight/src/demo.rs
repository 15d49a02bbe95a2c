//! Demo mode simulation engine.
//!
//! An in-process chain that stands in for a browser wallet, the staking
//! token and the staking pool, plus a random-walk price feed. It lets the
//! dashboard run end to end without a node or an extension.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256, address, keccak256};
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use stakesight_common::{DashboardConfig, NetworkDescriptor, parse_units};
use stakesight_framework::{
    BoxFuture, ChainError, ChainResult, PendingTx, Receipt, StakingPool, TokenContract,
    WalletError, WalletProvider, WalletResult,
};

/// Account the simulated wallet signs with.
pub const DEMO_ACCOUNT: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Another staker, so the demo account only earns a share of the rewards.
pub const EXTERNAL_STAKER: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

/// Chain the simulated wallet is on before the dashboard switches it.
pub const DEMO_START_CHAIN: u64 = 1;

/// A state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Approve {
        owner: Address,
        spender: Address,
        amount: U256,
    },
    Stake {
        account: Address,
        amount: U256,
    },
    Withdraw {
        account: Address,
        amount: U256,
    },
    Claim {
        account: Address,
    },
}

impl Op {
    fn label(&self) -> &'static str {
        match self {
            Op::Approve { .. } => "approve",
            Op::Stake { .. } => "stake",
            Op::Withdraw { .. } => "withdraw",
            Op::Claim { .. } => "claimReward",
        }
    }
}

/// Token and pool state.
#[derive(Debug, Clone)]
struct Ledger {
    chain_id: u64,
    known_chains: Vec<u64>,
    block_number: u64,
    nonce: u64,
    pool: Address,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    stakes: HashMap<Address, U256>,
    rewards: HashMap<Address, U256>,
    total_staked: U256,
    /// Rewards emitted per second across all stakers.
    reward_rate: U256,
    last_accrual: Instant,
}

impl Ledger {
    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn staked(&self, account: Address) -> U256 {
        self.stakes.get(&account).copied().unwrap_or_default()
    }

    fn earned(&self, account: Address) -> U256 {
        self.rewards.get(&account).copied().unwrap_or_default()
    }

    /// Distribute rewards emitted since the last accrual by stake share.
    fn accrue(&mut self, now: Instant) {
        let elapsed_ms = now.saturating_duration_since(self.last_accrual).as_millis();
        self.last_accrual = now;

        if elapsed_ms == 0 || self.total_staked.is_zero() {
            return;
        }

        let emitted = self.reward_rate * U256::from(elapsed_ms) / U256::from(1000u64);
        for (account, stake) in &self.stakes {
            let share = emitted * *stake / self.total_staked;
            *self.rewards.entry(*account).or_default() += share;
        }
    }

    /// Validate and apply `op`, reverting with the contract's message.
    fn execute(&mut self, op: Op, now: Instant) -> Result<(), String> {
        self.accrue(now);

        match op {
            Op::Approve {
                owner,
                spender,
                amount,
            } => {
                self.allowances.insert((owner, spender), amount);
            }
            Op::Stake { account, amount } => {
                if amount.is_zero() {
                    return Err("Cannot stake 0".to_string());
                }
                let allowance = self
                    .allowances
                    .get(&(account, self.pool))
                    .copied()
                    .unwrap_or_default();
                if allowance < amount {
                    return Err("ERC20: insufficient allowance".to_string());
                }
                let balance = self.balance_of(account);
                if balance < amount {
                    return Err("ERC20: transfer amount exceeds balance".to_string());
                }

                self.allowances.insert((account, self.pool), allowance - amount);
                self.balances.insert(account, balance - amount);
                *self.stakes.entry(account).or_default() += amount;
                self.total_staked += amount;
            }
            Op::Withdraw { account, amount } => {
                if amount.is_zero() {
                    return Err("Cannot withdraw 0".to_string());
                }
                let staked = self.staked(account);
                if staked < amount {
                    return Err("Cannot withdraw more than staked".to_string());
                }

                self.stakes.insert(account, staked - amount);
                self.total_staked -= amount;
                *self.balances.entry(account).or_default() += amount;
            }
            Op::Claim { account } => {
                let earned = self.earned(account);
                if earned.is_zero() {
                    return Err("No rewards to claim".to_string());
                }

                self.rewards.insert(account, U256::ZERO);
                *self.balances.entry(account).or_default() += earned;
            }
        }

        Ok(())
    }
}

/// Shared handle to the simulated chain.
#[derive(Clone)]
pub struct SimulatedChain {
    ledger: Arc<Mutex<Ledger>>,
    token: Address,
    pool: Address,
    confirm_delay: Duration,
    read_failure_rate: f64,
}

impl SimulatedChain {
    /// Seed a chain from the demo section of the configuration.
    ///
    /// Amounts that fail to parse fall back to zero with a warning.
    pub fn new(config: &DashboardConfig) -> Self {
        let decimals = config.contracts.decimals;
        let amount = |field: &str, value: &str| {
            parse_units(value, decimals).unwrap_or_else(|e| {
                tracing::warn!(field, error = %e, "Invalid demo amount, using 0");
                U256::ZERO
            })
        };

        let initial_balance = amount("initial_balance", &config.demo.initial_balance);
        let external_stake = amount("external_stake", &config.demo.external_stake);
        let reward_rate = amount("reward_rate_per_sec", &config.demo.reward_rate_per_sec);
        let pool = config.contracts.staking_pool;

        let mut ledger = Ledger {
            chain_id: DEMO_START_CHAIN,
            known_chains: vec![DEMO_START_CHAIN],
            block_number: 1,
            nonce: 0,
            pool,
            balances: HashMap::from([(DEMO_ACCOUNT, initial_balance)]),
            allowances: HashMap::new(),
            stakes: HashMap::new(),
            rewards: HashMap::new(),
            total_staked: U256::ZERO,
            reward_rate,
            last_accrual: Instant::now(),
        };

        if !external_stake.is_zero() {
            ledger.stakes.insert(EXTERNAL_STAKER, external_stake);
            ledger.total_staked = external_stake;
        }

        tracing::info!(
            token = %config.contracts.token,
            pool = %pool,
            confirm_delay_ms = config.demo.confirm_delay_ms,
            "Simulated chain ready"
        );

        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            token: config.contracts.token,
            pool,
            confirm_delay: Duration::from_millis(config.demo.confirm_delay_ms),
            read_failure_rate: config.demo.read_failure_rate,
        }
    }

    /// Wallet bound to [`DEMO_ACCOUNT`].
    pub fn wallet(&self) -> SimulatedWallet {
        SimulatedWallet {
            chain: self.clone(),
            account: DEMO_ACCOUNT,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.ledger.lock().chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.ledger.lock().block_number
    }

    fn read(&self, f: impl FnOnce(&Ledger) -> U256) -> ChainResult<U256> {
        if self.read_failure_rate > 0.0 && rand::rng().random_bool(self.read_failure_rate) {
            return Err(ChainError::Transport("simulated RPC timeout".to_string()));
        }

        let mut ledger = self.ledger.lock();
        ledger.accrue(Instant::now());
        Ok(f(&ledger))
    }

    /// Submit `op`: revert now if it would fail, otherwise mine it after
    /// the confirmation delay.
    fn submit(&self, op: Op) -> ChainResult<PendingTx> {
        let hash = {
            let mut ledger = self.ledger.lock();
            // Estimate against a copy, like eth_estimateGas
            ledger
                .clone()
                .execute(op, Instant::now())
                .map_err(ChainError::reverted)?;

            ledger.nonce += 1;
            TxHash::from(keccak256(ledger.nonce.to_be_bytes()))
        };

        tracing::debug!(op = op.label(), tx = %hash, "Simulated transaction submitted");

        let chain = self.clone();
        Ok(PendingTx::new(hash, async move {
            tokio::time::sleep(chain.confirm_delay).await;

            let mut ledger = chain.ledger.lock();
            ledger
                .execute(op, Instant::now())
                .map_err(ChainError::reverted)?;
            ledger.block_number += 1;

            Ok(Receipt {
                tx_hash: hash,
                block_number: ledger.block_number,
            })
        }))
    }
}

/// Wallet provider backed by a [`SimulatedChain`].
///
/// Starts on mainnet without the dashboard's network, so connecting walks
/// through switch, add and switch again.
#[derive(Clone)]
pub struct SimulatedWallet {
    chain: SimulatedChain,
    account: Address,
}

impl SimulatedWallet {
    /// Chain and wallet seeded from `config`.
    pub fn new(config: &DashboardConfig) -> Self {
        SimulatedChain::new(config).wallet()
    }

    pub fn chain(&self) -> &SimulatedChain {
        &self.chain
    }
}

impl WalletProvider for SimulatedWallet {
    fn enable(&self, app_name: String) -> BoxFuture<'_, WalletResult<Vec<Address>>> {
        Box::pin(async move {
            tracing::debug!(app = %app_name, "Simulated wallet authorizing");
            Ok(vec![self.account])
        })
    }

    fn chain_id(&self) -> BoxFuture<'_, WalletResult<u64>> {
        Box::pin(async move { Ok(self.chain.chain_id()) })
    }

    fn switch_chain(&self, chain_id: u64) -> BoxFuture<'_, WalletResult<()>> {
        Box::pin(async move {
            let mut ledger = self.chain.ledger.lock();
            if !ledger.known_chains.contains(&chain_id) {
                return Err(WalletError::rpc(
                    stakesight_framework::UNKNOWN_CHAIN_CODE,
                    format!("Unrecognized chain ID {chain_id:#x}"),
                ));
            }
            ledger.chain_id = chain_id;
            Ok(())
        })
    }

    fn add_chain(&self, network: NetworkDescriptor) -> BoxFuture<'_, WalletResult<()>> {
        Box::pin(async move {
            tracing::debug!(
                params = %network.add_chain_params(),
                "Simulated wallet adding network"
            );
            let mut ledger = self.chain.ledger.lock();
            if !ledger.known_chains.contains(&network.chain_id) {
                ledger.known_chains.push(network.chain_id);
            }
            Ok(())
        })
    }

    fn signer(&self) -> BoxFuture<'_, WalletResult<Address>> {
        Box::pin(async move { Ok(self.account) })
    }

    fn token(&self, address: Address) -> Arc<dyn TokenContract> {
        if address != self.chain.token {
            tracing::warn!(
                requested = %address,
                deployed = %self.chain.token,
                "Unknown token address"
            );
        }
        Arc::new(SimulatedToken {
            chain: self.chain.clone(),
            address,
            owner: self.account,
        })
    }

    fn staking_pool(&self, address: Address) -> Arc<dyn StakingPool> {
        if address != self.chain.pool {
            tracing::warn!(
                requested = %address,
                deployed = %self.chain.pool,
                "Unknown pool address"
            );
        }
        Arc::new(SimulatedPool {
            chain: self.chain.clone(),
            address,
            account: self.account,
        })
    }
}

struct SimulatedToken {
    chain: SimulatedChain,
    address: Address,
    owner: Address,
}

impl TokenContract for SimulatedToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, owner: Address) -> BoxFuture<'_, ChainResult<U256>> {
        Box::pin(async move { self.chain.read(|ledger| ledger.balance_of(owner)) })
    }

    fn approve(&self, spender: Address, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>> {
        Box::pin(async move {
            self.chain.submit(Op::Approve {
                owner: self.owner,
                spender,
                amount,
            })
        })
    }
}

struct SimulatedPool {
    chain: SimulatedChain,
    address: Address,
    account: Address,
}

impl StakingPool for SimulatedPool {
    fn address(&self) -> Address {
        self.address
    }

    fn staked_balance(&self, account: Address) -> BoxFuture<'_, ChainResult<U256>> {
        Box::pin(async move { self.chain.read(|ledger| ledger.staked(account)) })
    }

    fn earned(&self, account: Address) -> BoxFuture<'_, ChainResult<U256>> {
        Box::pin(async move { self.chain.read(|ledger| ledger.earned(account)) })
    }

    fn total_staked(&self) -> BoxFuture<'_, ChainResult<U256>> {
        Box::pin(async move { self.chain.read(|ledger| ledger.total_staked) })
    }

    fn stake(&self, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>> {
        Box::pin(async move {
            self.chain.submit(Op::Stake {
                account: self.account,
                amount,
            })
        })
    }

    fn withdraw(&self, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>> {
        Box::pin(async move {
            self.chain.submit(Op::Withdraw {
                account: self.account,
                amount,
            })
        })
    }

    fn claim_reward(&self) -> BoxFuture<'_, ChainResult<PendingTx>> {
        Box::pin(async move {
            self.chain.submit(Op::Claim {
                account: self.account,
            })
        })
    }
}

/// Random-walk price feed for the staked token.
pub struct PriceSimulator {
    rng: SmallRng,
    price: f64,
    anchor: f64,
    /// Largest relative move per step.
    volatility: f64,
}

impl PriceSimulator {
    pub fn new(start: f64) -> Self {
        Self::with_rng(start, SmallRng::from_os_rng())
    }

    /// Reproducible feed.
    pub fn seeded(start: f64, seed: u64) -> Self {
        Self::with_rng(start, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(start: f64, rng: SmallRng) -> Self {
        let start = if start.is_finite() && start > 0.0 {
            start
        } else {
            1.0
        };
        Self {
            rng,
            price: start,
            anchor: start,
            volatility: 0.004,
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Advance one step and return the new price.
    ///
    /// Moves are bounded by the volatility, pulled gently back towards the
    /// starting price, and never go below 1% of it.
    pub fn next_price(&mut self) -> f64 {
        let noise = self.rng.random_range(-1.0..1.0) * self.volatility * self.price;
        let reversion = (self.anchor - self.price) * 0.02;

        self.price = (self.price + noise + reversion).max(self.anchor * 0.01);
        self.price
    }
}

impl Default for PriceSimulator {
    fn default() -> Self {
        Self::new(1.0)
    }
}
