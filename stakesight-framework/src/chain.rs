//! Contract surfaces consumed by the dashboard.
//!
//! The token and staking pool are external systems. These traits describe
//! only the view and write calls the dashboard issues; encoding, signing
//! and broadcast live behind the implementation.

use std::future::Future;
use std::pin::Pin;

use alloy_primitives::{Address, TxHash, U256};

use crate::error::ChainResult;

/// Boxed, sendable future returned by the object-safe contract traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Confirmation details of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// A submitted transaction awaiting confirmation.
pub struct PendingTx {
    hash: TxHash,
    confirmation: BoxFuture<'static, ChainResult<Receipt>>,
}

impl PendingTx {
    pub fn new(
        hash: TxHash,
        confirmation: impl Future<Output = ChainResult<Receipt>> + Send + 'static,
    ) -> Self {
        Self {
            hash,
            confirmation: Box::pin(confirmation),
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Wait until the transaction is mined.
    pub async fn confirmed(self) -> ChainResult<Receipt> {
        self.confirmation.await
    }
}

impl std::fmt::Debug for PendingTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTx").field("hash", &self.hash).finish()
    }
}

/// ERC-20 token bound to the connected signer.
pub trait TokenContract: Send + Sync {
    /// Contract address.
    fn address(&self) -> Address;

    /// `balanceOf(owner)`.
    fn balance_of(&self, owner: Address) -> BoxFuture<'_, ChainResult<U256>>;

    /// `approve(spender, amount)`.
    fn approve(&self, spender: Address, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>>;
}

/// Staking pool bound to the connected signer.
pub trait StakingPool: Send + Sync {
    /// Contract address.
    fn address(&self) -> Address;

    /// `stakedBalance(account)`.
    fn staked_balance(&self, account: Address) -> BoxFuture<'_, ChainResult<U256>>;

    /// `earned(account)`.
    fn earned(&self, account: Address) -> BoxFuture<'_, ChainResult<U256>>;

    /// `totalStaked()`.
    fn total_staked(&self) -> BoxFuture<'_, ChainResult<U256>>;

    /// `stake(amount)`.
    fn stake(&self, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>>;

    /// `withdraw(amount)`.
    fn withdraw(&self, amount: U256) -> BoxFuture<'_, ChainResult<PendingTx>>;

    /// `claimReward()`.
    fn claim_reward(&self) -> BoxFuture<'_, ChainResult<PendingTx>>;
}
