//! Wallet provider boundary and network negotiation.

use std::sync::Arc;

use alloy_primitives::Address;
use stakesight_common::NetworkDescriptor;

use crate::chain::{BoxFuture, StakingPool, TokenContract};
use crate::error::{WalletError, WalletResult};

/// A wallet able to authorize the dashboard and sign transactions.
///
/// Mirrors the capability object exposed by browser wallets: account
/// access, network inspection and switching, and signer-bound contract
/// handles.
pub trait WalletProvider: Send + Sync {
    /// Request account access on behalf of `app_name`.
    fn enable(&self, app_name: String) -> BoxFuture<'_, WalletResult<Vec<Address>>>;

    /// Chain id the wallet is currently connected to.
    fn chain_id(&self) -> BoxFuture<'_, WalletResult<u64>>;

    /// `wallet_switchEthereumChain`.
    fn switch_chain(&self, chain_id: u64) -> BoxFuture<'_, WalletResult<()>>;

    /// `wallet_addEthereumChain` with the descriptor passed verbatim.
    fn add_chain(&self, network: NetworkDescriptor) -> BoxFuture<'_, WalletResult<()>>;

    /// Address of the signer used for writes.
    fn signer(&self) -> BoxFuture<'_, WalletResult<Address>>;

    /// Token contract bound to the signer.
    fn token(&self, address: Address) -> Arc<dyn TokenContract>;

    /// Staking pool bound to the signer.
    fn staking_pool(&self, address: Address) -> Arc<dyn StakingPool>;
}

/// Make sure the wallet is on `network`, switching or adding it if needed.
///
/// A switch rejected with the unknown-chain code falls back to adding the
/// network. A user rejection at any point surfaces as
/// [`WalletError::UserRejected`].
pub async fn ensure_network(
    wallet: &dyn WalletProvider,
    network: &NetworkDescriptor,
) -> WalletResult<()> {
    let current = wallet.chain_id().await.map_err(WalletError::normalize)?;
    if current == network.chain_id {
        return Ok(());
    }

    tracing::info!(current, expected = network.chain_id, "Requesting network switch");

    match wallet.switch_chain(network.chain_id).await {
        Ok(()) => {}
        Err(e) if e.is_unknown_chain() => {
            tracing::info!(network = %network, "Network unknown to wallet, adding it");
            wallet
                .add_chain(network.clone())
                .await
                .map_err(WalletError::normalize)?;
            wallet
                .switch_chain(network.chain_id)
                .await
                .map_err(WalletError::normalize)?;
        }
        Err(e) => return Err(e.normalize()),
    }

    let actual = wallet.chain_id().await.map_err(WalletError::normalize)?;
    if actual != network.chain_id {
        return Err(WalletError::WrongNetwork {
            expected: network.to_string(),
            actual,
        });
    }

    Ok(())
}
