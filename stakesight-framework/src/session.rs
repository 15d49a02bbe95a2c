//! Connected wallet session.
//!
//! A [`Session`] owns the wallet and contract handles for the lifetime of
//! a connection and is passed explicitly to whatever needs them.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use stakesight_common::{DashboardConfig, NetworkDescriptor, format_units};

use crate::action::{ActionKind, ActionPlan, ActionStep};
use crate::chain::{StakingPool, TokenContract};
use crate::error::{WalletError, WalletResult};
use crate::read::{ReadQuery, ReadSource};
use crate::wallet::{WalletProvider, ensure_network};

/// Handles created on a successful connect.
#[derive(Clone)]
pub struct Session {
    account: Address,
    network: NetworkDescriptor,
    token_symbol: String,
    decimals: u8,
    wallet: Arc<dyn WalletProvider>,
    token: Arc<dyn TokenContract>,
    pool: Arc<dyn StakingPool>,
}

impl Session {
    /// Authorize with the wallet, settle the network and bind contracts.
    pub async fn connect(
        wallet: Arc<dyn WalletProvider>,
        config: &DashboardConfig,
    ) -> WalletResult<Self> {
        tracing::info!(app = %config.app_name, "Requesting wallet access");

        let accounts = wallet
            .enable(config.app_name.clone())
            .await
            .map_err(WalletError::normalize)?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }

        ensure_network(wallet.as_ref(), &config.network).await?;

        let account = wallet.signer().await.map_err(WalletError::normalize)?;
        let token = wallet.token(config.contracts.token);
        let pool = wallet.staking_pool(config.contracts.staking_pool);

        tracing::info!(
            account = %account,
            network = %config.network,
            token = %token.address(),
            pool = %pool.address(),
            "Wallet connected"
        );

        Ok(Self {
            account,
            network: config.network.clone(),
            token_symbol: config.contracts.token_symbol.clone(),
            decimals: config.contracts.decimals,
            wallet,
            token,
            pool,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    pub fn token_symbol(&self) -> &str {
        &self.token_symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    /// Build the read query behind `source`.
    pub fn query(&self, source: ReadSource) -> ReadQuery {
        let account = self.account;
        match source {
            ReadSource::WalletBalance => {
                let token = self.token.clone();
                ReadQuery::new(source, async move { token.balance_of(account).await })
            }
            ReadSource::StakedBalance => {
                let pool = self.pool.clone();
                ReadQuery::new(source, async move { pool.staked_balance(account).await })
            }
            ReadSource::Earned => {
                let pool = self.pool.clone();
                ReadQuery::new(source, async move { pool.earned(account).await })
            }
            ReadSource::TotalStaked => {
                let pool = self.pool.clone();
                ReadQuery::new(source, async move { pool.total_staked().await })
            }
        }
    }

    /// Build queries for every source.
    pub fn queries(&self, sources: &[ReadSource]) -> Vec<ReadQuery> {
        sources.iter().map(|source| self.query(*source)).collect()
    }

    /// Build the ordered steps for an action.
    ///
    /// Staking approves the pool for `amount` before staking it. `amount`
    /// is ignored for claims.
    pub fn plan(&self, kind: ActionKind, amount: U256) -> ActionPlan {
        let amount_text = format_units(amount, self.decimals);
        let pool_address = self.pool.address();

        match kind {
            ActionKind::Stake => {
                let token = self.token.clone();
                let pool = self.pool.clone();
                ActionPlan::new(
                    kind,
                    kind.success_message(Some(&amount_text), &self.token_symbol),
                )
                .step(ActionStep::new("Approving...", move || {
                    Box::pin(async move { token.approve(pool_address, amount).await })
                }))
                .step(ActionStep::new("Staking...", move || {
                    Box::pin(async move { pool.stake(amount).await })
                }))
            }
            ActionKind::Withdraw => {
                let pool = self.pool.clone();
                ActionPlan::new(
                    kind,
                    kind.success_message(Some(&amount_text), &self.token_symbol),
                )
                .step(ActionStep::new("Withdrawing...", move || {
                    Box::pin(async move { pool.withdraw(amount).await })
                }))
            }
            ActionKind::Claim => {
                let pool = self.pool.clone();
                ActionPlan::new(kind, kind.success_message(None, &self.token_symbol)).step(
                    ActionStep::new("Claiming rewards...", move || {
                        Box::pin(async move { pool.claim_reward().await })
                    }),
                )
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("network", &self.network.chain_id)
            .field("token", &self.token.address())
            .field("pool", &self.pool.address())
            .finish()
    }
}
