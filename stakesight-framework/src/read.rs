//! Read cycles: concurrent read-only queries joined into per-slot readings.

use std::fmt;

use alloy_primitives::U256;
use stakesight_common::units::to_display;

use crate::chain::BoxFuture;
use crate::error::{ChainError, ChainResult};

/// The on-chain quantity behind a display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadSource {
    /// Token `balanceOf(account)`.
    WalletBalance,
    /// Pool `stakedBalance(account)`.
    StakedBalance,
    /// Pool `earned(account)`.
    Earned,
    /// Pool `totalStaked()`.
    TotalStaked,
}

impl ReadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadSource::WalletBalance => "wallet_balance",
            ReadSource::StakedBalance => "staked_balance",
            ReadSource::Earned => "earned",
            ReadSource::TotalStaked => "total_staked",
        }
    }
}

impl fmt::Display for ReadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pending read-only query for one slot.
pub struct ReadQuery {
    source: ReadSource,
    future: BoxFuture<'static, ChainResult<U256>>,
}

impl ReadQuery {
    pub fn new(
        source: ReadSource,
        future: impl std::future::Future<Output = ChainResult<U256>> + Send + 'static,
    ) -> Self {
        Self {
            source,
            future: Box::pin(future),
        }
    }

    pub fn source(&self) -> ReadSource {
        self.source
    }
}

impl fmt::Debug for ReadQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadQuery")
            .field("source", &self.source)
            .finish()
    }
}

/// Outcome of one query in a read cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub source: ReadSource,
    pub value: ChainResult<f64>,
}

impl Reading {
    pub fn ok(source: ReadSource, value: f64) -> Self {
        Self {
            source,
            value: Ok(value),
        }
    }

    pub fn failed(source: ReadSource, error: ChainError) -> Self {
        Self {
            source,
            value: Err(error),
        }
    }
}

/// Issue all queries concurrently and wait for every one of them.
///
/// A failing query yields an `Err` reading for its slot only; the other
/// readings are unaffected. Raw amounts are scaled by `decimals`.
pub async fn run_read_cycle(queries: Vec<ReadQuery>, decimals: u8) -> Vec<Reading> {
    let handles: Vec<_> = queries
        .into_iter()
        .map(|query| (query.source, tokio::spawn(query.future)))
        .collect();

    let mut readings = Vec::with_capacity(handles.len());
    for (source, handle) in handles {
        let value = match handle.await {
            Ok(Ok(raw)) => Ok(to_display(raw, decimals)),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(ChainError::Transport(format!("query task failed: {}", e))),
        };

        if let Err(ref e) = value {
            tracing::debug!(
                slot = %source,
                error = %e,
                "Read query failed, keeping previous value"
            );
        }

        readings.push(Reading { source, value });
    }

    readings
}
