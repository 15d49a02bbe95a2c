//! StakeSight Framework
//!
//! Building blocks for the staking dashboard, independent of the UI.
//!
//! # Overview
//!
//! This framework provides:
//! - [`Tween`] and [`DisplayValue`] for animated numeric displays
//! - [`PollingPanel`] for slots fed by periodic read cycles, with a status label
//! - [`ActionPlan`] for multi-step writes awaited step by step
//! - [`WalletProvider`], [`TokenContract`] and [`StakingPool`] as the external boundary
//! - [`Session`] for the handles created on connect
//! - [`TaskScope`] and [`HeadlessRunner`] for background scheduling
//! - [`DashboardArgs`] for CLI argument parsing
//!
//! # Example
//!
//! ```ignore
//! use stakesight_framework::{DashboardArgs, HeadlessRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = DashboardArgs::parse();
//!     let config = args.load_config()?;
//!
//!     let mut runner = HeadlessRunner::connect(wallet, &config).await?;
//!     runner.start();
//!
//!     // Run until Ctrl+C
//!     runner.run().await;
//!     Ok(())
//! }
//! ```

pub mod action;
mod args;
pub mod chain;
pub mod display;
mod error;
pub mod panel;
pub mod read;
mod runner;
pub mod schedule;
mod session;
pub mod status;
pub mod tween;
pub mod wallet;

pub use action::{ActionKind, ActionPlan, ActionStep, PREPARING};
pub use args::DashboardArgs;
pub use chain::{BoxFuture, PendingTx, Receipt, StakingPool, TokenContract};
pub use display::{DisplayValue, NumberFormat, format_fixed};
pub use error::{
    ActionError, ChainError, ChainResult, UNKNOWN_CHAIN_CODE, USER_REJECTED_CODE, WalletError,
    WalletResult,
};
pub use panel::{PanelSpec, PollingPanel, Slot, SlotSpec};
pub use read::{ReadQuery, ReadSource, Reading, run_read_cycle};
pub use runner::HeadlessRunner;
pub use schedule::{TaskHandle, TaskScope, animate};
pub use session::Session;
pub use status::{PanelStatus, StatusBoard};
pub use tween::{Easing, Tween};
pub use wallet::{WalletProvider, ensure_network};

// Re-export commonly used types from stakesight-common
pub use stakesight_common::{Address, DashboardConfig, NetworkDescriptor, TxHash, U256};
