//! StakeSight - Desktop dashboard for a token staking pool.
//!
//! This library exposes the application, the simulated chain, and the views
//! for testing.

pub mod app;
pub mod demo;
pub mod message;
pub mod subscription;
pub mod view;

// Re-export commonly used types
pub use app::StakeSight;
pub use demo::{PriceSimulator, SimulatedChain, SimulatedWallet};
pub use message::{Message, PanelId};
