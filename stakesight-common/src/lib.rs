//! StakeSight Common Library
//!
//! This crate provides shared types and utilities for the StakeSight dashboard:
//!
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`network`] - Network descriptor passed to wallets
//! - [`units`] - Fixed-point amount conversion
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod network;
pub mod units;

// Re-export commonly used types at the crate root
pub use alloy_primitives::{Address, TxHash, U256};
pub use config::{
    ContractsConfig, DashboardConfig, DemoConfig, DisplayConfig, LogFormat, LoggingConfig,
    PollingConfig, load_config, parse_config,
};
pub use error::{Error, Result};
pub use network::{NativeCurrency, NetworkDescriptor};
pub use units::{DEFAULT_DECIMALS, format_units, parse_units, to_display};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// # Example
///
/// ```ignore
/// use stakesight_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
