use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::network::NetworkDescriptor;
use crate::units::{DEFAULT_DECIMALS, MAX_DECIMALS};

/// Contract addresses and token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Stablecoin token (ERC-20).
    #[serde(default = "default_token")]
    pub token: Address,

    /// Staking pool.
    #[serde(default = "default_staking_pool")]
    pub staking_pool: Address,

    /// Token ticker shown next to amounts.
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    /// Decimal scale shared by the token and the pool.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_token() -> Address {
    address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")
}

fn default_staking_pool() -> Address {
    address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")
}

fn default_token_symbol() -> String {
    "sUSD".to_string()
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
            staking_pool: default_staking_pool(),
            token_symbol: default_token_symbol(),
            decimals: default_decimals(),
        }
    }
}

/// Polling cadence per panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Staking panel refresh interval in seconds.
    #[serde(default = "default_staking_interval")]
    pub staking_interval_secs: u64,

    /// Portfolio panel refresh interval in seconds.
    #[serde(default = "default_portfolio_interval")]
    pub portfolio_interval_secs: u64,
}

fn default_staking_interval() -> u64 {
    10
}

fn default_portfolio_interval() -> u64 {
    30
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            staking_interval_secs: default_staking_interval(),
            portfolio_interval_secs: default_portfolio_interval(),
        }
    }
}

impl PollingConfig {
    pub fn staking_interval(&self) -> Duration {
        Duration::from_secs(self.staking_interval_secs)
    }

    pub fn portfolio_interval(&self) -> Duration {
        Duration::from_secs(self.portfolio_interval_secs)
    }
}

/// Display and interaction timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Duration of numeric animations in milliseconds.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,

    /// Delay before a success status clears, in milliseconds.
    #[serde(default = "default_success_clear_ms")]
    pub success_clear_ms: u64,

    /// Earned rewards below this amount cannot be claimed.
    #[serde(default = "default_min_claimable")]
    pub min_claimable: f64,
}

fn default_animation_ms() -> u64 {
    1000
}

fn default_success_clear_ms() -> u64 {
    3000
}

fn default_min_claimable() -> f64 {
    0.000_001
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            animation_ms: default_animation_ms(),
            success_clear_ms: default_success_clear_ms(),
            min_claimable: default_min_claimable(),
        }
    }
}

impl DisplayConfig {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn success_clear(&self) -> Duration {
        Duration::from_millis(self.success_clear_ms)
    }
}

/// Settings for the in-process simulated chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Token balance credited to the demo account, as a decimal string.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: String,

    /// Pool-wide reward emission per second, as a decimal string.
    #[serde(default = "default_reward_rate")]
    pub reward_rate_per_sec: String,

    /// Stake held by other (simulated) participants, as a decimal string.
    #[serde(default = "default_external_stake")]
    pub external_stake: String,

    /// Simulated confirmation latency per transaction in milliseconds.
    #[serde(default = "default_confirm_delay_ms")]
    pub confirm_delay_ms: u64,

    /// Probability in [0, 1] that a read query fails.
    #[serde(default)]
    pub read_failure_rate: f64,

    /// Starting price of the simulated chart.
    #[serde(default = "default_start_price")]
    pub start_price: f64,
}

fn default_initial_balance() -> String {
    "10000".to_string()
}

fn default_reward_rate() -> String {
    "0.05".to_string()
}

fn default_external_stake() -> String {
    "250000".to_string()
}

fn default_confirm_delay_ms() -> u64 {
    1500
}

fn default_start_price() -> f64 {
    1.0
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            reward_rate_per_sec: default_reward_rate(),
            external_stake: default_external_stake(),
            confirm_delay_ms: default_confirm_delay_ms(),
            read_failure_rate: 0.0,
            start_price: default_start_price(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Name presented to the wallet when requesting access.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub network: NetworkDescriptor,

    #[serde(default)]
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub demo: DemoConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_app_name() -> String {
    "StakeSight".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            network: NetworkDescriptor::default(),
            contracts: ContractsConfig::default(),
            polling: PollingConfig::default(),
            display: DisplayConfig::default(),
            demo: DemoConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.polling.staking_interval_secs == 0 || self.polling.portfolio_interval_secs == 0 {
            return Err(Error::Config(
                "Polling intervals must be at least 1 second".to_string(),
            ));
        }

        if self.contracts.decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "Token decimals cannot exceed {}",
                MAX_DECIMALS
            )));
        }

        if !(0.0..=1.0).contains(&self.demo.read_failure_rate) {
            return Err(Error::Config(
                "demo.read_failure_rate must be between 0 and 1".to_string(),
            ));
        }

        if !self.display.min_claimable.is_finite() || self.display.min_claimable < 0.0 {
            return Err(Error::Config(
                "display.min_claimable must be a non-negative number".to_string(),
            ));
        }

        if self.network.rpc_urls.is_empty() {
            return Err(Error::Config(
                "network.rpc_urls needs at least one endpoint".to_string(),
            ));
        }

        Ok(())
    }

    /// Default location of the configuration file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stakesight").join("config.json5"))
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_config() {
        let json5 = r#"
        {
            app_name: "My Dashboard",
            network: {
                chain_id: 31337,
                name: "Anvil",
                rpc_urls: ["http://127.0.0.1:8545"],
            },
            contracts: {
                token_symbol: "USDx",
            },
            polling: {
                staking_interval_secs: 5,
            },
            display: {
                animation_ms: 500,
            },
            logging: {
                level: "debug",
            },
        }
        "#;

        let config: DashboardConfig = parse_config(json5).unwrap();

        assert_eq!(config.app_name, "My Dashboard");
        assert_eq!(config.network.chain_id, 31337);
        assert_eq!(config.network.rpc_urls, vec!["http://127.0.0.1:8545"]);
        assert_eq!(config.contracts.token_symbol, "USDx");
        assert_eq!(config.contracts.decimals, 18);
        assert_eq!(config.polling.staking_interval(), Duration::from_secs(5));
        assert_eq!(config.polling.portfolio_interval(), Duration::from_secs(30));
        assert_eq!(config.display.animation(), Duration::from_millis(500));
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config: DashboardConfig = parse_config("{}").unwrap();

        assert_eq!(config.app_name, "StakeSight");
        assert_eq!(config.network.chain_id, 11_155_111);
        assert_eq!(config.polling.staking_interval_secs, 10);
        assert_eq!(config.display.success_clear_ms, 3000);
        assert_eq!(config.display.min_claimable, 0.000_001);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_contract_addresses() {
        let json5 = r#"
        {
            contracts: {
                token: "0x0000000000000000000000000000000000000001",
                staking_pool: "0x0000000000000000000000000000000000000002",
            },
        }
        "#;

        let config: DashboardConfig = parse_config(json5).unwrap();
        assert_eq!(config.contracts.token, Address::with_last_byte(1));
        assert_eq!(config.contracts.staking_pool, Address::with_last_byte(2));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DashboardConfig::default();
        config.polling.staking_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.demo.read_failure_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.contracts.decimals = 40;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.network.rpc_urls.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_logging_format() {
        let json5 = r#"
        {
            logging: {
                level: "debug",
                format: "json",
            },
        }
        "#;

        let config: DashboardConfig = parse_config(json5).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
