//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;
use stakesight_common::{DashboardConfig, Error, Result, load_config};

/// Command-line arguments for the dashboard.
#[derive(Parser, Debug, Clone, Default)]
#[command(about = "StakeSight staking dashboard")]
pub struct DashboardArgs {
    /// Path to configuration file.
    ///
    /// Defaults to `stakesight/config.json5` in the user config directory
    /// when that file exists.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Poll and log readings without opening a window.
    #[arg(long)]
    pub headless: bool,
}

impl DashboardArgs {
    /// Parse CLI arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Resolve and load the configuration.
    ///
    /// An explicit `--config` must exist. Without one, the default path is
    /// used if present and built-in defaults otherwise. The log level
    /// override is applied before validation.
    pub fn load_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                load_config(path)?
            }
            None => match DashboardConfig::default_path().filter(|p| p.exists()) {
                Some(path) => load_config(&path)?,
                None => DashboardConfig::default(),
            },
        };

        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
