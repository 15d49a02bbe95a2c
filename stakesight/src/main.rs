//! StakeSight - Desktop dashboard for a token staking pool.
//!
//! Connects a wallet and polls the staking pool and token contracts into
//! animated balances with stake/withdraw/claim actions. `--headless` runs
//! the polling loop without a window.

use std::sync::Arc;

use iced::application;

use stakesight::{SimulatedWallet, StakeSight};
use stakesight_common::DashboardConfig;
use stakesight_framework::{DashboardArgs, HeadlessRunner};

fn main() -> anyhow::Result<()> {
    let args = DashboardArgs::parse();
    let config = args.load_config()?;

    stakesight_common::init_tracing(&config.logging)?;

    tracing::info!(
        network = %config.network,
        token = %config.contracts.token,
        pool = %config.contracts.staking_pool,
        headless = args.headless,
        "Starting StakeSight"
    );

    if args.headless {
        return run_headless(config);
    }

    // Run the Iced application
    application(
        move || StakeSight::boot(config.clone()),
        StakeSight::update,
        StakeSight::view,
    )
    .title(StakeSight::title)
    .subscription(StakeSight::subscription)
    .theme(StakeSight::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// Poll both panels against the simulated chain until Ctrl+C.
fn run_headless(config: DashboardConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async move {
        let wallet = Arc::new(SimulatedWallet::new(&config));
        let mut runner = HeadlessRunner::connect(wallet, &config)
            .await
            .map_err(|e| anyhow::anyhow!("Wallet connection failed: {}", e))?;

        runner.start();
        runner.run().await;
        Ok(())
    })
}
