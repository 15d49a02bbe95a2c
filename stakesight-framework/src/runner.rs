//! Headless runner: polls every panel on its interval and logs readings.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use stakesight_common::DashboardConfig;
use tokio::signal;

use crate::error::WalletResult;
use crate::panel::{PanelSpec, PollingPanel};
use crate::read::run_read_cycle;
use crate::schedule::TaskScope;
use crate::session::Session;
use crate::wallet::WalletProvider;

/// Runner that manages the lifecycle of a windowless dashboard.
///
/// Handles:
/// - Wallet connection
/// - One periodic read task per panel
/// - Graceful shutdown on Ctrl+C
///
/// # Example
///
/// ```ignore
/// let mut runner = HeadlessRunner::connect(wallet, config).await?;
/// runner.start();
/// runner.run().await;
/// ```
pub struct HeadlessRunner {
    session: Session,
    panels: Vec<Arc<Mutex<PollingPanel>>>,
    scope: TaskScope,
}

impl HeadlessRunner {
    /// Connect the wallet and build the staking and portfolio panels.
    pub async fn connect(
        wallet: Arc<dyn WalletProvider>,
        config: &DashboardConfig,
    ) -> WalletResult<Self> {
        let session = Session::connect(wallet, config).await?;
        let animation = config.display.animation();

        let panels = [PanelSpec::staking(config), PanelSpec::portfolio(config)]
            .into_iter()
            .map(|spec| Arc::new(Mutex::new(PollingPanel::new(spec, animation))))
            .collect();

        Ok(Self {
            session,
            panels,
            scope: TaskScope::new("headless"),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Snapshot of the panel called `name`.
    pub fn panel(&self, name: &str) -> Option<PollingPanel> {
        self.panels
            .iter()
            .map(|panel| panel.lock())
            .find(|panel| panel.name() == name)
            .map(|panel| panel.clone())
    }

    /// Spawn the periodic read task of every panel.
    pub fn start(&mut self) {
        for panel in &self.panels {
            let (name, interval) = {
                let panel = panel.lock();
                (panel.name().to_string(), panel.interval())
            };

            let session = self.session.clone();
            let panel = panel.clone();
            self.scope.every(name, interval, move || {
                let session = session.clone();
                let panel = panel.clone();
                async move { poll_once(&session, &panel).await }
            });
        }

        tracing::info!(
            account = %self.session.account(),
            panels = self.panels.len(),
            "Headless dashboard running. Press Ctrl+C to stop."
        );
    }

    /// Run until Ctrl+C is received.
    pub async fn run(self) {
        self.run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await
    }

    /// Run until `stop` completes, then shut every task down.
    pub async fn run_until<F>(self, stop: F)
    where
        F: Future<Output = ()>,
    {
        stop.await;
        tracing::info!("Received shutdown signal");

        self.scope.shutdown().await;
        for panel in &self.panels {
            panel.lock().teardown();
        }

        tracing::info!("Goodbye!");
    }
}

async fn poll_once(session: &Session, panel: &Mutex<PollingPanel>) {
    let (name, sources) = {
        let panel = panel.lock();
        (panel.name().to_string(), panel.sources())
    };

    let readings = run_read_cycle(session.queries(&sources), session.decimals()).await;

    let mut panel = panel.lock();
    panel.apply_readings(readings, std::time::Instant::now());

    for slot in panel.slots() {
        let source = slot.spec().source;
        match panel.reading(source) {
            Some(value) => tracing::info!(
                panel = %name,
                slot = %source,
                value,
                symbol = session.token_symbol(),
                "Reading"
            ),
            None => tracing::debug!(panel = %name, slot = %source, "No reading yet"),
        }
    }
}
