//! StakeSight Iced application.

use std::sync::Arc;
use std::time::Instant;

use iced::{Element, Subscription, Task, Theme};

use stakesight_common::DashboardConfig;
use stakesight_framework::{ActionError, ActionKind, Session, WalletProvider, run_read_cycle};

use crate::demo::{PriceSimulator, SimulatedWallet};
use crate::message::{Message, PanelId};
use crate::subscription::{
    action_stream, frame_subscription, poll_subscription, price_subscription,
};
use crate::view::chart::{DataPoint, current_timestamp};
use crate::view::dashboard::{Connection, DashboardState, dashboard_view};

/// The main StakeSight application.
pub struct StakeSight {
    /// Loaded configuration.
    config: DashboardConfig,
    /// Wallet used for new sessions.
    wallet: Arc<dyn WalletProvider>,
    /// Dashboard state.
    dashboard: DashboardState,
    /// Price feed for the chart.
    price: PriceSimulator,
}

impl StakeSight {
    /// Create the application backed by the simulated chain.
    pub fn new(config: DashboardConfig) -> Self {
        let wallet = Arc::new(SimulatedWallet::new(&config));
        Self::with_wallet(config, wallet)
    }

    /// Create the application with a specific wallet provider.
    pub fn with_wallet(config: DashboardConfig, wallet: Arc<dyn WalletProvider>) -> Self {
        let dashboard = DashboardState::new(&config);
        let price = PriceSimulator::new(config.demo.start_price);
        Self {
            config,
            wallet,
            dashboard,
            price,
        }
    }

    /// Boot the StakeSight application (called by iced::application).
    pub fn boot(config: DashboardConfig) -> (Self, Task<Message>) {
        (Self::new(config), Task::none())
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        match self.dashboard.session() {
            Some(session) => format!(
                "{} - {}",
                self.config.app_name,
                crate::view::formatting::short_address(&session.account())
            ),
            None => self.config.app_name.clone(),
        }
    }

    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Connect => self.connect(),

            Message::Connected(Ok(session)) => {
                if !matches!(self.dashboard.connection, Connection::Connecting) {
                    tracing::debug!("Ignoring connection result after disconnect");
                    return Task::none();
                }
                tracing::info!(account = %session.account(), "Session ready");
                self.dashboard.connection = Connection::Connected(session);
                Task::batch(PanelId::ALL.map(|id| self.read_cycle(id)))
            }

            Message::Connected(Err(error)) => {
                tracing::warn!(error = %error, "Wallet connection failed");
                self.dashboard.connection = Connection::Failed(error.to_string());
                Task::none()
            }

            Message::Disconnect => {
                tracing::info!("Wallet disconnected");
                self.dashboard.connection = Connection::Disconnected;
                self.dashboard.reset_session();
                Task::none()
            }

            Message::PollTick(id) => self.read_cycle(id),

            Message::ReadCycleDone(id, epoch, readings) => {
                if epoch != self.dashboard.epoch() {
                    tracing::debug!(panel = %id, epoch, "Dropping read cycle of an old session");
                } else if self.dashboard.is_connected() {
                    let updated = self
                        .dashboard
                        .panel_mut(id)
                        .apply_readings(readings, Instant::now());
                    tracing::trace!(panel = %id, updated, "Read cycle applied");
                }
                Task::none()
            }

            Message::Frame(now) => {
                self.dashboard.staking.tick(now);
                self.dashboard.portfolio.tick(now);
                Task::none()
            }

            Message::StakeAmountChanged(value) => {
                self.dashboard.stake_input = value;
                Task::none()
            }

            Message::WithdrawAmountChanged(value) => {
                self.dashboard.withdraw_input = value;
                Task::none()
            }

            Message::Submit(kind) => self.submit(kind),

            Message::ActionPhase(action, phase) => {
                self.dashboard.staking.report_phase(action, &phase);
                Task::none()
            }

            Message::ActionFinished(action, kind, result) => {
                self.finish_action(action, kind, result)
            }

            Message::ExpireStatus(generation) => {
                self.dashboard.staking.expire_status(generation);
                Task::none()
            }

            Message::PriceTick => {
                let price = self.price.next_price();
                self.dashboard
                    .chart
                    .push(DataPoint::new(current_timestamp(), price));
                self.dashboard.record_portfolio_value(price);
                Task::none()
            }

            Message::SetChartTimeWindow(window) => {
                self.dashboard.chart.set_time_window(window);
                Task::none()
            }

            Message::SetTheme(theme) => {
                self.dashboard.theme = theme;
                Task::none()
            }
        }
    }

    /// Create subscriptions for the price feed, polling, and animation frames.
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![price_subscription()];

        if self.dashboard.is_connected() {
            for id in PanelId::ALL {
                let interval = self.dashboard.panel(id).interval();
                subscriptions.push(poll_subscription(id, interval));
            }
        }

        if self.dashboard.staking.is_animating() || self.dashboard.portfolio.is_animating() {
            subscriptions.push(frame_subscription());
        }

        Subscription::batch(subscriptions)
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        dashboard_view(&self.dashboard)
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        self.dashboard.theme.theme()
    }

    fn connect(&mut self) -> Task<Message> {
        if matches!(
            self.dashboard.connection,
            Connection::Connecting | Connection::Connected(_)
        ) {
            return Task::none();
        }

        self.dashboard.connection = Connection::Connecting;
        let wallet = self.wallet.clone();
        let config = self.config.clone();
        Task::perform(
            async move { Session::connect(wallet, &config).await },
            Message::Connected,
        )
    }

    /// Issue one read cycle for a panel.
    fn read_cycle(&self, id: PanelId) -> Task<Message> {
        let Some(session) = self.dashboard.session() else {
            return Task::none();
        };

        let queries = session.queries(&self.dashboard.panel(id).sources());
        let decimals = session.decimals();
        let epoch = self.dashboard.epoch();
        Task::perform(run_read_cycle(queries, decimals), move |readings| {
            Message::ReadCycleDone(id, epoch, readings)
        })
    }

    fn submit(&mut self, kind: ActionKind) -> Task<Message> {
        let input = match kind {
            ActionKind::Stake => self.dashboard.stake_input.clone(),
            ActionKind::Withdraw => self.dashboard.withdraw_input.clone(),
            ActionKind::Claim => String::new(),
        };
        let session = self.dashboard.session().cloned();
        let min_claimable = self.dashboard.min_claimable;

        match self
            .dashboard
            .staking
            .prepare_action(session.as_ref(), kind, &input, min_claimable)
        {
            Ok((action, plan)) => {
                tracing::info!(action = %kind, id = action, steps = plan.len(), "Starting action");
                Task::stream(action_stream(action, plan))
            }
            Err(e) => {
                tracing::debug!(action = %kind, error = %e, "Action not started");
                Task::none()
            }
        }
    }

    fn finish_action(
        &mut self,
        action: u64,
        kind: ActionKind,
        result: Result<(), ActionError>,
    ) -> Task<Message> {
        let mut tasks = Vec::new();

        if let Some(generation) = self.dashboard.staking.finish_action(action, result) {
            match kind {
                ActionKind::Stake => self.dashboard.stake_input.clear(),
                ActionKind::Withdraw => self.dashboard.withdraw_input.clear(),
                ActionKind::Claim => {}
            }

            let delay = self.config.display.success_clear();
            tasks.push(Task::perform(tokio::time::sleep(delay), move |_| {
                Message::ExpireStatus(generation)
            }));
        }

        // Re-poll regardless of the outcome.
        tasks.extend(PanelId::ALL.map(|id| self.read_cycle(id)));
        Task::batch(tasks)
    }
}
