//! Dashboard view: wallet header, staking and portfolio panels, price chart.

use iced::widget::{Column, column, container, row, rule, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Theme};
use iced_anim::widget::button;

use stakesight_common::DashboardConfig;
use stakesight_framework::{ActionKind, PanelSpec, PanelStatus, PollingPanel, ReadSource, Session};

use crate::message::{Message, PanelId};
use crate::view::chart::{ChartState, TimeWindow, chart_view};
use crate::view::components::{Sparkline, StatusLed, StatusLedState};
use crate::view::formatting::{format_price, format_value, short_address};
use crate::view::icons::{self, IconSize};
use crate::view::theme::{AppTheme, colors};

/// Portfolio value samples kept for the sparkline.
const PORTFOLIO_HISTORY: usize = 60;

/// Wallet connection state.
#[derive(Debug, Clone, Default)]
pub enum Connection {
    #[default]
    Disconnected,
    Connecting,
    Connected(Session),
    Failed(String),
}

impl Connection {
    fn led_state(&self) -> StatusLedState {
        match self {
            Connection::Connected(_) => StatusLedState::Connected,
            Connection::Connecting => StatusLedState::Pending,
            Connection::Disconnected | Connection::Failed(_) => StatusLedState::Disconnected,
        }
    }
}

/// Dashboard view state.
#[derive(Debug)]
pub struct DashboardState {
    /// Wallet connection.
    pub connection: Connection,
    /// Staking pool panel (stake, earned, total staked).
    pub staking: PollingPanel,
    /// Portfolio panel (wallet and staked balances).
    pub portfolio: PollingPanel,
    /// Stake amount input.
    pub stake_input: String,
    /// Withdraw amount input.
    pub withdraw_input: String,
    /// Token price chart.
    pub chart: ChartState,
    /// Recent portfolio values in dollars.
    pub portfolio_history: Vec<f64>,
    /// Symbol shown next to amounts.
    pub token_symbol: String,
    /// Smallest claimable reward.
    pub min_claimable: f64,
    /// Current theme.
    pub theme: AppTheme,
    /// Bumped whenever the session is reset; tags read cycles.
    epoch: u64,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        let animation = config.display.animation();
        Self {
            connection: Connection::Disconnected,
            staking: PollingPanel::new(PanelSpec::staking(config), animation),
            portfolio: PollingPanel::new(PanelSpec::portfolio(config), animation),
            stake_input: String::new(),
            withdraw_input: String::new(),
            chart: ChartState::new(format!("{} Price", config.contracts.token_symbol)),
            portfolio_history: Vec::new(),
            token_symbol: config.contracts.token_symbol.clone(),
            min_claimable: config.display.min_claimable,
            theme: AppTheme::default(),
            epoch: 0,
        }
    }

    /// Session epoch that read cycles issued now belong to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The active session, if connected.
    pub fn session(&self) -> Option<&Session> {
        match &self.connection {
            Connection::Connected(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session().is_some()
    }

    pub fn panel(&self, id: PanelId) -> &PollingPanel {
        match id {
            PanelId::Staking => &self.staking,
            PanelId::Portfolio => &self.portfolio,
        }
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut PollingPanel {
        match id {
            PanelId::Staking => &mut self.staking,
            PanelId::Portfolio => &mut self.portfolio,
        }
    }

    /// Whether the earned rewards reach the claim threshold.
    pub fn can_claim(&self) -> bool {
        self.staking
            .reading(ReadSource::Earned)
            .is_some_and(|earned| earned >= self.min_claimable)
    }

    /// Whether an action button of `kind` accepts presses.
    pub fn action_enabled(&self, kind: ActionKind) -> bool {
        if !self.is_connected() || self.staking.is_busy() {
            return false;
        }
        match kind {
            ActionKind::Claim => self.can_claim(),
            ActionKind::Stake | ActionKind::Withdraw => true,
        }
    }

    /// Dollar value of wallet plus staked tokens, once both were read.
    pub fn portfolio_value(&self, price: f64) -> Option<f64> {
        let wallet = self.portfolio.reading(ReadSource::WalletBalance)?;
        let staked = self.portfolio.reading(ReadSource::StakedBalance)?;
        Some((wallet + staked) * price)
    }

    /// Append the current portfolio value to the sparkline history.
    pub fn record_portfolio_value(&mut self, price: f64) {
        if let Some(value) = self.portfolio_value(price) {
            self.portfolio_history.push(value);
            if self.portfolio_history.len() > PORTFOLIO_HISTORY {
                let excess = self.portfolio_history.len() - PORTFOLIO_HISTORY;
                self.portfolio_history.drain(..excess);
            }
        }
    }

    /// Forget everything tied to the previous session.
    ///
    /// Panels are reset in place so that results still arriving from the
    /// old session can be told apart from anything started afterwards.
    pub fn reset_session(&mut self) {
        self.epoch += 1;
        self.staking.reset();
        self.portfolio.reset();
        self.stake_input.clear();
        self.withdraw_input.clear();
        self.portfolio_history.clear();
    }
}

/// Render the dashboard view.
pub fn dashboard_view(state: &DashboardState) -> Element<'_, Message> {
    let header = render_header(state);

    let body: Element<'_, Message> = if state.is_connected() {
        row![render_staking_panel(state), render_portfolio_panel(state)]
            .spacing(20)
            .into()
    } else {
        container(text("Connect your wallet to view staking data").size(16))
            .width(Length::Fill)
            .padding(30)
            .center_x(Length::Fill)
            .into()
    };

    let content = column![
        header,
        rule::horizontal(1),
        body,
        render_chart_panel(state)
    ]
    .spacing(16)
    .padding(20);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the header with the wallet controls.
fn render_header(state: &DashboardState) -> Element<'_, Message> {
    let title = text("StakeSight").size(24);
    let status = StatusLed::new(state.connection.led_state()).view();

    let mut header_row = row![title, status].spacing(20).align_y(Alignment::Center);

    if let Some(session) = state.session() {
        header_row = header_row.push(text(short_address(&session.account())).size(14));
        header_row = header_row.push(text(session.network().to_string()).size(12));
    }

    let wallet_button = match &state.connection {
        Connection::Connected(_) => button(
            row![icons::wallet(IconSize::Medium), text("Disconnect").size(14)]
                .spacing(6)
                .align_y(Alignment::Center),
        )
        .on_press(Message::Disconnect)
        .style(iced::widget::button::secondary),
        Connection::Connecting => button(
            row![icons::wallet(IconSize::Medium), text("Waiting for wallet...").size(14)]
                .spacing(6)
                .align_y(Alignment::Center),
        )
        .style(iced::widget::button::secondary),
        Connection::Disconnected | Connection::Failed(_) => button(
            row![
                icons::wallet(IconSize::Medium),
                text("Connect Wallet").size(14)
            ]
            .spacing(6)
            .align_y(Alignment::Center),
        )
        .on_press(Message::Connect)
        .style(iced::widget::button::primary),
    };

    let theme_button = button(
        row![
            icons::theme(IconSize::Medium),
            text(state.theme.toggle_label()).size(14)
        ]
        .spacing(6)
        .align_y(Alignment::Center),
    )
    .on_press(Message::SetTheme(state.theme.toggled()))
    .style(iced::widget::button::secondary);

    header_row = header_row.push(wallet_button).push(theme_button);

    let mut header_col = Column::new().push(header_row);

    if let Connection::Failed(ref error) = state.connection {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|theme: &Theme| text::Style {
                color: Some(colors(theme).danger()),
            });
        header_col = header_col.push(error_text);
    }

    header_col.spacing(5).into()
}

/// Render one panel's slots as label/value rows.
fn render_slots<'a>(panel: &'a PollingPanel, symbol: &'a str) -> Element<'a, Message> {
    let mut slots = Column::new().spacing(6);
    for slot in panel.slots() {
        let label = text(slot.spec().label.as_str())
            .size(13)
            .style(|theme: &Theme| text::Style {
                color: Some(colors(theme).text_muted()),
            })
            .width(Length::Fixed(130.0));
        let value = text(format!("{} {}", slot.text(), symbol)).size(16);
        slots = slots.push(row![label, value].spacing(10).align_y(Alignment::Center));
    }
    slots.into()
}

/// Render the status label of a panel.
fn render_status(status: &PanelStatus) -> Element<'_, Message> {
    let Some(message) = status.message() else {
        return Column::new().into();
    };

    let is_error = status.is_error();
    let is_success = status.is_success();
    text(message)
        .size(13)
        .style(move |theme: &Theme| {
            let palette = colors(theme);
            let color = if is_error {
                palette.danger()
            } else if is_success {
                palette.success()
            } else {
                palette.text_muted()
            };
            text::Style { color: Some(color) }
        })
        .into()
}

fn action_button<'a>(
    state: &DashboardState,
    kind: ActionKind,
    icon: Element<'a, Message>,
) -> Element<'a, Message> {
    let btn = button(
        row![icon, text(kind.label()).size(14)]
            .spacing(6)
            .align_y(Alignment::Center),
    )
    .padding(8)
    .style(iced::widget::button::primary);

    if state.action_enabled(kind) {
        btn.on_press(Message::Submit(kind)).into()
    } else {
        btn.into()
    }
}

/// Render the staking panel with its action forms.
fn render_staking_panel(state: &DashboardState) -> Element<'_, Message> {
    let title = text("Staking").size(18);
    let slots = render_slots(&state.staking, &state.token_symbol);

    let stake_row = row![
        text_input("Amount to stake", &state.stake_input)
            .on_input(Message::StakeAmountChanged)
            .padding(8)
            .width(Length::Fixed(180.0)),
        action_button(state, ActionKind::Stake, icons::stake(IconSize::Small)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let withdraw_row = row![
        text_input("Amount to withdraw", &state.withdraw_input)
            .on_input(Message::WithdrawAmountChanged)
            .padding(8)
            .width(Length::Fixed(180.0)),
        action_button(state, ActionKind::Withdraw, icons::withdraw(IconSize::Small)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let claim_row = action_button(state, ActionKind::Claim, icons::claim(IconSize::Small));

    let content = column![
        title,
        slots,
        rule::horizontal(1),
        stake_row,
        withdraw_row,
        claim_row,
        render_status(state.staking.status()),
    ]
    .spacing(10);

    card(content.into())
}

/// Render the portfolio panel.
fn render_portfolio_panel(state: &DashboardState) -> Element<'_, Message> {
    let title = text("Portfolio").size(18);
    let slots = render_slots(&state.portfolio, &state.token_symbol);

    let value_text = match state.portfolio_history.last() {
        Some(value) => format!("Value: ${}", format_value(*value)),
        None => "Value: --".to_string(),
    };

    let content = column![
        title,
        slots,
        rule::horizontal(1),
        text(value_text).size(14),
        Sparkline::new(state.portfolio_history.clone())
            .with_size(200.0, 32.0)
            .view(),
    ]
    .spacing(10);

    card(content.into())
}

/// Render the price chart with its time window selector.
fn render_chart_panel(state: &DashboardState) -> Element<'_, Message> {
    let stats = state.chart.stats();
    let price_text = stats
        .current
        .map(format_price)
        .unwrap_or_else(|| "--".to_string());

    let change_text = stats
        .change_pct()
        .map(|pct| format!("{:+.2}%", pct))
        .unwrap_or_default();

    let mut window_row = row![].spacing(4);
    for &window in TimeWindow::all() {
        let is_selected = window == state.chart.time_window();
        window_row = window_row.push(
            button(text(window.label()).size(11))
                .on_press(Message::SetChartTimeWindow(window))
                .style(if is_selected {
                    iced::widget::button::primary
                } else {
                    iced::widget::button::secondary
                }),
        );
    }

    let header = row![
        text(state.chart.title()).size(18),
        text(price_text).size(16),
        text(change_text).size(12),
        window_row,
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    card(column![header, chart_view(&state.chart)].spacing(10).into())
}

fn card(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = colors(theme);
            container::Style {
                background: Some(iced::Background::Color(palette.card_background())),
                border: iced::Border {
                    color: palette.border(),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesight_framework::Reading;
    use std::time::Instant;

    #[test]
    fn test_claim_gated_by_threshold() {
        let config = DashboardConfig::default();
        let mut state = DashboardState::new(&config);
        assert!(!state.can_claim());

        state
            .staking
            .apply_readings(vec![Reading::ok(ReadSource::Earned, 0.0000001)], Instant::now());
        assert!(!state.can_claim());

        state
            .staking
            .apply_readings(vec![Reading::ok(ReadSource::Earned, 0.5)], Instant::now());
        assert!(state.can_claim());
        // Still disabled without a session.
        assert!(!state.action_enabled(ActionKind::Claim));
    }

    #[test]
    fn test_portfolio_history_is_bounded() {
        let config = DashboardConfig::default();
        let mut state = DashboardState::new(&config);

        state.record_portfolio_value(1.0);
        assert!(state.portfolio_history.is_empty());

        state.portfolio.apply_readings(
            vec![
                Reading::ok(ReadSource::WalletBalance, 100.0),
                Reading::ok(ReadSource::StakedBalance, 50.0),
            ],
            Instant::now(),
        );
        for _ in 0..(PORTFOLIO_HISTORY + 5) {
            state.record_portfolio_value(2.0);
        }
        assert_eq!(state.portfolio_history.len(), PORTFOLIO_HISTORY);
        assert_eq!(state.portfolio_history.last(), Some(&300.0));
    }

    #[test]
    fn test_reset_session_bumps_epoch_and_clears_panels() {
        let config = DashboardConfig::default();
        let mut state = DashboardState::new(&config);
        let epoch = state.epoch();

        state
            .staking
            .apply_readings(vec![Reading::ok(ReadSource::Earned, 3.0)], Instant::now());
        state.stake_input = "12".to_string();
        state.reset_session();

        assert_eq!(state.epoch(), epoch + 1);
        assert_eq!(state.staking.reading(ReadSource::Earned), None);
        assert!(state.stake_input.is_empty());
    }
}
