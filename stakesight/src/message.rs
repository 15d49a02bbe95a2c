use std::time::Instant;

use stakesight_framework::{ActionError, ActionKind, Reading, Session, WalletError};

use crate::view::theme::AppTheme;
use crate::view::chart::TimeWindow;

/// Messages for the StakeSight application.
#[derive(Debug, Clone)]
pub enum Message {
    /// User asked to connect the wallet.
    Connect,

    /// Wallet connection finished.
    Connected(Result<Session, WalletError>),

    /// User disconnected the wallet.
    Disconnect,

    /// Poll interval of a panel elapsed.
    PollTick(PanelId),

    /// A read cycle issued in the given session epoch completed.
    ReadCycleDone(PanelId, u64, Vec<Reading>),

    /// Animation frame.
    Frame(Instant),

    /// User edited the stake amount.
    StakeAmountChanged(String),

    /// User edited the withdraw amount.
    WithdrawAmountChanged(String),

    /// User pressed an action button.
    Submit(ActionKind),

    /// The action with the given id entered a new step.
    ActionPhase(u64, String),

    /// The action with the given id ended.
    ActionFinished(u64, ActionKind, Result<(), ActionError>),

    /// Success message delay elapsed for the given status generation.
    ExpireStatus(u64),

    /// One second passed on the price feed.
    PriceTick,

    /// User changed the chart time window.
    SetChartTimeWindow(TimeWindow),

    /// Switch between light and dark theme.
    SetTheme(AppTheme),
}

/// The polling panels on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Staking,
    Portfolio,
}

impl PanelId {
    pub const ALL: [PanelId; 2] = [PanelId::Staking, PanelId::Portfolio];
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelId::Staking => write!(f, "staking"),
            PanelId::Portfolio => write!(f, "portfolio"),
        }
    }
}
