//! Panel status reporting.

use std::fmt;

/// Status label of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Info(String),
    Success(String),
    Error(String),
}

impl PanelStatus {
    /// Text shown in the label, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            PanelStatus::Idle => None,
            PanelStatus::Info(msg) | PanelStatus::Success(msg) | PanelStatus::Error(msg) => {
                Some(msg)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PanelStatus::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PanelStatus::Success(_))
    }
}

impl fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelStatus::Idle => write!(f, "idle"),
            PanelStatus::Info(msg) => write!(f, "info: {}", msg),
            PanelStatus::Success(msg) => write!(f, "success: {}", msg),
            PanelStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// A panel status plus a generation counter.
///
/// Every [`set`](Self::set) bumps the generation, so a delayed expiry
/// scheduled for one success message never clears a later status.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    status: PanelStatus,
    generation: u64,
}

impl StatusBoard {
    pub fn status(&self) -> &PanelStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the status, returning the new generation.
    pub fn set(&mut self, status: PanelStatus) -> u64 {
        tracing::debug!(%status, "Panel status");
        self.status = status;
        self.generation += 1;
        self.generation
    }

    pub fn info(&mut self, msg: impl Into<String>) -> u64 {
        self.set(PanelStatus::Info(msg.into()))
    }

    pub fn success(&mut self, msg: impl Into<String>) -> u64 {
        self.set(PanelStatus::Success(msg.into()))
    }

    pub fn error(&mut self, msg: impl Into<String>) -> u64 {
        self.set(PanelStatus::Error(msg.into()))
    }

    /// Revert a success status to idle if it is still the one from `generation`.
    ///
    /// Returns whether the status was cleared. Errors and info phases are
    /// never auto-cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.status.is_success() {
            self.status = PanelStatus::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_expires() {
        let mut board = StatusBoard::default();
        let generation = board.success("Staked 100 sUSD");
        assert!(board.expire(generation));
        assert_eq!(board.status(), &PanelStatus::Idle);
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut board = StatusBoard::default();
        let old = board.success("Claimed");
        board.info("Preparing transaction...");
        assert!(!board.expire(old));
        assert_eq!(
            board.status(),
            &PanelStatus::Info("Preparing transaction...".to_string())
        );
    }

    #[test]
    fn test_errors_persist() {
        let mut board = StatusBoard::default();
        let generation = board.error("Please enter a valid amount");
        assert!(!board.expire(generation));
        assert!(board.status().is_error());
        assert_eq!(board.status().message(), Some("Please enter a valid amount"));
    }
}
