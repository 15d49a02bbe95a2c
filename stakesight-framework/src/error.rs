//! Error types for the dashboard framework.

use thiserror::Error;

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Wallet code for `wallet_switchEthereumChain` on a chain it does not know.
pub const UNKNOWN_CHAIN_CODE: i64 = 4902;

/// Failure reported by a contract call or the node behind it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// The transaction or call reverted.
    #[error("execution reverted: {reason}")]
    Reverted { reason: String },

    /// JSON-RPC error returned by the provider.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never reached the node.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ChainError {
    /// Create a revert error.
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: reason.into(),
        }
    }

    /// Create an RPC error.
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Human-readable reason provided by the external system, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ChainError::Reverted { reason } if !reason.is_empty() => Some(reason),
            ChainError::Rpc { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Whether the user declined the request in the wallet.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, ChainError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }
}

/// Wallet connection failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    /// No wallet provider is available.
    #[error("No wallet found. Please install a browser wallet")]
    NotAvailable,

    /// The user declined a wallet prompt.
    #[error("Request rejected by user")]
    UserRejected,

    /// The wallet authorized no accounts.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// The wallet could not be moved to the expected network.
    #[error("Please switch to {expected} (wallet is on chain {actual})")]
    WrongNetwork { expected: String, actual: u64 },

    /// Any other wallet RPC failure.
    #[error("Wallet error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl WalletError {
    /// Create a wallet RPC error.
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Whether the wallet signalled an unknown chain.
    pub fn is_unknown_chain(&self) -> bool {
        matches!(self, WalletError::Rpc { code, .. } if *code == UNKNOWN_CHAIN_CODE)
    }

    /// Fold the user-rejected code into its own variant.
    pub fn normalize(self) -> Self {
        match self {
            WalletError::Rpc { code, .. } if code == USER_REJECTED_CODE => {
                WalletError::UserRejected
            }
            other => other,
        }
    }
}

/// Failures of a user-initiated write action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Another action is already running on this panel.
    #[error("Another transaction is in progress")]
    Busy,

    /// No wallet session is active.
    #[error("Connect your wallet first")]
    NotConnected,

    /// The amount is not a positive number.
    #[error("Please enter a valid amount")]
    InvalidAmount(String),

    /// The amount is below the configured minimum.
    #[error("{0}")]
    BelowMinimum(String),

    /// A step failed; the remaining steps were not attempted.
    #[error("{step} failed: {source}")]
    Step {
        step: String,
        #[source]
        source: ChainError,
    },
}

impl ActionError {
    /// Message shown in the panel's status label.
    ///
    /// Step failures use the external reason when one was provided and fall
    /// back to a generic message otherwise.
    pub fn status_message(&self) -> String {
        match self {
            ActionError::Step { source, .. } => {
                if source.is_user_rejected() {
                    "Transaction rejected by user".to_string()
                } else {
                    source
                        .reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| "Transaction failed".to_string())
                }
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for wallet operations.
pub type WalletResult<T> = std::result::Result<T, WalletError>;

/// Result type alias for chain operations.
pub type ChainResult<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_prefers_reason() {
        let err = ActionError::Step {
            step: "Staking".to_string(),
            source: ChainError::reverted("ERC20: insufficient allowance"),
        };
        assert_eq!(err.status_message(), "ERC20: insufficient allowance");
    }

    #[test]
    fn test_status_message_fallback() {
        let err = ActionError::Step {
            step: "Claiming".to_string(),
            source: ChainError::Transport("connection reset".to_string()),
        };
        assert_eq!(err.status_message(), "Transaction failed");

        let err = ActionError::Step {
            step: "Claiming".to_string(),
            source: ChainError::reverted(""),
        };
        assert_eq!(err.status_message(), "Transaction failed");
    }

    #[test]
    fn test_user_rejection() {
        let err = ActionError::Step {
            step: "Approving".to_string(),
            source: ChainError::rpc(USER_REJECTED_CODE, "User denied transaction signature"),
        };
        assert_eq!(err.status_message(), "Transaction rejected by user");

        let wallet = WalletError::rpc(USER_REJECTED_CODE, "User rejected").normalize();
        assert_eq!(wallet, WalletError::UserRejected);
    }

    #[test]
    fn test_unknown_chain() {
        assert!(WalletError::rpc(UNKNOWN_CHAIN_CODE, "Unrecognized chain").is_unknown_chain());
        assert!(!WalletError::rpc(-32603, "Internal").is_unknown_chain());
    }
}
