//! User-initiated write actions and the sequential step runner.

use std::fmt;

use alloy_primitives::U256;
use stakesight_common::units::parse_units;

use crate::chain::{BoxFuture, PendingTx, Receipt};
use crate::error::{ActionError, ChainResult};

/// First status phase of every action.
pub const PREPARING: &str = "Preparing transaction...";

/// Write actions offered by the staking panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Approve the pool, then stake.
    Stake,
    Withdraw,
    Claim,
}

impl ActionKind {
    /// Whether the action takes a user-supplied amount.
    pub fn requires_amount(&self) -> bool {
        !matches!(self, ActionKind::Claim)
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Stake => "Stake",
            ActionKind::Withdraw => "Withdraw",
            ActionKind::Claim => "Claim Rewards",
        }
    }

    /// Status message after every step confirmed.
    pub fn success_message(&self, amount: Option<&str>, symbol: &str) -> String {
        match (self, amount) {
            (ActionKind::Stake, Some(amount)) => format!("Successfully staked {amount} {symbol}"),
            (ActionKind::Withdraw, Some(amount)) => {
                format!("Successfully withdrew {amount} {symbol}")
            }
            (ActionKind::Stake, None) => "Stake confirmed".to_string(),
            (ActionKind::Withdraw, None) => "Withdrawal confirmed".to_string(),
            (ActionKind::Claim, _) => "Rewards claimed successfully".to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a user-entered amount; it must be a positive decimal number.
pub fn validate_amount(input: &str, decimals: u8) -> Result<U256, ActionError> {
    let amount = parse_units(input, decimals)
        .map_err(|_| ActionError::InvalidAmount(input.to_string()))?;

    if amount.is_zero() {
        return Err(ActionError::InvalidAmount(input.to_string()));
    }

    Ok(amount)
}

/// Reject claims whose pending rewards are below `min_claimable`.
pub fn check_claimable(earned: f64, min_claimable: f64) -> Result<(), ActionError> {
    if earned.is_finite() && earned >= min_claimable && earned > 0.0 {
        Ok(())
    } else {
        Err(ActionError::BelowMinimum(format!(
            "Minimum claimable amount is {}",
            min_claimable
        )))
    }
}

type StepCall = Box<dyn FnOnce() -> BoxFuture<'static, ChainResult<PendingTx>> + Send>;

/// One external write call and the status phase shown while it runs.
pub struct ActionStep {
    description: String,
    call: StepCall,
}

impl ActionStep {
    pub fn new<F>(description: impl Into<String>, call: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'static, ChainResult<PendingTx>> + Send + 'static,
    {
        Self {
            description: description.into(),
            call: Box::new(call),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionStep")
            .field("description", &self.description)
            .finish()
    }
}

/// Ordered list of steps making up one write action.
#[derive(Debug)]
pub struct ActionPlan {
    kind: ActionKind,
    success_message: String,
    steps: Vec<ActionStep>,
}

impl ActionPlan {
    pub fn new(kind: ActionKind, success_message: impl Into<String>) -> Self {
        Self {
            kind,
            success_message: success_message.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: ActionStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step descriptions in execution order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.steps.iter().map(ActionStep::description).collect()
    }

    /// Run the steps strictly in order.
    ///
    /// Each step is submitted and awaited to confirmation before the next
    /// one starts. `on_phase` receives each step's description as it
    /// begins. The first failure stops the plan; earlier confirmed steps are
    /// not rolled back.
    pub async fn run<F>(self, mut on_phase: F) -> Result<Vec<Receipt>, ActionError>
    where
        F: FnMut(&str) + Send,
    {
        let kind = self.kind;
        let mut receipts = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.into_iter().enumerate() {
            let ActionStep { description, call } = step;
            on_phase(&description);
            tracing::info!(
                action = %kind,
                step = index + 1,
                phase = %description,
                "Submitting transaction"
            );

            let step_error = |source| ActionError::Step {
                step: description.trim_end_matches('.').to_string(),
                source,
            };

            let pending = call().await.map_err(step_error)?;
            let hash = pending.hash();
            tracing::debug!(action = %kind, tx = %hash, "Awaiting confirmation");

            let receipt = pending.confirmed().await.map_err(step_error)?;
            tracing::info!(
                action = %kind,
                tx = %receipt.tx_hash,
                block = receipt.block_number,
                "Transaction confirmed"
            );
            receipts.push(receipt);
        }

        Ok(receipts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use alloy_primitives::TxHash;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn confirmed_tx(n: u8) -> BoxFuture<'static, ChainResult<PendingTx>> {
        Box::pin(async move {
            let hash = TxHash::with_last_byte(n);
            Ok(PendingTx::new(hash, async move {
                Ok(Receipt {
                    tx_hash: hash,
                    block_number: n as u64,
                })
            }))
        })
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("100", 18).is_ok());
        assert!(validate_amount("0.5", 18).is_ok());

        for bad in ["", "0", "-5", "0.000", "abc", "1e5", "   "] {
            assert_eq!(
                validate_amount(bad, 18),
                Err(ActionError::InvalidAmount(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_check_claimable() {
        assert!(check_claimable(0.5, 0.000_001).is_ok());
        assert!(check_claimable(0.000_001, 0.000_001).is_ok());
        assert!(matches!(
            check_claimable(0.000_000_1, 0.000_001),
            Err(ActionError::BelowMinimum(_))
        ));
        assert!(check_claimable(0.0, 0.0).is_err());
        assert!(check_claimable(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_success_messages() {
        assert_eq!(
            ActionKind::Stake.success_message(Some("100"), "sUSD"),
            "Successfully staked 100 sUSD"
        );
        assert_eq!(
            ActionKind::Claim.success_message(None, "sUSD"),
            "Rewards claimed successfully"
        );
        assert!(!ActionKind::Claim.requires_amount());
        assert!(ActionKind::Withdraw.requires_amount());
    }

    #[tokio::test]
    async fn test_run_reports_phases_in_order() {
        let plan = ActionPlan::new(ActionKind::Stake, "done")
            .step(ActionStep::new("Approving...", || confirmed_tx(1)))
            .step(ActionStep::new("Staking...", || confirmed_tx(2)));

        assert_eq!(plan.descriptions(), vec!["Approving...", "Staking..."]);

        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let receipts = plan
            .run(move |phase| sink.lock().push(phase.to_string()))
            .await
            .unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[1].block_number, 2);
        assert_eq!(*phases.lock(), vec!["Approving...", "Staking..."]);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let second_called = Arc::new(Mutex::new(false));
        let flag = second_called.clone();

        let plan = ActionPlan::new(ActionKind::Stake, "done")
            .step(ActionStep::new("Approving...", || {
                Box::pin(async { Err(ChainError::reverted("approve reverted")) })
                    as BoxFuture<'static, ChainResult<PendingTx>>
            }))
            .step(ActionStep::new("Staking...", move || {
                *flag.lock() = true;
                confirmed_tx(2)
            }));

        let err = plan.run(|_| {}).await.unwrap_err();

        assert_eq!(
            err,
            ActionError::Step {
                step: "Approving".to_string(),
                source: ChainError::reverted("approve reverted"),
            }
        );
        assert_eq!(err.status_message(), "approve reverted");
        assert!(!*second_called.lock());
    }

    #[tokio::test]
    async fn test_confirmation_failure_aborts() {
        let plan = ActionPlan::new(ActionKind::Withdraw, "done").step(ActionStep::new(
            "Withdrawing...",
            || {
                Box::pin(async {
                    Ok(PendingTx::new(TxHash::ZERO, async {
                        Err(ChainError::reverted("Cannot withdraw more than staked"))
                    }))
                }) as BoxFuture<'static, ChainResult<PendingTx>>
            },
        ));

        let err = plan.run(|_| {}).await.unwrap_err();
        assert_eq!(err.status_message(), "Cannot withdraw more than staked");
    }
}
