//! Polling data panels.
//!
//! A panel owns a set of display slots fed by read cycles, a status board,
//! and at most one in-flight write action.

use std::time::{Duration, Instant};

use alloy_primitives::U256;
use stakesight_common::DashboardConfig;

use crate::action::{ActionKind, ActionPlan, PREPARING, check_claimable, validate_amount};
use crate::display::{DisplayValue, NumberFormat};
use crate::error::ActionError;
use crate::read::{ReadSource, Reading};
use crate::session::Session;
use crate::status::{PanelStatus, StatusBoard};

/// Static description of one display slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub source: ReadSource,
    pub label: String,
    pub precision: usize,
    pub format: NumberFormat,
}

impl SlotSpec {
    pub fn new(source: ReadSource, label: impl Into<String>, precision: usize) -> Self {
        Self {
            source,
            label: label.into(),
            precision,
            format: NumberFormat::Plain,
        }
    }

    /// Render with thousands separators.
    pub fn grouped(mut self) -> Self {
        self.format = NumberFormat::Grouped;
        self
    }
}

/// Static description of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub name: String,
    pub interval: Duration,
    pub slots: Vec<SlotSpec>,
}

impl PanelSpec {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            slots: Vec::new(),
        }
    }

    pub fn slot(mut self, slot: SlotSpec) -> Self {
        self.slots.push(slot);
        self
    }

    /// Stake, pending rewards and pool total.
    pub fn staking(config: &DashboardConfig) -> Self {
        Self::new("staking", config.polling.staking_interval())
            .slot(SlotSpec::new(ReadSource::StakedBalance, "Your Stake", 2).grouped())
            .slot(SlotSpec::new(ReadSource::Earned, "Earned Rewards", 6))
            .slot(SlotSpec::new(ReadSource::TotalStaked, "Total Staked", 2).grouped())
    }

    /// Wallet balance next to the staked position.
    pub fn portfolio(config: &DashboardConfig) -> Self {
        Self::new("portfolio", config.polling.portfolio_interval())
            .slot(SlotSpec::new(ReadSource::WalletBalance, "Wallet Balance", 2).grouped())
            .slot(SlotSpec::new(ReadSource::StakedBalance, "Staked", 2).grouped())
    }
}

/// A display slot and the spec it was built from.
#[derive(Debug, Clone)]
pub struct Slot {
    spec: SlotSpec,
    value: DisplayValue,
    last_updated: Option<Instant>,
}

impl Slot {
    pub fn spec(&self) -> &SlotSpec {
        &self.spec
    }

    pub fn value(&self) -> &DisplayValue {
        &self.value
    }

    /// When the last successful reading arrived.
    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }

    /// Current value as text, in the slot's format.
    pub fn text(&self) -> String {
        self.value.format(self.spec.format)
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    id: u64,
    kind: ActionKind,
    success_message: String,
}

/// A panel of polled numeric slots with write actions.
#[derive(Debug, Clone)]
pub struct PollingPanel {
    name: String,
    interval: Duration,
    slots: Vec<Slot>,
    animation: Duration,
    status: StatusBoard,
    in_flight: Option<InFlight>,
    /// Id handed to the next prepared action.
    next_action: u64,
    cycles: u64,
}

impl PollingPanel {
    /// Build a panel whose slots start at zero and animate over `animation`.
    pub fn new(spec: PanelSpec, animation: Duration) -> Self {
        let slots = spec
            .slots
            .into_iter()
            .map(|slot_spec| Slot {
                value: DisplayValue::new(0.0, slot_spec.precision, animation),
                spec: slot_spec,
                last_updated: None,
            })
            .collect();

        Self {
            name: spec.name,
            interval: spec.interval,
            slots,
            animation,
            status: StatusBoard::default(),
            in_flight: None,
            next_action: 1,
            cycles: 0,
        }
    }

    /// Return to the freshly built state for a new session.
    ///
    /// Slots go back to zero with no reading, any in-flight action is
    /// forgotten and the status is cleared. Action ids and status
    /// generations keep counting, so results from the previous session
    /// never match anything started afterwards.
    pub fn reset(&mut self) {
        self.teardown();
        for slot in &mut self.slots {
            slot.value = DisplayValue::new(0.0, slot.spec.precision, self.animation);
            slot.last_updated = None;
        }
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(
                panel = %self.name,
                action = %in_flight.kind,
                id = in_flight.id,
                "Abandoning in-flight action"
            );
        }
        self.status.set(PanelStatus::Idle);
        self.cycles = 0;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, source: ReadSource) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.spec.source == source)
    }

    /// Sources this panel polls, in slot order.
    pub fn sources(&self) -> Vec<ReadSource> {
        self.slots.iter().map(|slot| slot.spec.source).collect()
    }

    /// Latest successfully read value for `source`.
    pub fn reading(&self, source: ReadSource) -> Option<f64> {
        self.slot(source)
            .filter(|slot| slot.last_updated.is_some())
            .map(|slot| slot.value.target())
    }

    /// Number of read cycles applied so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Feed a completed read cycle into the slots.
    ///
    /// Successful readings retarget their slot; failed ones leave it as it
    /// was and never touch the status. Returns how many slots changed.
    pub fn apply_readings(&mut self, readings: Vec<Reading>, now: Instant) -> usize {
        self.cycles += 1;
        let mut updated = 0;

        for reading in readings {
            let Some(slot) = self
                .slots
                .iter_mut()
                .find(|slot| slot.spec.source == reading.source)
            else {
                continue;
            };

            match reading.value {
                Ok(value) => {
                    slot.value.set_target(value, now);
                    slot.last_updated = Some(now);
                    updated += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        panel = %self.name,
                        slot = %reading.source,
                        error = %e,
                        "Keeping stale value"
                    );
                }
            }
        }

        updated
    }

    /// Advance all slot animations. Returns whether any are still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        for slot in &mut self.slots {
            slot.value.tick(now);
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.slots.iter().any(|slot| slot.value.is_animating())
    }

    /// Cancel every animation, keeping the displayed values.
    pub fn teardown(&mut self) {
        for slot in &mut self.slots {
            slot.value.cancel();
        }
    }

    pub fn status(&self) -> &PanelStatus {
        self.status.status()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Action currently running, if any.
    pub fn in_flight(&self) -> Option<ActionKind> {
        self.in_flight.as_ref().map(|f| f.kind)
    }

    /// Id of the running action, if any.
    pub fn action_id(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    /// Validate input and build the plan for `kind`.
    ///
    /// On success the panel is marked busy, shows the preparing phase and
    /// returns the action id that phase and outcome reports must carry.
    /// Validation failures set an error status and never build a plan, so
    /// no external call is issued. A busy panel rejects the request without
    /// touching its status.
    pub fn prepare_action(
        &mut self,
        session: Option<&Session>,
        kind: ActionKind,
        input: &str,
        min_claimable: f64,
    ) -> Result<(u64, ActionPlan), ActionError> {
        if self.is_busy() {
            tracing::warn!(panel = %self.name, action = %kind, "Rejecting action while busy");
            return Err(ActionError::Busy);
        }

        let result = self.build_plan(session, kind, input, min_claimable);
        match result {
            Ok(plan) => {
                let id = self.next_action;
                self.next_action += 1;
                self.in_flight = Some(InFlight {
                    id,
                    kind,
                    success_message: plan.success_message().to_string(),
                });
                self.status.info(PREPARING);
                Ok((id, plan))
            }
            Err(e) => {
                self.status.error(e.status_message());
                Err(e)
            }
        }
    }

    fn build_plan(
        &self,
        session: Option<&Session>,
        kind: ActionKind,
        input: &str,
        min_claimable: f64,
    ) -> Result<ActionPlan, ActionError> {
        let session = session.ok_or(ActionError::NotConnected)?;

        let amount = if kind.requires_amount() {
            validate_amount(input, session.decimals())?
        } else {
            let earned = self.reading(ReadSource::Earned).unwrap_or(0.0);
            check_claimable(earned, min_claimable)?;
            U256::ZERO
        };

        Ok(session.plan(kind, amount))
    }

    /// Whether `id` names the action currently in flight.
    fn is_current(&self, id: u64) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.id == id)
    }

    /// Show a step phase of action `id` while it runs.
    pub fn report_phase(&mut self, id: u64, phase: &str) {
        if self.is_current(id) {
            self.status.info(phase);
        } else {
            tracing::debug!(panel = %self.name, id, phase, "Ignoring phase of stale action");
        }
    }

    /// Record the outcome of the in-flight action.
    ///
    /// Returns the status generation of the success message, which the
    /// caller passes to [`expire_status`](Self::expire_status) after the
    /// success delay. Returns `None` on failure, or when `id` is not the
    /// action in flight, in which case the panel is left untouched.
    pub fn finish_action(&mut self, id: u64, result: Result<(), ActionError>) -> Option<u64> {
        if !self.is_current(id) {
            tracing::debug!(panel = %self.name, id, "Ignoring outcome of stale action");
            return None;
        }
        let in_flight = self.in_flight.take()?;

        match result {
            Ok(()) => {
                tracing::info!(panel = %self.name, action = %in_flight.kind, "Action succeeded");
                Some(self.status.success(in_flight.success_message))
            }
            Err(e) => {
                tracing::warn!(
                    panel = %self.name,
                    action = %in_flight.kind,
                    error = %e,
                    "Action failed"
                );
                self.status.error(e.status_message());
                None
            }
        }
    }

    /// Clear a success status if it is still the one from `generation`.
    pub fn expire_status(&mut self, generation: u64) -> bool {
        self.status.expire(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;

    fn staking_spec() -> PanelSpec {
        PanelSpec::new("staking", Duration::from_secs(10))
            .slot(SlotSpec::new(ReadSource::StakedBalance, "Staked", 2).grouped())
            .slot(SlotSpec::new(ReadSource::Earned, "Earned", 6))
    }

    #[test]
    fn test_presets_follow_config() {
        let mut config = DashboardConfig::default();
        config.polling.portfolio_interval_secs = 45;

        let staking = PanelSpec::staking(&config);
        assert_eq!(staking.interval, Duration::from_secs(10));
        assert_eq!(staking.slots.len(), 3);

        let portfolio = PollingPanel::new(PanelSpec::portfolio(&config), Duration::from_secs(1));
        assert_eq!(portfolio.interval(), Duration::from_secs(45));
        assert_eq!(
            portfolio.sources(),
            vec![ReadSource::WalletBalance, ReadSource::StakedBalance]
        );
    }

    #[test]
    fn test_failed_slot_keeps_value() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        let t0 = Instant::now();

        panel.apply_readings(
            vec![
                Reading::ok(ReadSource::StakedBalance, 1000.0),
                Reading::ok(ReadSource::Earned, 0.5),
            ],
            t0,
        );
        panel.tick(t0 + Duration::from_millis(100));

        let t1 = t0 + Duration::from_secs(10);
        let updated = panel.apply_readings(
            vec![
                Reading::failed(ReadSource::StakedBalance, ChainError::Transport("down".into())),
                Reading::ok(ReadSource::Earned, 0.75),
            ],
            t1,
        );
        panel.tick(t1 + Duration::from_millis(100));

        assert_eq!(updated, 1);
        let staked = panel.slot(ReadSource::StakedBalance).unwrap();
        assert_eq!(staked.value().current(), 1000.0);
        assert_eq!(staked.last_updated(), Some(t0));
        assert_eq!(staked.text(), "1,000.00");
        assert_eq!(panel.slot(ReadSource::Earned).unwrap().value().current(), 0.75);
        assert_eq!(panel.status(), &PanelStatus::Idle);
        assert_eq!(panel.cycles(), 2);
    }

    #[test]
    fn test_reading_requires_success() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        assert_eq!(panel.reading(ReadSource::Earned), None);

        panel.apply_readings(
            vec![Reading::failed(ReadSource::Earned, ChainError::Transport("x".into()))],
            Instant::now(),
        );
        assert_eq!(panel.reading(ReadSource::Earned), None);

        panel.apply_readings(vec![Reading::ok(ReadSource::Earned, 2.0)], Instant::now());
        assert_eq!(panel.reading(ReadSource::Earned), Some(2.0));
    }

    #[test]
    fn test_unknown_slot_is_ignored() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        let updated = panel.apply_readings(
            vec![Reading::ok(ReadSource::TotalStaked, 9.0)],
            Instant::now(),
        );
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_action_without_session() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        let result = panel.prepare_action(None, ActionKind::Stake, "100", 0.0);

        assert!(matches!(result, Err(ActionError::NotConnected)));
        assert!(panel.status().is_error());
        assert!(!panel.is_busy());
    }

    #[test]
    fn test_teardown_stops_animations() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_secs(1));
        let t0 = Instant::now();
        panel.apply_readings(vec![Reading::ok(ReadSource::Earned, 10.0)], t0);
        panel.tick(t0 + Duration::from_millis(500));
        assert!(panel.is_animating());

        let shown = panel.slot(ReadSource::Earned).unwrap().value().current();
        panel.teardown();

        assert!(!panel.is_animating());
        assert!(!panel.tick(t0 + Duration::from_secs(2)));
        assert_eq!(panel.slot(ReadSource::Earned).unwrap().value().current(), shown);
    }

    #[test]
    fn test_finish_without_action() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        assert_eq!(panel.finish_action(1, Ok(())), None);
        assert_eq!(panel.status(), &PanelStatus::Idle);
    }

    #[test]
    fn test_reset_clears_readings_and_status() {
        let mut panel = PollingPanel::new(staking_spec(), Duration::from_millis(100));
        panel.apply_readings(vec![Reading::ok(ReadSource::Earned, 2.0)], Instant::now());
        let _ = panel.prepare_action(None, ActionKind::Stake, "1", 0.0);
        assert!(panel.status().is_error());

        panel.reset();

        assert_eq!(panel.reading(ReadSource::Earned), None);
        assert_eq!(panel.slot(ReadSource::Earned).unwrap().value().current(), 0.0);
        assert_eq!(panel.status(), &PanelStatus::Idle);
        assert_eq!(panel.cycles(), 0);
        assert!(!panel.is_busy());
    }
}
