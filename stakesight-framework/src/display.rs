//! Animated numeric display slots.

use std::time::{Duration, Instant};

use crate::tween::{Easing, Tween};

/// How a display value is rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// `1234567.89`
    #[default]
    Plain,
    /// `1,234,567.89`
    Grouped,
}

/// Render `value` with exactly `precision` decimal places.
pub fn format_fixed(value: f64, precision: usize, format: NumberFormat) -> String {
    let fixed = format!("{:.*}", precision, value);
    match format {
        NumberFormat::Plain => fixed,
        NumberFormat::Grouped => group_thousands(&fixed),
    }
}

fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    // Non-finite values ("inf", "NaN") are passed through untouched
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return fixed.to_string();
    }

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// An active interpolation owned by one display slot.
#[derive(Debug, Clone, Copy)]
struct TweenSession {
    id: u64,
    tween: Tween,
    started_at: Instant,
}

/// A numeric value on screen that animates towards its latest target.
///
/// At most one tween session is active per slot. Setting a new target
/// cancels the running session and starts a new one from the previously
/// requested target.
#[derive(Debug, Clone)]
pub struct DisplayValue {
    precision: usize,
    current: f64,
    target: f64,
    duration: Duration,
    easing: Easing,
    session: Option<TweenSession>,
    sessions_started: u64,
}

impl DisplayValue {
    /// Create a slot showing `initial`, formatted with `precision` decimals.
    pub fn new(initial: f64, precision: usize, duration: Duration) -> Self {
        Self {
            precision,
            current: initial,
            target: initial,
            duration,
            easing: Easing::default(),
            session: None,
            sessions_started: 0,
        }
    }

    /// Use a different easing curve for future sessions.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Last value written to the display.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Most recently requested value.
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Identifier of the active session, if any.
    pub fn active_session(&self) -> Option<u64> {
        self.session.map(|s| s.id)
    }

    /// Request a new target and start animating towards it.
    ///
    /// The new session starts from the previous target, not from the value
    /// currently on screen.
    pub fn set_target(&mut self, target: f64, now: Instant) {
        if let Some(previous) = self.session.take() {
            tracing::trace!(session = previous.id, "Replacing active tween");
        }

        let start = self.target;
        self.target = target;
        self.sessions_started += 1;
        self.session = Some(TweenSession {
            id: self.sessions_started,
            tween: Tween::new(start, target, self.duration, self.easing),
            started_at: now,
        });
    }

    /// Write the sample for `now` into the display.
    ///
    /// Returns the written value, or `None` when no session is active.
    /// The session ends once the final sample (the exact target) is written.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let session = self.session?;
        let elapsed = now.saturating_duration_since(session.started_at);
        let value = session.tween.sample(elapsed);

        self.current = value;
        if session.tween.is_finished(elapsed) {
            self.session = None;
        }
        Some(value)
    }

    /// Stop the active session, keeping the last written value on screen.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::trace!(session = session.id, current = self.current, "Tween cancelled");
        }
    }

    /// Current value as text.
    pub fn format(&self, format: NumberFormat) -> String {
        format_fixed(self.current, self.precision, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed_plain() {
        assert_eq!(format_fixed(1523.456, 2, NumberFormat::Plain), "1523.46");
        assert_eq!(format_fixed(0.0, 4, NumberFormat::Plain), "0.0000");
        assert_eq!(format_fixed(12.0, 0, NumberFormat::Plain), "12");
    }

    #[test]
    fn test_format_fixed_grouped() {
        assert_eq!(format_fixed(1234567.891, 2, NumberFormat::Grouped), "1,234,567.89");
        assert_eq!(format_fixed(999.0, 2, NumberFormat::Grouped), "999.00");
        assert_eq!(format_fixed(1000.0, 0, NumberFormat::Grouped), "1,000");
        assert_eq!(format_fixed(-25000.5, 1, NumberFormat::Grouped), "-25,000.5");
        assert_eq!(format_fixed(f64::INFINITY, 2, NumberFormat::Grouped), "inf");
    }

    #[test]
    fn test_balance_rises_and_settles() {
        let start = Instant::now();
        let mut slot = DisplayValue::new(1000.0, 2, Duration::from_millis(1000));
        slot.set_target(1523.45, start);

        let mut last = slot.current();
        for ms in (0..=1000).step_by(16) {
            let value = slot.tick(start + Duration::from_millis(ms)).unwrap();
            assert!(value >= last, "display went backwards at {ms}ms");
            assert!((1000.0..=1523.45).contains(&value));
            last = value;
        }

        let value = slot.tick(start + Duration::from_millis(1016));
        assert_eq!(value, Some(1523.45));
        assert_eq!(slot.current(), 1523.45);
        assert!(!slot.is_animating());
        assert_eq!(slot.format(NumberFormat::Grouped), "1,523.45");
    }

    #[test]
    fn test_cancel_keeps_last_written_value() {
        let start = Instant::now();
        let mut slot = DisplayValue::new(0.0, 2, Duration::from_millis(1000));
        slot.set_target(100.0, start);

        let written = slot.tick(start + Duration::from_millis(300)).unwrap();
        slot.cancel();

        assert!(!slot.is_animating());
        assert_eq!(slot.tick(start + Duration::from_millis(600)), None);
        assert_eq!(slot.tick(start + Duration::from_secs(5)), None);
        assert_eq!(slot.current(), written);
        assert_eq!(slot.target(), 100.0);
    }

    #[test]
    fn test_new_target_replaces_session() {
        let start = Instant::now();
        let mut slot = DisplayValue::new(0.0, 2, Duration::from_millis(1000));
        slot.set_target(100.0, start);
        let first = slot.active_session();
        slot.tick(start + Duration::from_millis(200));

        slot.set_target(50.0, start + Duration::from_millis(250));
        let second = slot.active_session();

        assert!(first.is_some());
        assert!(second.is_some());
        assert_ne!(first, second);

        // Restarted from the previously requested target (100), heading to 50
        let value = slot.tick(start + Duration::from_millis(250)).unwrap();
        assert_eq!(value, 100.0);

        let value = slot.tick(start + Duration::from_millis(1250)).unwrap();
        assert_eq!(value, 50.0);
        assert!(!slot.is_animating());
    }

    #[test]
    fn test_precision_is_fixed() {
        let mut slot = DisplayValue::new(0.0, 4, Duration::from_millis(10));
        let now = Instant::now();
        slot.set_target(1.23456789, now);
        slot.tick(now + Duration::from_millis(10));
        assert_eq!(slot.precision(), 4);
        assert_eq!(slot.format(NumberFormat::Plain), "1.2346");
    }
}
