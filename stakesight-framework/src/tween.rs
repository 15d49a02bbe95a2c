//! Time-based interpolation between two numeric values.

use std::time::Duration;

/// Shortest duration a tween may have; zero durations are clamped to this.
pub const MIN_DURATION: Duration = Duration::from_millis(1);

/// Easing curve mapping normalized time to normalized progress.
///
/// Every curve is monotonic with `apply(0) == 0` and `apply(1) == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseOutQuad,
    /// Fast start, slow finish.
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Progress in `[0, 1]` for normalized time `t` (clamped to `[0, 1]`).
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// An interpolation from `start` to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: f64,
    target: f64,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween. A zero duration is clamped to [`MIN_DURATION`].
    pub fn new(start: f64, target: f64, duration: Duration, easing: Easing) -> Self {
        let duration = if duration < MIN_DURATION {
            tracing::warn!(?duration, "Tween duration too short, clamping");
            MIN_DURATION
        } else {
            duration
        };

        Self {
            start,
            target,
            duration,
            easing,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the tween has run its full duration after `elapsed`.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Sample the tween after `elapsed` time.
    ///
    /// Returns exactly `target` once the duration has passed. Intermediate
    /// samples never leave the `[start, target]` interval.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.target;
        }

        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let value = self.start + (self.target - self.start) * self.easing.apply(t);

        let (low, high) = if self.start <= self.target {
            (self.start, self.target)
        } else {
            (self.target, self.start)
        };
        value.clamp(low, high)
    }
}
