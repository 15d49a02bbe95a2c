//! Reusable UI components for the dashboard panels.

pub mod sparkline;
pub mod status_led;

pub use sparkline::{Sparkline, Trend};
pub use status_led::{StatusLed, StatusLedState};
