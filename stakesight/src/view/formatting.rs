//! Shared formatting utilities for the StakeSight views.

use alloy_primitives::Address;

/// Format a numeric value for display with appropriate scale suffix.
///
/// - Values >= 1M display as "X.XM"
/// - Values >= 1K display as "X.XK"
/// - Integer values display without decimal places
/// - Other values display with 4 decimal places
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}

/// Format a price in dollars.
pub fn format_price(value: f64) -> String {
    format!("${:.4}", value)
}

/// Shorten an address to its first and last four hex digits.
///
/// Returns strings like "0x7099...79C8".
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Format a time offset for chart axis labels.
///
/// Returns strings like "now", "-30s", "-5m".
pub fn format_time_offset(offset_ms: i64) -> String {
    if offset_ms == 0 {
        "now".to_string()
    } else if offset_ms < 60_000 {
        format!("-{}s", offset_ms / 1000)
    } else {
        format!("-{}m", offset_ms / 60_000)
    }
}
