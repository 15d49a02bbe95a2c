//! Fixed-point amount conversion.
//!
//! On-chain amounts are integers scaled by `10^decimals`. These helpers move
//! between that representation, exact decimal strings, and the `f64` values
//! used only for display.

use alloy_primitives::U256;
use alloy_primitives::utils;

use crate::error::{Error, Result};

/// Decimal scale used by the token and the staking pool.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest supported decimal scale (10^36 still fits comfortably in a U256).
pub const MAX_DECIMALS: u8 = 36;

/// Parse a decimal string (e.g. `"12.5"`) into a fixed-point integer.
///
/// Accepts an optional leading `+`, digits, and at most one `.`. Signs,
/// exponents and fractional digits beyond `decimals` are rejected rather
/// than truncated.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256> {
    if decimals > MAX_DECIMALS {
        return Err(Error::amount(input, format!("unsupported scale {decimals}")));
    }

    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::amount(input, "empty amount"));
    }

    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::amount(input, "not a decimal number"));
    }

    if frac_part.len() > decimals as usize {
        return Err(Error::amount(
            input,
            format!("more than {decimals} fractional digits"),
        ));
    }

    let parsed = utils::parse_units(unsigned, decimals)
        .map_err(|e| Error::amount(input, e.to_string()))?;
    Ok(parsed.get_absolute())
}

/// Render a fixed-point integer as an exact decimal string.
///
/// Trailing fractional zeros are trimmed; whole numbers have no point. An
/// unsupported scale renders the raw integer.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let Ok(formatted) = utils::format_units(raw, decimals) else {
        return raw.to_string();
    };

    match formatted.split_once('.') {
        Some((int_part, frac_part)) => {
            let frac_part = frac_part.trim_end_matches('0');
            if frac_part.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{frac_part}")
            }
        }
        None => formatted,
    }
}

/// Convert a fixed-point integer to a real number for display.
///
/// Precision beyond what an `f64` can hold is lost; never feed the result
/// back into a transaction.
pub fn to_display(raw: U256, decimals: u8) -> f64 {
    format_units(raw, decimals).parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(parse_units("100", 18).unwrap(), ether(100));
        assert_eq!(
            parse_units("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(parse_units(".25", 2).unwrap(), U256::from(25u64));
        assert_eq!(parse_units("7.", 2).unwrap(), U256::from(700u64));
        assert_eq!(parse_units(" +3 ", 0).unwrap(), U256::from(3u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_units("", 18).is_err());
        assert!(parse_units(".", 18).is_err());
        assert!(parse_units("-5", 18).is_err());
        assert!(parse_units("1e3", 18).is_err());
        assert!(parse_units("abc", 18).is_err());
        assert!(parse_units("1.2.3", 18).is_err());
        assert!(parse_units("0.123", 2).is_err());
        assert!(parse_units("1", 40).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(ether(1523), 18), "1523");
        assert_eq!(format_units(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::from(150u64), 2), "1.5");
        assert_eq!(format_units(U256::ZERO, 18), "0");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_to_display() {
        let raw = parse_units("1523.45", 18).unwrap();
        assert_eq!(to_display(raw, 18), 1523.45);
        assert_eq!(to_display(U256::ZERO, 18), 0.0);
    }
}
