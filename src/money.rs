//! Money Conversion Module
//!
//! Conversion between registry decimal strings ("20", "0.033") and the
//! integer base-unit representation wallets expect on the wire.
//!
//! ## Design Principles
//! 1. Exact: integer arithmetic only, never `f64`
//! 2. Explicit Error Handling: no silent truncation on parse
//! 3. Wide: base units are `u128`, so 18-decimal assets stay in range
//!    (`u64` tops out at ~18.44 ETH)
//!
//! ## Usage
//! ```rust
//! use chainpay::money::{parse_amount, format_amount_full};
//!
//! // Registry says "0.01" ETH
//! let wei = parse_amount("0.01", 18).unwrap();
//! assert_eq!(wei, 10_000_000_000_000_000);
//!
//! assert_eq!(format_amount_full(wei, 18), "0.010000000000000000");
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest decimal precision whose scale factor fits in `u128`
pub const MAX_DECIMALS: u32 = 38;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported decimal scale: {0} (max {MAX_DECIMALS})")]
    UnsupportedScale(u32),
}

/// `10^decimals` as `u128`
pub fn scale_factor(decimals: u32) -> Result<u128, MoneyError> {
    if decimals > MAX_DECIMALS {
        return Err(MoneyError::UnsupportedScale(decimals));
    }
    10u128
        .checked_pow(decimals)
        .ok_or(MoneyError::UnsupportedScale(decimals))
}

// ============================================================================
// Parse: Decimal string → base units
// ============================================================================

/// Convert a decimal amount string into base units.
///
/// # Errors
/// * `PrecisionOverflow` - more fractional digits than `decimals`
/// * `InvalidAmount` - zero or signed input
/// * `Overflow` - result does not fit in `u128`
/// * `InvalidFormat` - anything that is not `digits[.digits]`
pub fn parse_amount(amount_str: &str, decimals: u32) -> Result<u128, MoneyError> {
    let multiplier = scale_factor(decimals)?;

    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let parts: Vec<&str> = amount_str.split('.').collect();
    let (whole, frac) = match parts.len() {
        1 => (parts[0], ""),
        2 => {
            // Both sides of the dot must be present: ".5" and "5." are ambiguous
            if parts[0].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if parts[1].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            if decimals == 0 {
                return Err(MoneyError::InvalidFormat(
                    "decimals is 0, but dot provided".into(),
                ));
            }
            (parts[0], parts[1])
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in whole part: {}",
            whole
        )));
    }
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in fractional part: {}",
            frac
        )));
    }

    // No silent truncation
    if frac.len() > decimals as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: decimals,
        });
    }

    // Only digits remain, so a parse failure means overflow
    let whole_num: u128 = whole.parse::<u128>().map_err(|_| MoneyError::Overflow)?;

    let frac_num: u128 = if frac.is_empty() {
        0
    } else {
        let frac_padded = format!("{:0<width$}", frac, width = decimals as usize);
        frac_padded
            .parse::<u128>()
            .map_err(|_| MoneyError::InvalidFormat("invalid fractional part".into()))?
    };

    let amount = whole_num
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(frac_num))
        .ok_or(MoneyError::Overflow)?;

    if amount == 0 {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(amount)
}

// ============================================================================
// Format: base units → decimal string
// ============================================================================

/// Render base units with every fractional digit (`decimals` places).
pub fn format_amount_full(value: u128, decimals: u32) -> String {
    let Ok(multiplier) = scale_factor(decimals) else {
        return value.to_string();
    };
    if decimals == 0 {
        return value.to_string();
    }
    let whole = value / multiplier;
    let frac = value % multiplier;
    format!("{}.{:0>width$}", whole, frac, width = decimals as usize)
}

/// Render base units without trailing fractional zeros ("0.033", "20").
pub fn format_amount_trimmed(value: u128, decimals: u32) -> String {
    let full = format_amount_full(value, decimals);
    if !full.contains('.') {
        return full;
    }
    full.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Base units as a `Decimal` for numeric comparison.
///
/// Returns `None` when the value exceeds `Decimal`'s 96-bit mantissa.
pub fn to_decimal(value: u128, decimals: u32) -> Option<Decimal> {
    let mantissa = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

/// Normalized amount for display ("0.033", "20").
///
/// Goes through `Decimal` when it fits, else trims the full rendering.
pub fn display_amount(value: u128, decimals: u32) -> String {
    match to_decimal(value, decimals) {
        Some(d) => d.normalize().to_string(),
        None => format_amount_trimmed(value, decimals),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
