//! Fixed-point amount handling.
//!
//! All balances and rewards are stored as `i64` base units at a scale of
//! 10^10. Coin prices use a scale of 10^3 and area subtree totals a scale
//! of 10^5. Replies carry formatted decimal strings, never raw base units.

/// Base-unit scale for balances, rewards, and withdrawals.
pub const AMOUNT_SCALE: i64 = 10_000_000_000;

/// Scale for the platform coin price config value.
pub const PRICE_SCALE: i64 = 1_000;

/// Scale for area subtree amounts.
pub const AREA_SCALE: i64 = 100_000;

/// Format a scaled value as a decimal string with a fixed number of
/// fraction digits.
#[must_use]
pub fn format_scaled(value: i64, scale: i64, decimals: usize) -> String {
    #[allow(clippy::cast_precision_loss)]
    let v = value as f64 / scale as f64;
    format!("{v:.decimals$}")
}

/// Format a base-unit amount (scale 10^10).
#[must_use]
pub fn format_amount(value: i64, decimals: usize) -> String {
    format_scaled(value, AMOUNT_SCALE, decimals)
}

/// Parse a user-supplied decimal string into base units (scale 10^10).
///
/// Returns `None` for unparseable, non-finite, or out-of-range input.
/// Callers treat `None` and non-positive amounts as a validation failure.
#[must_use]
pub fn parse_amount(input: &str) -> Option<i64> {
    let parsed: f64 = input.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let scaled = parsed * AMOUNT_SCALE as f64;
    #[allow(clippy::cast_precision_loss)]
    if scaled.abs() >= i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(scaled.round() as i64)
}
