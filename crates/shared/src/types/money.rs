//! Display formatting for budget amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All figures are `rust_decimal::Decimal`; rounding is half away from zero,
//! matching how the dashboard has always displayed figures.

use rust_decimal::{Decimal, RoundingStrategy};

/// Magnitude breakpoints, largest first (Indian numbering names).
const MAGNITUDES: [(i64, &str); 3] = [
    (10_000_000, "Crore"),
    (100_000, "Lakh"),
    (1_000, "Thousand"),
];

/// Formats an amount as US dollars with thousands grouping.
///
/// Fraction digits are not forced: `1000` renders as `$1,000`, `1234.5`
/// as `$1,234.5`. At most two fraction digits are kept.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&rounded.abs().to_string()))
}

/// Abbreviates large amounts on a thousand / lakh / crore scale.
///
/// Amounts of at least 1e7, 1e5 and 1e3 become `"x.xx Crore"`,
/// `"x.xx Lakh"` and `"x.xx Thousand"`. Anything smaller (including
/// negatives) is printed as a grouped number with up to three fraction
/// digits.
#[must_use]
pub fn format_magnitude(amount: Decimal) -> String {
    for (threshold, name) in MAGNITUDES {
        let threshold = Decimal::from(threshold);
        if amount >= threshold {
            return format!("{} {name}", fixed(amount / threshold, 2));
        }
    }

    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", group_thousands(&rounded.abs().to_string()))
}

/// Renders `value` with exactly `dp` fraction digits.
#[must_use]
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Inserts `,` every three digits of the integer part of an unsigned numeral.
fn group_thousands(numeral: &str) -> String {
    let (int_part, frac_part) = match numeral.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (numeral, None),
    };

    let mut grouped = String::with_capacity(numeral.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
