//! Amount normalization: heterogeneous textual money representations into a
//! signed float.
//!
//! Malformed input normalizes to 0.0 rather than erroring so one bad cell
//! never interrupts a batch; rows with no amount field at all are the
//! pipeline's responsibility to drop.

use crate::transaction::RawValue;

/// Currency glyphs stripped before numeric conversion.
const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€', '₹'];

/// Normalize a raw cell value to a signed float. Numbers pass through.
pub fn normalize_amount(value: &RawValue) -> f64 {
    match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => normalize_amount_str(s),
    }
}

/// Normalize a textual amount: strips currency symbols and thousands
/// separators, treats `(...)` as negative, and yields 0.0 for anything that
/// still fails to convert.
pub fn normalize_amount_str(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect();
    let cleaned = cleaned.trim();

    let signed = if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() >= 2 {
        format!("-{}", &cleaned[1..cleaned.len() - 1])
    } else {
        cleaned.to_string()
    };

    signed.trim().parse().unwrap_or(0.0)
}
