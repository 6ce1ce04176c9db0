//! Field resolution: find a canonical field in a raw record by trying a
//! ranked list of known key aliases.
//!
//! Matching is exact (casing variants are spelled out in the alias lists),
//! and each canonical field resolves independently so a record with a date
//! but no merchant still yields partial canonical data.

use crate::transaction::{RawRecord, RawValue};

pub const DATE_ALIASES: &[&str] = &["date", "transaction_date", "Date", "TransactionDate"];
pub const AMOUNT_ALIASES: &[&str] = &["amount", "Amount", "AMOUNT", "transaction_amount"];
pub const DESCRIPTION_ALIASES: &[&str] = &[
    "description",
    "Description",
    "memo",
    "Memo",
    "DESCRIPTION",
    "note",
    "notes",
];
pub const MERCHANT_ALIASES: &[&str] = &["merchant", "payee", "Merchant", "Payee", "vendor", "Vendor"];

/// Return the first candidate key present in the record, in candidate order.
pub fn resolve_field<'a>(record: &RawRecord, candidates: &'a [&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|name| record.contains_key(*name))
}

/// Resolve and fetch in one step.
pub fn resolve_value<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a RawValue> {
    candidates.iter().find_map(|name| record.get(*name))
}
