//! Freeform-text extraction: apply a registry-supplied named-capture
//! pattern to statement text, one raw record per match.

use outlay_core::{RawRecord, RawValue};
use regex::Regex;

/// Every named capture group that participated in a match becomes a record
/// key. Matches with no participating named group are dropped.
pub fn extract_with_pattern(text: &str, pattern: &Regex) -> Vec<RawRecord> {
    let names: Vec<&str> = pattern.capture_names().flatten().collect();
    pattern
        .captures_iter(text)
        .filter_map(|captures| {
            let mut record = RawRecord::new();
            for name in &names {
                if let Some(value) = captures.name(name) {
                    record.insert(name.to_string(), RawValue::text(value.as_str()));
                }
            }
            if record.is_empty() { None } else { Some(record) }
        })
        .collect()
}
