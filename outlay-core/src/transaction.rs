//! Record types shared by every extraction strategy.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar cell value as it appeared in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Number(_) => None,
        }
    }

    /// Render the value as display text (numbers via their `Display` form).
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
        }
    }
}

/// Unnormalized field-name -> value mapping extracted from one source
/// row/block. Produced by a structural extractor, consumed once by the
/// normalization pipeline, and retained verbatim on the canonical record.
pub type RawRecord = BTreeMap<String, RawValue>;

/// Normalized, institution-agnostic transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    /// Signed per the originating source's declared polarity policy.
    pub amount: f64,
    /// May be empty, never absent.
    pub description: String,
    pub merchant: String,
    pub is_expense: bool,
    /// `"uncategorized"` when no rule matched.
    pub category: String,
    /// Originating institution/channel, or `"generic"`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utr_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<NaiveTime>,
    /// The raw record this transaction was derived from, never mutated.
    pub original: RawRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_to_text() {
        assert_eq!(RawValue::text("abc").to_text(), "abc");
        assert_eq!(RawValue::Number(12.5).to_text(), "12.5");
        assert_eq!(RawValue::Number(3.0).to_text(), "3");
    }

    #[test]
    fn test_raw_value_untagged_serde() {
        let rec: RawRecord = serde_json::from_str(r#"{"amount": 12.5, "memo": "coffee"}"#).unwrap();
        assert_eq!(rec.get("amount"), Some(&RawValue::Number(12.5)));
        assert_eq!(rec.get("memo"), Some(&RawValue::text("coffee")));

        let back = serde_json::to_string(&rec).unwrap();
        assert_eq!(back, r#"{"amount":12.5,"memo":"coffee"}"#);
    }
}
