//! Structured-text extraction: raw records out of JSON exports.
//!
//! Two shapes are accepted: a top-level array of objects, or an object
//! wrapping that array under a `transactions` key. Anything else is a
//! malformed document; non-object array elements are skipped.

use outlay_core::{ParseError, RawRecord, RawValue};
use serde_json::Value;
use tracing::debug;

pub fn extract_structured(bytes: &[u8]) -> Result<Vec<RawRecord>, ParseError> {
    let malformed = |reason: &str| ParseError::Malformed {
        container: "structured-text",
        reason: reason.to_string(),
    };

    let value: Value =
        serde_json::from_slice(bytes).map_err(|error| malformed(&error.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("transactions") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(malformed("\"transactions\" is not an array")),
            None => return Err(malformed("object has no \"transactions\" array")),
        },
        _ => return Err(malformed("expected an array or an object of records")),
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            debug!("skipping non-object array element");
            continue;
        };
        let mut record = RawRecord::new();
        for (key, value) in map {
            if let Some(value) = scalar_value(&value) {
                record.insert(key, value);
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }
    Ok(records)
}

/// Flatten a JSON scalar; nested structures are dropped, not stringified.
fn scalar_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::String(s) => Some(RawValue::text(s.as_str())),
        Value::Number(n) => n.as_f64().map(RawValue::Number),
        Value::Bool(b) => Some(RawValue::text(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
