//! Date normalization: heterogeneous date strings into `NaiveDate`.
//!
//! The format list is ordered and order is policy: month-first patterns
//! precede day-first, so an ambiguous string like `03/04/2024` resolves to
//! March 4th. Empty or unparseable input falls back to today.

use chrono::{Local, NaiveDate, NaiveTime};

/// Ordered disambiguation list. First successful parse wins.
pub const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%b %d, %Y",
];

/// Attempt each configured format in order; `None` when nothing parses.
pub fn try_parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Normalize a date string, silently falling back to the current process
/// date when the input is empty or matches no pattern.
pub fn normalize_date(raw: &str) -> NaiveDate {
    try_parse_date(raw).unwrap_or_else(|| Local::now().date_naive())
}

/// Parse a 12-hour clock token like `08:45 PM`.
pub fn try_parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%I:%M %p").ok()
}
