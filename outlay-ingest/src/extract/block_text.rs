//! Block-text extraction: date-anchored repeating transaction blocks in
//! UPI-app statement text (PhonePe-style exports).
//!
//! Each transaction starts at a `Mon DD, YYYY` anchor and runs to the next
//! anchor or to boilerplate (`Page`, `This is an`). Blocks are sliced by an
//! anchor scan first and grammar-matched second, so one garbled block never
//! derails its neighbors.

use std::sync::OnceLock;

use outlay_core::{RawRecord, RawValue};
use regex::Regex;
use tracing::debug;

const MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

fn anchor_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?:{MONTHS})\s\d{{2}},\s\d{{4}}")).expect("anchor pattern")
    })
}

fn terminator_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Page|This is an").expect("terminator pattern"))
}

fn block_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            concat!(
                r"(?s)^(?P<date>(?:{months})\s\d{{2}},\s\d{{4}})\s*",
                r"(?P<time>\d{{2}}:\d{{2}}\s[AP]M)\s*",
                r"(?P<type>DEBIT|CREDIT)\s*",
                r"₹(?P<amount>[\d,]+(?:\.\d+)?)\s*",
                r"(?P<detail>(?:Paid to|Received from).*)$",
            ),
            months = MONTHS
        ))
        .expect("block pattern")
    })
}

/// Slice statement text into date-anchored blocks and parse each one. Blocks
/// the grammar rejects are skipped.
pub fn extract_blocks(text: &str) -> Vec<RawRecord> {
    let anchors: Vec<usize> = anchor_pattern().find_iter(text).map(|m| m.start()).collect();
    let mut records = Vec::with_capacity(anchors.len());

    for (index, &start) in anchors.iter().enumerate() {
        let hard_end = anchors.get(index + 1).copied().unwrap_or(text.len());
        let mut block = &text[start..hard_end];
        // Boilerplate after the last transaction belongs to no block.
        if let Some(term) = terminator_pattern().find(block) {
            block = &block[..term.start()];
        }
        match parse_block(block.trim()) {
            Some(record) => records.push(record),
            None => debug!(offset = start, "block did not match transaction grammar"),
        }
    }
    records
}

fn parse_block(block: &str) -> Option<RawRecord> {
    let captures = block_pattern().captures(block)?;
    let mut record = RawRecord::new();
    for key in ["date", "time", "type", "amount"] {
        record.insert(key.to_string(), RawValue::text(&captures[key]));
    }

    let detail = captures["detail"].trim().to_string();
    let mut lines = detail.lines().map(str::trim).filter(|line| !line.is_empty());
    if let Some(description) = lines.next() {
        record.insert("description".to_string(), RawValue::text(description));
    }

    if let Some((_, id)) = detail.split_once("Transaction ID") {
        let id = id.lines().next().unwrap_or("").trim();
        if !id.is_empty() {
            record.insert("transaction_id".to_string(), RawValue::text(id));
        }
    }
    if let Some((_, utr)) = detail.split_once("UTR No.") {
        let utr = utr.lines().next().unwrap_or("").trim();
        if !utr.is_empty() {
            record.insert("utr_no".to_string(), RawValue::text(utr));
        }
    }
    // "Paid by" / "Credited to" label the instrument; the masked account
    // number sits on the statement's next line.
    if detail.contains("Paid by") || detail.contains("Credited to") {
        if let Some(account) = detail.lines().map(str::trim).filter(|l| !l.is_empty()).last() {
            if !account.contains("Paid by") && !account.contains("Credited to") {
                record.insert("account".to_string(), RawValue::text(account));
            }
        }
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "\
PhonePe Transaction Statement

Jan 15, 2025
08:45 PM
DEBIT
₹1,250
Paid to Swiggy Instamart
Transaction ID T2501151234567890
UTR No. 500123456789
Paid by
XXXXXX1234
Feb 02, 2025
10:12 AM
CREDIT
₹5,000
Received from Rahul Sharma
Transaction ID T2502021234567891
UTR No. 500987654321
Credited to
XXXXXX1234
Page 1 of 1
This is an automatically generated statement.
";

    #[test]
    fn test_two_blocks_extracted() {
        let records = extract_blocks(STATEMENT);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.get("date"), Some(&RawValue::text("Jan 15, 2025")));
        assert_eq!(first.get("time"), Some(&RawValue::text("08:45 PM")));
        assert_eq!(first.get("type"), Some(&RawValue::text("DEBIT")));
        assert_eq!(first.get("amount"), Some(&RawValue::text("1,250")));
        assert_eq!(
            first.get("description"),
            Some(&RawValue::text("Paid to Swiggy Instamart"))
        );
        assert_eq!(
            first.get("transaction_id"),
            Some(&RawValue::text("T2501151234567890"))
        );
        assert_eq!(first.get("utr_no"), Some(&RawValue::text("500123456789")));
        assert_eq!(first.get("account"), Some(&RawValue::text("XXXXXX1234")));

        let second = &records[1];
        assert_eq!(second.get("type"), Some(&RawValue::text("CREDIT")));
        assert_eq!(
            second.get("description"),
            Some(&RawValue::text("Received from Rahul Sharma"))
        );
    }

    #[test]
    fn test_trailing_boilerplate_cut() {
        let records = extract_blocks(STATEMENT);
        let last = records.last().unwrap();
        let detail_keys: Vec<_> = last.keys().collect();
        assert!(!detail_keys.iter().any(|k| k.contains("Page")));
        assert_eq!(last.get("account"), Some(&RawValue::text("XXXXXX1234")));
    }

    #[test]
    fn test_garbled_block_skipped() {
        let text = "\
Jan 15, 2025
not a transaction at all
Feb 02, 2025
10:12 AM
CREDIT
₹100
Received from A
";
        let records = extract_blocks(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("type"), Some(&RawValue::text("CREDIT")));
    }

    #[test]
    fn test_no_anchors_yields_empty() {
        assert!(extract_blocks("nothing transactional here").is_empty());
    }

    #[test]
    fn test_decimal_amount() {
        let text = "Mar 01, 2025\n09:00 AM\nDEBIT\n₹99.50\nPaid to Cafe\n";
        let records = extract_blocks(text);
        assert_eq!(records[0].get("amount"), Some(&RawValue::text("99.50")));
    }
}
