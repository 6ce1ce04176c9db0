//! Delimited-text extraction: header-keyed rows out of CSV-family exports.

use csv::ReaderBuilder;
use outlay_core::{ParseError, RawRecord, RawValue};
use tracing::debug;

/// How much of the document the delimiter sniffer looks at.
const SNIFF_WINDOW: usize = 1024;

const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Pick the candidate delimiter occurring most often in the header line.
/// Falls back to comma on a tie-less, delimiter-free line.
fn sniff_delimiter(text: &str) -> u8 {
    let sample: String = text.chars().take(SNIFF_WINDOW).collect();
    let header = sample.lines().next().unwrap_or("");
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .map(|delim| (delim, header.matches(delim as char).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(delim, _)| delim)
        .unwrap_or(b',')
}

/// Parse delimited text into raw records keyed by the header row.
///
/// Rows the reader cannot decode are skipped, not fatal; rows shorter than
/// the header simply omit the trailing keys. A missing or empty header is
/// the only hard failure.
pub fn extract_delimited(bytes: &[u8]) -> Result<Vec<RawRecord>, ParseError> {
    let text = decode_text(bytes);
    let delimiter = sniff_delimiter(&text);
    debug!(delimiter = %(delimiter as char), "delimiter sniffed");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| ParseError::Malformed {
            container: "delimited",
            reason: error.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::Malformed {
            container: "delimited",
            reason: "missing header row".to_string(),
        });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                debug!(%error, "skipping undecodable row");
                continue;
            }
        };
        let mut record = RawRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            record.insert(header.clone(), RawValue::text(value));
        }
        if !record.is_empty() {
            records.push(record);
        }
    }
    Ok(records)
}

/// Lossy UTF-8 decode with the BOM stripped if present.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_delimited_with_header() {
        let records =
            extract_delimited(b"date,amount,description\n2024-01-05,12.50,UBER TRIP\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("date"), Some(&RawValue::text("2024-01-05")));
        assert_eq!(records[0].get("amount"), Some(&RawValue::text("12.50")));
    }

    #[test]
    fn test_semicolon_sniffed() {
        let records = extract_delimited(b"date;amount\n2024-01-05;9,99\n").unwrap();
        assert_eq!(records[0].get("amount"), Some(&RawValue::text("9,99")));
    }

    #[test]
    fn test_tab_and_pipe_sniffed() {
        assert_eq!(sniff_delimiter("date\tamount\tmemo"), b'\t');
        assert_eq!(sniff_delimiter("date|amount|memo"), b'|');
        assert_eq!(sniff_delimiter("single_column"), b',');
    }

    #[test]
    fn test_bom_is_stripped() {
        let records = extract_delimited(b"\xef\xbb\xbfdate,amount\n2024-01-05,1.00\n").unwrap();
        assert!(records[0].contains_key("date"));
    }

    #[test]
    fn test_short_row_omits_trailing_keys() {
        let records =
            extract_delimited(b"date,amount,memo\n2024-01-05,1.00,coffee\n2024-01-06\n").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].contains_key("date"));
        assert!(!records[1].contains_key("amount"));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = extract_delimited(b"").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }
}
