//! Workbook extraction: header-keyed rows out of the first sheet of an
//! Excel workbook.

use std::io::Cursor;

use calamine::{Data, Reader, Xls, Xlsx};
use chrono::NaiveDate;
use outlay_core::{ParseError, RawRecord, RawValue};
use tracing::debug;

fn malformed(error: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed {
        container: "spreadsheet",
        reason: error.to_string(),
    }
}

/// Parse a workbook into raw records keyed by its first row. The extension
/// distinguishes the binary `.xls` format from zip-based `.xlsx`.
pub fn extract_spreadsheet(bytes: &[u8], extension: &str) -> Result<Vec<RawRecord>, ParseError> {
    let cursor = Cursor::new(bytes.to_vec());
    if extension == "xls" {
        let mut workbook = Xls::new(cursor).map_err(malformed)?;
        first_sheet_records(&mut workbook)
    } else {
        let mut workbook = Xlsx::new(cursor).map_err(malformed)?;
        first_sheet_records(&mut workbook)
    }
}

fn first_sheet_records<R>(workbook: &mut R) -> Result<Vec<RawRecord>, ParseError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or_else(|| ParseError::Malformed {
        container: "spreadsheet",
        reason: "workbook has no sheets".to_string(),
    })?;
    debug!(sheet = first.as_str(), "reading first sheet");

    let range = workbook.worksheet_range(first).map_err(malformed)?;
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                record.insert(header.clone(), value);
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }
    Ok(records)
}

fn cell_value(cell: &Data) -> Option<RawValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(RawValue::text(s))
            }
        }
        Data::Float(f) => Some(RawValue::Number(*f)),
        Data::Int(i) => Some(RawValue::Number(*i as f64)),
        Data::Bool(b) => Some(RawValue::text(b.to_string())),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match excel_serial_to_date(serial) {
                Some(date) => Some(RawValue::text(date.format("%Y-%m-%d").to_string())),
                None => Some(RawValue::Number(serial)),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(RawValue::text(s.clone())),
        Data::Error(e) => Some(RawValue::text(e.to_string())),
    }
}

/// Excel serial dates count days from 1899-12-30 (the off-by-two base that
/// absorbs Lotus's phantom 1900-02-29).
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..100_000.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}
