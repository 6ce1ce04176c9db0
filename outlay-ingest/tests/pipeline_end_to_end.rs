//! End-to-end ingestion runs over realistic statement fixtures.

use chrono::NaiveDate;
use outlay_core::ParseError;
use outlay_ingest::{ParseOptions, Pipeline};

const PHONEPE_STATEMENT: &str = "\
PhonePe Transaction Statement
01 Jan, 2025 - 28 Feb, 2025

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
fn test_phonepe_statement_text_end_to_end() {
    let pipeline = Pipeline::with_builtin_registry();
    let outcome = pipeline
        .parse_bytes(
            PHONEPE_STATEMENT.as_bytes(),
            "statement.txt",
            &ParseOptions::default(),
        )
        .unwrap();

    assert_eq!(outcome.source, "phonepe");
    assert_eq!(outcome.dropped_rows, 0);
    assert_eq!(outcome.transactions.len(), 2);

    let debit = &outcome.transactions[0];
    assert_eq!(debit.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(debit.amount, -1250.0);
    assert!(debit.is_expense);
    assert_eq!(debit.description, "Paid to Swiggy Instamart");
    assert_eq!(debit.merchant, "Swiggy Instamart");
    assert_eq!(debit.category, "Food");
    assert_eq!(debit.transaction_id.as_deref(), Some("T2501151234567890"));
    assert_eq!(debit.utr_reference.as_deref(), Some("500123456789"));
    assert_eq!(debit.account_label.as_deref(), Some("XXXXXX1234"));

    let credit = &outcome.transactions[1];
    assert_eq!(credit.amount, 5000.0);
    assert!(!credit.is_expense);
    assert_eq!(credit.category, "Income");
}

#[test]
fn test_csv_short_row_dropped_and_noted() {
    let pipeline = Pipeline::with_builtin_registry();
    let csv = "\
date,amount,description
2024-01-05,12.50,UBER TRIP
2024-01-06
2024-01-07,3.99,COFFEE
";
    let options = ParseOptions {
        collect_row_notes: true,
        ..Default::default()
    };
    let outcome = pipeline
        .parse_bytes(csv.as_bytes(), "export.csv", &options)
        .unwrap();

    assert_eq!(outcome.source, "generic");
    assert_eq!(outcome.transactions.len(), 2);
    assert_eq!(outcome.dropped_rows, 1);
    assert_eq!(outcome.row_notes.len(), 1);
    assert!(outcome.row_notes[0].starts_with("row 1:"));

    // Surviving rows keep document order.
    assert_eq!(outcome.transactions[0].description, "UBER TRIP");
    assert_eq!(outcome.transactions[1].description, "COFFEE");
}

#[test]
fn test_chase_csv_via_hint() {
    let pipeline = Pipeline::with_builtin_registry();
    let csv = "\
Transaction Date,Description,Amount
01/15/2024,UBER TRIP HELP.UBER.COM,24.50
01/16/2024,PAYROLL DIRECT DEP,-2500.00
";
    let options = ParseOptions {
        source_hint: Some("chase".to_string()),
        ..Default::default()
    };
    let outcome = pipeline
        .parse_bytes(csv.as_bytes(), "activity.csv", &options)
        .unwrap();

    assert_eq!(outcome.source, "chase");
    let ride = &outcome.transactions[0];
    assert_eq!(ride.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert!(ride.is_expense);
    assert_eq!(ride.category, "Transportation");
    let payroll = &outcome.transactions[1];
    assert!(!payroll.is_expense);
    assert_eq!(payroll.category, "Income");
}

#[test]
fn test_json_export_end_to_end() {
    let pipeline = Pipeline::with_builtin_registry();
    let json = r#"{
        "account": "checking",
        "transactions": [
            {"date": "2024-02-01", "amount": 10.0, "description": "first"},
            {"date": "2024-02-02", "amount": 20.0, "description": "second"},
            {"description": "no date or amount"}
        ]
    }"#;
    let outcome = pipeline
        .parse_bytes(json.as_bytes(), "export.json", &ParseOptions::default())
        .unwrap();

    assert_eq!(outcome.transactions.len(), 2);
    assert_eq!(outcome.dropped_rows, 1);
    assert_eq!(outcome.transactions[0].description, "first");
    assert_eq!(outcome.transactions[1].description, "second");
    assert_eq!(
        outcome.transactions[0].original.get("amount"),
        Some(&outlay_core::RawValue::Number(10.0))
    );
}

#[test]
fn test_unknown_container_is_fatal() {
    let pipeline = Pipeline::with_builtin_registry();
    let err = pipeline
        .parse_bytes(b"whatever", "report.docx", &ParseOptions::default())
        .unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedContainer { .. }));
}

#[test]
fn test_outcome_serializes_cleanly() {
    let pipeline = Pipeline::with_builtin_registry();
    let outcome = pipeline
        .parse_bytes(
            b"date,amount\n2024-01-05,1.00\n",
            "a.csv",
            &ParseOptions::default(),
        )
        .unwrap();
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["source"], "generic");
    assert_eq!(value["dropped_rows"], 0);
    let tx = &value["transactions"][0];
    assert_eq!(tx["date"], "2024-01-05");
    // Absent metadata is omitted, not nulled.
    assert!(tx.get("transaction_id").is_none());
    assert!(value.get("row_notes").is_none());
}
