//! The ingestion pipeline: classify, resolve source, extract, normalize.
//!
//! One call takes document bytes plus a file name and yields canonical
//! transactions. Whole-file problems are errors; per-row problems are
//! absorbed (dropped rows are counted, unparseable values fall back) so one
//! bad line never voids a statement.

use serde::Serialize;
use tracing::{debug, warn};

use outlay_core::{
    CanonicalTransaction, CompiledSource, FieldRules, GENERIC_SOURCE, ParseError, ParsingMethod,
    RawRecord, SignPolicy, SourceRegistry, categorize, dates, fields, normalize_amount,
};

use crate::container::{self, ContainerKind};
use crate::detect;
use crate::extract;
use crate::extract::delimited::decode_text;

/// How many leading bytes of a non-text container feed source detection.
const DETECTION_SAMPLE_BYTES: usize = 16 * 1024;

/// Caller knobs for a single parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Registry entry to use, bypassing content detection. An unknown hint
    /// falls back to the generic source rather than failing.
    pub source_hint: Option<String>,
    /// Collect a human-readable note per dropped row.
    pub collect_row_notes: bool,
    /// Reject inputs larger than this many bytes.
    pub max_bytes: Option<usize>,
}

/// Result of one parse: the resolved source, the normalized transactions in
/// document order, and the per-row drop accounting.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub source: String,
    pub transactions: Vec<CanonicalTransaction>,
    pub dropped_rows: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_notes: Vec<String>,
}

/// A registry bound to the extraction machinery. Build once, parse many.
pub struct Pipeline {
    registry: SourceRegistry,
    generic: CompiledSource,
}

impl Pipeline {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            generic: CompiledSource::generic(),
        }
    }

    pub fn with_builtin_registry() -> Self {
        Self::new(SourceRegistry::builtin())
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Parse one document. The file name supplies the container type; the
    /// content (or an explicit hint) supplies the source.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        options: &ParseOptions,
    ) -> Result<ParseOutcome, ParseError> {
        if let Some(limit) = options.max_bytes {
            if bytes.len() > limit {
                return Err(ParseError::InputTooLarge {
                    actual: bytes.len(),
                    limit,
                });
            }
        }

        let (kind, extension) = container::classify(file_name)?;
        debug!(file = file_name, container = kind.label(), "classified");

        let text = match kind {
            ContainerKind::PortableDocument => Some(extract_pdf_text(bytes)?),
            ContainerKind::PlainText => Some(decode_text(bytes)),
            _ => None,
        };

        let source = self.resolve_source(options, text.as_deref(), bytes);
        debug!(source = source.name.as_str(), "source resolved");

        let records = match kind {
            ContainerKind::Delimited => extract::extract_delimited(bytes)?,
            ContainerKind::Spreadsheet => extract::extract_spreadsheet(bytes, &extension)?,
            ContainerKind::StructuredText => extract::extract_structured(bytes)?,
            ContainerKind::PortableDocument | ContainerKind::PlainText => {
                self.extract_from_text(source, text.as_deref().unwrap_or_default(), kind)?
            }
        };
        debug!(records = records.len(), "extraction complete");

        Ok(self.normalize(source, records, options))
    }

    fn resolve_source<'a>(
        &'a self,
        options: &ParseOptions,
        text: Option<&str>,
        bytes: &[u8],
    ) -> &'a CompiledSource {
        if let Some(hint) = options.source_hint.as_deref() {
            if let Some(found) = self.registry.get(hint) {
                return found;
            }
            warn!(hint, "source hint matches no registry entry, using generic");
            return &self.generic;
        }

        let decoded;
        let sample = match text {
            Some(text) => text,
            None => {
                decoded = decode_text(&bytes[..bytes.len().min(DETECTION_SAMPLE_BYTES)]);
                &decoded
            }
        };
        match detect::detect_source(&self.registry, sample) {
            Some(found) => found,
            None => {
                debug!("no identifier matched, using generic");
                &self.generic
            }
        }
    }

    /// Text containers dispatch on the source's declared method. A declared
    /// source whose method has no text implementation is a capability gap;
    /// the undetected generic case is not, it just yields nothing.
    fn extract_from_text(
        &self,
        source: &CompiledSource,
        text: &str,
        kind: ContainerKind,
    ) -> Result<Vec<RawRecord>, ParseError> {
        let unsupported = || ParseError::UnsupportedMethod {
            source_name: source.name.clone(),
            method: source.method,
            container: kind.label(),
        };
        match source.method {
            ParsingMethod::BlockText => Ok(extract::extract_blocks(text)),
            ParsingMethod::FreeformText => {
                // Presence is enforced at registry load.
                let Some(pattern) = source.transaction_pattern.as_ref() else {
                    return Err(unsupported());
                };
                Ok(extract::extract_with_pattern(text, pattern))
            }
            ParsingMethod::GenericDelimited if source.name == GENERIC_SOURCE => {
                warn!("no extraction grammar for undetected text document");
                Ok(Vec::new())
            }
            ParsingMethod::Tabular | ParsingMethod::GenericDelimited => Err(unsupported()),
        }
    }

    fn normalize(
        &self,
        source: &CompiledSource,
        records: Vec<RawRecord>,
        options: &ParseOptions,
    ) -> ParseOutcome {
        let mut transactions = Vec::with_capacity(records.len());
        let mut dropped_rows = 0usize;
        let mut row_notes = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match normalize_record(source, record) {
                Ok(transaction) => transactions.push(transaction),
                Err(reason) => {
                    dropped_rows += 1;
                    debug!(row = index, reason, "row dropped");
                    if options.collect_row_notes {
                        row_notes.push(format!("row {index}: {reason}"));
                    }
                }
            }
        }
        if dropped_rows > 0 {
            warn!(
                source = source.name.as_str(),
                dropped_rows, "rows dropped during normalization"
            );
        }
        ParseOutcome {
            source: source.name.clone(),
            transactions,
            dropped_rows,
            row_notes,
        }
    }
}

/// Map one raw record to a canonical transaction. The only drop conditions
/// are a missing date key and a missing amount key; unparseable values go
/// through the fail-soft normalizers instead.
fn normalize_record(
    source: &CompiledSource,
    record: RawRecord,
) -> Result<CanonicalTransaction, &'static str> {
    let rules = &source.fields;
    let date_aliases = as_refs(&rules.date_aliases);
    let description_aliases = as_refs(&rules.description_aliases);
    let merchant_aliases = as_refs(&rules.merchant_aliases);

    let raw_date = fields::resolve_value(&record, &date_aliases)
        .map(|value| value.to_text())
        .ok_or("no resolvable date key")?;
    let (amount, is_expense) = resolve_amount(source, &record)?;
    let date = normalize_record_date(rules, &raw_date);

    let description = fields::resolve_value(&record, &description_aliases)
        .map(|value| value.to_text())
        .unwrap_or_default();
    let merchant = fields::resolve_value(&record, &merchant_aliases)
        .map(|value| value.to_text())
        .unwrap_or_else(|| {
            description
                .strip_prefix("Paid to ")
                .or_else(|| description.strip_prefix("Received from "))
                .unwrap_or("")
                .to_string()
        });
    let category = categorize(&description, &source.category_rules);

    let transaction_id = meta_text(&record, &["transaction_id", "Transaction ID"]);
    let utr_reference = meta_text(&record, &["utr_no", "utr_reference", "UTR No."]);
    let account_label = meta_text(&record, &["account", "account_label"]);
    let time_of_day = record
        .get("time")
        .and_then(|value| value.as_text())
        .and_then(dates::try_parse_time);

    Ok(CanonicalTransaction {
        date,
        amount,
        description,
        merchant,
        is_expense,
        category,
        source: source.name.clone(),
        transaction_id,
        utr_reference,
        account_label,
        time_of_day,
        original: record,
    })
}

fn as_refs(aliases: &[String]) -> Vec<&str> {
    aliases.iter().map(String::as_str).collect()
}

fn meta_text(record: &RawRecord, candidates: &[&str]) -> Option<String> {
    fields::resolve_value(record, candidates)
        .map(|value| value.to_text())
        .filter(|text| !text.trim().is_empty())
}

/// Resolve the signed amount and expense flag. Withdrawal/deposit column
/// splits take precedence over the plain amount aliases; the source's sign
/// policy then decides polarity and the expense flag.
fn resolve_amount(
    source: &CompiledSource,
    record: &RawRecord,
) -> Result<(f64, bool), &'static str> {
    let rules = &source.fields;

    let mut signed: Option<f64> = None;
    if let Some(value) = rules.withdrawal_key.as_deref().and_then(|key| record.get(key)) {
        if !value.to_text().trim().is_empty() {
            signed = Some(-normalize_amount(value).abs());
        }
    }
    if signed.is_none() {
        if let Some(value) = rules.deposit_key.as_deref().and_then(|key| record.get(key)) {
            if !value.to_text().trim().is_empty() {
                signed = Some(normalize_amount(value).abs());
            }
        }
    }
    let signed = match signed {
        Some(amount) => amount,
        None => {
            let amount_aliases = as_refs(&rules.amount_aliases);
            let value = fields::resolve_value(record, &amount_aliases)
                .ok_or("no resolvable amount key")?;
            normalize_amount(value)
        }
    };

    match source.sign_policy {
        SignPolicy::PositiveIsExpense => Ok((signed, signed > 0.0)),
        SignPolicy::DebitCreditToken => {
            let token = fields::resolve_value(record, &["type", "transaction_type"])
                .map(|value| value.to_text().trim().to_uppercase());
            match token.as_deref() {
                Some("DEBIT") => Ok((-signed.abs(), true)),
                Some("CREDIT") => Ok((signed.abs(), false)),
                // No polarity token: fall back to the literal sign.
                _ => Ok((signed, signed > 0.0)),
            }
        }
    }
}

fn normalize_record_date(rules: &FieldRules, raw: &str) -> chrono::NaiveDate {
    if let Some(format) = rules.date_format.as_deref() {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw.trim(), format) {
            return date;
        }
    }
    dates::normalize_date(raw)
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ParseError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|error| ParseError::Malformed {
        container: "pdf-text",
        reason: error.to_string(),
    })
}
