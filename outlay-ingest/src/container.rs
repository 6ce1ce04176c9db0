//! Container classification: map a file name to the structural family that
//! decides which extractor runs.

use std::path::Path;

use outlay_core::ParseError;

/// Structural family of an input document. Dispatch to an extractor is by
/// container; only text-bearing containers consult the source's declared
/// parsing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Header-keyed delimited text (CSV and friends).
    Delimited,
    /// Binary workbook, first sheet only.
    Spreadsheet,
    /// JSON: an array of objects, or an object with a `transactions` array.
    StructuredText,
    /// PDF, consumed through its extracted text layer.
    PortableDocument,
    /// Already-extracted plain statement text.
    PlainText,
}

impl ContainerKind {
    /// Short label used in error messages and log events.
    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Delimited => "delimited",
            ContainerKind::Spreadsheet => "spreadsheet",
            ContainerKind::StructuredText => "structured-text",
            ContainerKind::PortableDocument => "pdf-text",
            ContainerKind::PlainText => "plain-text",
        }
    }
}

/// Classify by file-name extension (case-insensitive). Returns the kind and
/// the lower-cased extension, which the spreadsheet extractor needs to tell
/// workbook formats apart.
pub fn classify(file_name: &str) -> Result<(ContainerKind, String), ParseError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    let kind = match extension.as_str() {
        "csv" | "tsv" => ContainerKind::Delimited,
        "xlsx" | "xls" => ContainerKind::Spreadsheet,
        "json" => ContainerKind::StructuredText,
        "pdf" => ContainerKind::PortableDocument,
        "txt" | "text" => ContainerKind::PlainText,
        _ => return Err(ParseError::UnsupportedContainer { extension }),
    };
    Ok((kind, extension))
}
