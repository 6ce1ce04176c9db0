//! Error taxonomy for the normalization core.
//!
//! Only whole-file conditions surface as errors. Per-row anomalies (missing
//! fields, unparseable dates/amounts) are absorbed by the fail-soft policies
//! and reported through the drop count.

use std::path::PathBuf;

use crate::config::ParsingMethod;

/// Fatal per-file parse failures. No partial output accompanies these.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Container type could not be recognized from the file name.
    #[error("unsupported container type: {extension:?}")]
    UnsupportedContainer { extension: String },

    /// The container was recognized but its payload is unreadable
    /// (malformed JSON shape, unreadable spreadsheet or PDF, broken header).
    #[error("malformed {container} document: {reason}")]
    Malformed {
        container: &'static str,
        reason: String,
    },

    /// A registry entry declares an extraction method that is not backed by
    /// an implementation for this container. Distinct from `Malformed`: it
    /// signals a configuration/capability gap, not bad input.
    // Not named `source`: thiserror treats a `source` field as the error
    // cause and would demand `std::error::Error` of it.
    #[error(
        "source {source_name:?} declares method {method:?}, not implemented for {container} input"
    )]
    UnsupportedMethod {
        source_name: String,
        method: ParsingMethod,
        container: &'static str,
    },

    /// Soft input cap exceeded (opt-in via `ParseOptions::max_bytes`).
    #[error("input of {actual} bytes exceeds the configured cap of {limit} bytes")]
    InputTooLarge { actual: usize, limit: usize },
}

/// Registry load-time validation failures. Malformed entries are rejected
/// here, before any parse runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading registry {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The registry file is not a JSON object of source entries.
    #[error("registry shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("source {name:?}: {reason}")]
    Entry { name: String, reason: String },

    #[error("source {name:?}: invalid pattern {pattern:?}: {error}")]
    Pattern {
        name: String,
        pattern: String,
        #[source]
        error: regex::Error,
    },
}
