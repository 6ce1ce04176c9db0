//! Source Format Registry: declarative per-institution parsing and
//! categorization rules.
//!
//! The registry is loaded once at startup from JSON (one entry per source,
//! entry order is detection order) and validated eagerly: every regex is
//! compiled and method/pattern consistency is checked at load time, so a
//! malformed entry can never fail mid-parse. After load the registry is
//! read-only; reload requires restart.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::categorize::{CategoryRule, CompiledCategoryRule};
use crate::error::ConfigError;
use crate::fields;

/// Name of the pseudo-source used when neither a hint nor detection
/// resolves an institution.
pub const GENERIC_SOURCE: &str = "generic";

const BUILTIN_SOURCES: &str = include_str!("../registry/sources.json");

/// How raw records are pulled out of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParsingMethod {
    /// Source-specific column mapping over header-keyed rows.
    Tabular,
    /// Config-supplied named-capture pattern applied to extracted text.
    FreeformText,
    /// Date-anchored repeating blocks in unstructured statement text.
    BlockText,
    /// Built-in alias mapping over header-keyed rows.
    GenericDelimited,
}

/// Expense/income polarity convention for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignPolicy {
    /// Amount keeps its literal parsed sign; positive means expense.
    #[default]
    PositiveIsExpense,
    /// A DEBIT/CREDIT token carries polarity: debit is a negative internal
    /// amount and an expense, credit positive income.
    DebitCreditToken,
}

/// Per-source field extraction rules. Alias lists default to the built-in
/// generic lists when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    pub date_aliases: Vec<String>,
    pub amount_aliases: Vec<String>,
    pub description_aliases: Vec<String>,
    pub merchant_aliases: Vec<String>,
    /// Column whose non-empty value means "money out" (stored as -abs).
    pub withdrawal_key: Option<String>,
    /// Column whose non-empty value means "money in" (stored as +abs).
    pub deposit_key: Option<String>,
    /// Source-specific date format tried before the generic ordered list.
    pub date_format: Option<String>,
}

impl Default for FieldRules {
    fn default() -> Self {
        fn owned(aliases: &[&str]) -> Vec<String> {
            aliases.iter().map(|s| s.to_string()).collect()
        }
        Self {
            date_aliases: owned(fields::DATE_ALIASES),
            amount_aliases: owned(fields::AMOUNT_ALIASES),
            description_aliases: owned(fields::DESCRIPTION_ALIASES),
            merchant_aliases: owned(fields::MERCHANT_ALIASES),
            withdrawal_key: None,
            deposit_key: None,
            date_format: None,
        }
    }
}

/// One registry entry as declared in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Content pattern identifying this source, matched case-insensitively
    /// against the leading text of a document. Entries without one are
    /// reachable only via an explicit hint.
    #[serde(default)]
    pub identifier_pattern: Option<String>,
    pub parsing_method: ParsingMethod,
    #[serde(default)]
    pub sign_policy: SignPolicy,
    #[serde(default)]
    pub fields: FieldRules,
    /// Named-capture pattern for `freeform-text` sources.
    #[serde(default)]
    pub transaction_pattern: Option<String>,
    #[serde(default)]
    pub category_rules: Vec<CategoryRule>,
}

/// A registry entry with every pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledSource {
    pub name: String,
    pub identifier: Option<Regex>,
    pub method: ParsingMethod,
    pub sign_policy: SignPolicy,
    pub fields: FieldRules,
    pub transaction_pattern: Option<Regex>,
    pub category_rules: Vec<CompiledCategoryRule>,
}

impl CompiledSource {
    pub fn compile(name: &str, config: &SourceConfig) -> Result<Self, ConfigError> {
        let entry_error = |reason: &str| ConfigError::Entry {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if config.fields.date_aliases.is_empty() {
            return Err(entry_error("date_aliases must not be empty"));
        }
        if config.fields.amount_aliases.is_empty() {
            return Err(entry_error("amount_aliases must not be empty"));
        }

        let identifier = config
            .identifier_pattern
            .as_deref()
            .map(|pattern| compile_pattern(name, pattern, true))
            .transpose()?;

        let transaction_pattern = match (config.parsing_method, config.transaction_pattern.as_deref())
        {
            (ParsingMethod::FreeformText, Some(pattern)) => {
                Some(compile_pattern(name, pattern, false)?)
            }
            (ParsingMethod::FreeformText, None) => {
                return Err(entry_error(
                    "parsing method freeform-text requires a transaction_pattern",
                ));
            }
            (_, Some(_)) => {
                return Err(entry_error(
                    "transaction_pattern is only valid with parsing method freeform-text",
                ));
            }
            (_, None) => None,
        };

        let category_rules = config
            .category_rules
            .iter()
            .map(|rule| CompiledCategoryRule::compile(name, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            identifier,
            method: config.parsing_method,
            sign_policy: config.sign_policy,
            fields: config.fields.clone(),
            transaction_pattern,
            category_rules,
        })
    }

    /// The fallback pseudo-source: built-in aliases, literal-sign polarity,
    /// no identifier, no category rules.
    pub fn generic() -> Self {
        Self {
            name: GENERIC_SOURCE.to_string(),
            identifier: None,
            method: ParsingMethod::GenericDelimited,
            sign_policy: SignPolicy::PositiveIsExpense,
            fields: FieldRules::default(),
            transaction_pattern: None,
            category_rules: Vec::new(),
        }
    }
}

fn compile_pattern(name: &str, pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|error| ConfigError::Pattern {
            name: name.to_string(),
            pattern: pattern.to_string(),
            error,
        })
}

/// Ordered, immutable collection of compiled sources. Entry order doubles
/// as detection order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    entries: Vec<CompiledSource>,
}

impl SourceRegistry {
    /// Parse and validate a registry from JSON text: a single object whose
    /// keys are source names and whose values are `SourceConfig` entries.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let config: SourceConfig =
                serde_json::from_value(value).map_err(|error| ConfigError::Entry {
                    name: name.clone(),
                    reason: error.to_string(),
                })?;
            entries.push(CompiledSource::compile(&name, &config)?);
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json(&text)
    }

    /// The embedded default registry. Validity is pinned by a test.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_SOURCES).expect("built-in registry")
    }

    pub fn entries(&self) -> &[CompiledSource] {
        &self.entries
    }

    /// Look up a source by name, case-insensitively (hints are free-form).
    pub fn get(&self, name: &str) -> Option<&CompiledSource> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
