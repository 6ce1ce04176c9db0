//! Ordered pattern-to-category rules over transaction descriptions.
//!
//! Rule order is caller-supplied and authoritative: the first matching rule
//! wins, regardless of specificity or match length.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sentinel label when no rule matches.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A declarative rule as it appears in registry files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

/// A rule with its pattern compiled case-insensitively at registry load.
#[derive(Debug, Clone)]
pub struct CompiledCategoryRule {
    pub pattern: Regex,
    pub category: String,
}

impl CompiledCategoryRule {
    pub fn compile(source_name: &str, rule: &CategoryRule) -> Result<Self, ConfigError> {
        let pattern = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|error| ConfigError::Pattern {
                name: source_name.to_string(),
                pattern: rule.pattern.clone(),
                error,
            })?;
        Ok(Self {
            pattern,
            category: rule.category.clone(),
        })
    }
}

/// Return the category of the first rule matching the lower-cased
/// description, or the `"uncategorized"` sentinel.
pub fn categorize(description: &str, rules: &[CompiledCategoryRule]) -> String {
    let description = description.to_lowercase();
    for rule in rules {
        if rule.pattern.is_match(&description) {
            return rule.category.clone();
        }
    }
    UNCATEGORIZED.to_string()
}
