//! Source detection: match registry identifier patterns against the leading
//! text of a document, in registry order.

use outlay_core::{CompiledSource, SourceRegistry};
use tracing::debug;

/// How many characters of leading text detection inspects.
pub const DETECTION_WINDOW: usize = 4096;

/// Return the first registry entry whose identifier matches the document's
/// leading text. Entries without an identifier never match; ties go to the
/// earlier entry.
pub fn detect_source<'a>(registry: &'a SourceRegistry, text: &str) -> Option<&'a CompiledSource> {
    let window: String = text.chars().take(DETECTION_WINDOW).collect();
    for entry in registry.entries() {
        if let Some(identifier) = &entry.identifier {
            if identifier.is_match(&window) {
                debug!(source = entry.name.as_str(), "identifier matched");
                return Some(entry);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifiers() {
        let registry = SourceRegistry::builtin();
        let hit = detect_source(&registry, "PhonePe Transaction Statement\n...").unwrap();
        assert_eq!(hit.name, "phonepe");
        let hit = detect_source(&registry, "Statement - JPMorgan Chase Bank, N.A.").unwrap();
        assert_eq!(hit.name, "chase");
        assert!(detect_source(&registry, "Totally Unknown Bank").is_none());
    }

    #[test]
    fn test_identifier_match_is_case_insensitive() {
        let registry = SourceRegistry::builtin();
        let hit = detect_source(&registry, "bank of america statement").unwrap();
        assert_eq!(hit.name, "bank_of_america");
    }

    #[test]
    fn test_registry_order_breaks_ties() {
        let registry = SourceRegistry::from_json(
            r#"{
                "first": {"identifier_pattern": "Acme", "parsing_method": "tabular"},
                "second": {"identifier_pattern": "Acme Bank", "parsing_method": "tabular"}
            }"#,
        )
        .unwrap();
        let hit = detect_source(&registry, "Acme Bank monthly statement").unwrap();
        assert_eq!(hit.name, "first");
    }

    #[test]
    fn test_identifier_outside_window_missed() {
        let registry = SourceRegistry::builtin();
        let text = format!("{}PhonePe", "x".repeat(DETECTION_WINDOW));
        assert!(detect_source(&registry, &text).is_none());
    }
}
