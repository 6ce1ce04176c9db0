//! outlay-core: canonical transaction types and the pure normalizers behind
//! statement ingestion (amounts, dates, field aliases, category rules, and
//! the declarative source registry).

pub mod amount;
pub mod categorize;
pub mod config;
pub mod dates;
pub mod error;
pub mod fields;
pub mod transaction;

pub use amount::{normalize_amount, normalize_amount_str};
pub use categorize::{CategoryRule, CompiledCategoryRule, UNCATEGORIZED, categorize};
pub use config::{
    CompiledSource, FieldRules, GENERIC_SOURCE, ParsingMethod, SignPolicy, SourceConfig,
    SourceRegistry,
};
pub use dates::{normalize_date, try_parse_date, try_parse_time};
pub use error::{ConfigError, ParseError};
pub use fields::{resolve_field, resolve_value};
pub use transaction::{CanonicalTransaction, RawRecord, RawValue};
