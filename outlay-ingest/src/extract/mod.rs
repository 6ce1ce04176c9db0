//! Structural extractors: one per container family plus the text grammars.
//! All of them produce the same currency, `Vec<RawRecord>`, which the
//! pipeline then normalizes uniformly.

pub mod block_text;
pub mod delimited;
pub mod freeform;
pub mod spreadsheet;
pub mod structured;

pub use block_text::extract_blocks;
pub use delimited::extract_delimited;
pub use freeform::extract_with_pattern;
pub use spreadsheet::extract_spreadsheet;
pub use structured::extract_structured;
