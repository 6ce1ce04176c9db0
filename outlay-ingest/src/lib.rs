//! outlay-ingest: document ingestion for statement normalization. Classifies
//! containers, detects the originating source, extracts raw records, and
//! normalizes them into canonical transactions.

pub mod container;
pub mod detect;
pub mod extract;
pub mod pipeline;

pub use container::{ContainerKind, classify};
pub use detect::{DETECTION_WINDOW, detect_source};
pub use pipeline::{ParseOptions, ParseOutcome, Pipeline};
