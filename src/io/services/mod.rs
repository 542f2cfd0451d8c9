//! Import and export service implementations.
//!
//! Orchestrates parsing, validation, merging and serialization.

pub mod export;
pub mod import;

pub use export::{ExportResult, ExportService};
pub use import::{ImportOptions, ImportResult, ImportService, ParsedImport};
