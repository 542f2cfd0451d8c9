//! Import/Export I/O subsystem.
//!
//! Converts between the hierarchical menu tree and flat CSV interchange text.
//!
//! # Architecture
//!
//! - **Codec** ([`formats::csv`]) parses rows with per-row failure isolation
//!   and serializes with minimal quoting
//! - **Validation layer** trims, bounds and sanitizes each record
//! - **Extractor** flattens a tree into records in pre-order
//! - **Merge engine** appends records under a named top-level folder
//! - **Services** orchestrate the import and export paths
//!
//! # Control Flow
//!
//! | Path | Steps |
//! |------|-------|
//! | Export | tree → [`extract`] → [`formats::csv::serialize`] → text |
//! | Import | text → [`formats::csv::parse`] → [`RecordValidator`] → [`integrate`] → tree |
//!
//! # Examples
//!
//! ## Import a file
//!
//! ```rust,ignore
//! use promptmenu::io::{FileTextSource, ImportOptions, ImportService, UuidIdGenerator};
//!
//! let source = FileTextSource::new("menus.csv");
//! let result = ImportService::new()
//!     .import_from_source(&source, &mut tree, &ImportOptions::default(), &mut UuidIdGenerator::new())
//!     .await?;
//! println!("Imported {} menus", result.imported);
//! ```
//!
//! ## Export to a directory
//!
//! ```rust,ignore
//! use promptmenu::io::ExportService;
//!
//! let result = ExportService::new().export_to_dir(&tree, &export_dir).await?;
//! println!("Exported {} menus", result.exported);
//! ```

pub mod extract;
pub mod formats;
pub mod merge;
pub mod services;
pub mod sources;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use extract::extract;
pub use merge::{MergeOptions, MergeReport, integrate};
pub use services::export::{ExportResult, ExportService};
pub use services::import::{ImportOptions, ImportResult, ImportService, ParsedImport};
pub use sources::{FileTextSource, InlineTextSource};
pub use traits::{IdGenerator, IdKind, SequentialIdGenerator, TextSource, UuidIdGenerator};
pub use validation::{
    RecordLimits, RecordValidator, ValidationIssue, ValidationResult, ValidationSeverity,
};
