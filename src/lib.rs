//! # promptmenu
//!
//! Hierarchical prompt menus with bulk CSV interchange.
//!
//! A menu tree is an ordered forest of folders, menus (a title, a prompt
//! template and a context flag) and separators. This crate flattens that tree
//! into a delimited text format and merges imported rows back into it.
//!
//! ## Features
//!
//! - Record-oriented CSV parser with per-row failure isolation
//! - Field validation and sanitisation with bounded error reporting
//! - Additive, idempotent merge into a named target folder
//! - JSON tree persistence and a built-in default tree
//!
//! ## Example
//!
//! ```rust
//! use promptmenu::io::{ExportService, ImportService, MergeOptions, SequentialIdGenerator};
//! use promptmenu::models::MenuTree;
//!
//! let text = "folder,title,prompt,context\nPresets,Summary,Summarize this page,page";
//! let parsed = ImportService::new().parse_text(text)?;
//!
//! let mut tree = MenuTree::new();
//! let mut ids = SequentialIdGenerator::new("menu");
//! let report = ImportService::new().apply(
//!     &mut tree,
//!     &parsed.records,
//!     &MergeOptions::new("Imported"),
//!     &mut ids,
//! )?;
//! assert_eq!(report.imported, 1);
//!
//! let exported = ExportService::new().export_to_string(&tree)?;
//! assert_eq!(exported.exported, 1);
//! # Ok::<(), promptmenu::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::PromptMenuConfig;
pub use models::{FlatRecord, MenuContext, MenuNode, MenuTree, NodeId, RawRecord};

/// Error type for promptmenu operations.
///
/// Every variant is fatal to the operation that raised it. Row-local problems
/// (a malformed quote, an over-long title) are reported as values inside
/// import results instead.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed arguments, unparsable configuration values |
/// | `OperationFailed` | File I/O, JSON or CSV writer failures |
/// | `EmptyFile` | The selected import file has no bytes |
/// | `FileTooLarge` | The selected import file exceeds the read ceiling |
/// | `TextTooLarge` | The decoded text exceeds the parse ceiling |
/// | `UnsupportedFileType` | The import file is not a `.csv` file |
/// | `HeaderMismatch` | The first row is not the interchange header |
/// | `NoImportableRecords` | Every data row was rejected |
/// | `TargetFolderNotFound` | Merge target is absent and creation is disabled |
/// | `DuplicateNodeId` | A loaded tree carries the same id twice |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Reading or writing a file fails
    /// - The tree store cannot be parsed or serialized
    /// - The CSV writer fails to flush
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The import file is empty.
    #[error("file is empty")]
    EmptyFile,

    /// The import file exceeds the read ceiling.
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// The decoded text exceeds the parse ceiling.
    #[error("text is too large: {size} bytes (limit {limit} bytes)")]
    TextTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// The import file is not a CSV file.
    #[error("unsupported file type: {0} (expected a .csv file)")]
    UnsupportedFileType(String),

    /// The first row does not match the interchange header.
    #[error("header mismatch: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        /// The expected header row.
        expected: String,
        /// The header row that was read.
        found: String,
    },

    /// No data row survived parsing and validation.
    #[error("no importable menus found{}", format_reasons(.reasons))]
    NoImportableRecords {
        /// The first few per-row reasons.
        reasons: Vec<String>,
    },

    /// The merge target folder does not exist and may not be created.
    #[error("target folder not found: {0}")]
    TargetFolderNotFound(String),

    /// A node id occurs more than once in a tree.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),
}

fn format_reasons(reasons: &[String]) -> String {
    if reasons.is_empty() {
        String::new()
    } else {
        format!(": {}", reasons.join(", "))
    }
}

/// Result type alias for promptmenu operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "read_store".to_string(),
            cause: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'read_store' failed: denied");

        let err = Error::TargetFolderNotFound("Imported".to_string());
        assert_eq!(err.to_string(), "target folder not found: Imported");
    }

    #[test]
    fn test_no_importable_records_lists_reasons() {
        let err = Error::NoImportableRecords { reasons: vec![] };
        assert_eq!(err.to_string(), "no importable menus found");

        let err = Error::NoImportableRecords {
            reasons: vec!["line 2: title missing".to_string(), "line 3: prompt missing".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no importable menus found: line 2: title missing, line 3: prompt missing"
        );
    }
}
