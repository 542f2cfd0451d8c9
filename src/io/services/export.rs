//! Menu export service.
//!
//! Flattens a tree into records and serializes them as interchange text.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::io::extract::extract;
use crate::io::formats::{csv, ensure_csv_path, export_filename};
use crate::models::MenuTree;
use crate::{Error, Result};

/// Result of an export operation.
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Number of menus exported.
    pub exported: usize,
    /// The serialized text.
    pub text: String,
    /// Output path (if file export).
    pub path: Option<PathBuf>,
}

impl ExportResult {
    /// Returns whether any menus were exported.
    #[must_use]
    pub const fn has_exports(&self) -> bool {
        self.exported > 0
    }
}

/// Service for exporting menus to interchange text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportService;

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Serializes the tree.
    ///
    /// An empty tree yields the header row alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn export_to_string(&self, tree: &MenuTree) -> Result<ExportResult> {
        let records = extract(tree);
        let text = csv::serialize(records.iter().map(|record| record.as_row()))?;
        tracing::debug!(records = records.len(), bytes = text.len(), "serialized tree");
        Ok(ExportResult {
            exported: records.len(),
            text,
            path: None,
        })
    }

    /// Writes the tree into `dir` under a timestamped file name.
    ///
    /// The directory is created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    #[tracing::instrument(skip(self, tree), fields(dir = %dir.display()))]
    pub async fn export_to_dir(&self, tree: &MenuTree, dir: &Path) -> Result<ExportResult> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "create_export_dir".to_string(),
                cause: format!("{}: {e}", dir.display()),
            })?;
        let path = dir.join(export_filename(&Local::now()));
        self.write(tree, path).await
    }

    /// Writes the tree to a `.csv` file at `path`, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a `.csv` file or cannot be written.
    #[tracing::instrument(skip(self, tree), fields(path = %path.display()))]
    pub async fn export_to_file(&self, tree: &MenuTree, path: &Path) -> Result<ExportResult> {
        ensure_csv_path(path)?;
        self.write(tree, path.to_path_buf()).await
    }

    async fn write(&self, tree: &MenuTree, path: PathBuf) -> Result<ExportResult> {
        let mut result = self.export_to_string(tree)?;
        tokio::fs::write(&path, result.text.as_bytes())
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "write_export_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        tracing::info!(exported = result.exported, path = %path.display(), "export complete");
        result.path = Some(path);
        Ok(result)
    }
}
