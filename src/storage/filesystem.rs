//! Filesystem-based menu storage.
//!
//! Stores the whole tree as one pretty-printed JSON array.

use std::fs;
use std::path::{Path, PathBuf};

use super::MenuStore;
use crate::models::MenuTree;
use crate::{Error, Result};

/// Filesystem-based menu storage.
///
/// Saves go to a sibling temporary file that is then renamed over the
/// store file, so readers never see a half-written tree.
#[derive(Debug, Clone)]
pub struct FilesystemMenuStore {
    /// Path of the JSON file.
    path: PathBuf,
}

impl FilesystemMenuStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// Nothing is created until the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MenuStore for FilesystemMenuStore {
    fn load(&self) -> Result<Option<MenuTree>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::OperationFailed {
            operation: "read_menu_store".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })?;

        let tree: MenuTree = serde_json::from_str(&content).map_err(|e| Error::OperationFailed {
            operation: "parse_menu_json".to_string(),
            cause: e.to_string(),
        })?;
        tree.validate_ids()?;

        tracing::debug!(path = %self.path.display(), nodes = tree.len(), "loaded menu tree");
        Ok(Some(tree))
    }

    fn save(&self, tree: &MenuTree) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_store_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(tree).map_err(|e| Error::OperationFailed {
            operation: "serialize_menu_tree".to_string(),
            cause: e.to_string(),
        })?;

        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| Error::OperationFailed {
            operation: "write_menu_store".to_string(),
            cause: e.to_string(),
        })?;
        fs::rename(&temp, &self.path).map_err(|e| Error::OperationFailed {
            operation: "replace_menu_store".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(path = %self.path.display(), "saved menu tree");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
