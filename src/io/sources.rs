//! Text sources for import.

use std::path::{Path, PathBuf};

use super::formats::{MAX_FILE_BYTES, ensure_csv_path};
use super::traits::TextSource;
use crate::{Error, Result};

/// Reads an interchange file from disk.
///
/// The path must name a `.csv` file of at most [`MAX_FILE_BYTES`] bytes with
/// UTF-8 content.
#[derive(Debug, Clone)]
pub struct FileTextSource {
    path: PathBuf,
    max_bytes: u64,
}

impl FileTextSource {
    /// Creates a source for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: MAX_FILE_BYTES,
        }
    }

    /// Overrides the size ceiling.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileTextSource {
    async fn read_text(&self) -> Result<String> {
        ensure_csv_path(&self.path)?;

        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| read_failed(&self.path, &e))?;
        let size = metadata.len();
        if size == 0 {
            return Err(Error::EmptyFile);
        }
        if size > self.max_bytes {
            return Err(Error::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| read_failed(&self.path, &e))?;
        let text = String::from_utf8(bytes).map_err(|e| Error::OperationFailed {
            operation: "decode_file".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })?;

        tracing::debug!(path = %self.path.display(), bytes = size, "read import file");
        Ok(text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_failed(path: &Path, e: &std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "read_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    }
}

/// Text already held in memory.
#[derive(Debug, Clone)]
pub struct InlineTextSource {
    text: String,
}

impl InlineTextSource {
    /// Wraps the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextSource for InlineTextSource {
    async fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "<inline>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menus.csv");
        std::fs::write(&path, "folder,title,prompt\n").unwrap();

        let text = FileTextSource::new(&path).read_text().await.unwrap();
        assert_eq!(text, "folder,title,prompt\n");
    }

    #[tokio::test]
    async fn test_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menus.json");
        std::fs::write(&path, "[]").unwrap();

        let err = FileTextSource::new(&path).read_text().await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[tokio::test]
    async fn test_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let err = FileTextSource::new(&path).read_text().await.unwrap_err();
        assert!(matches!(err, Error::EmptyFile));
    }

    #[tokio::test]
    async fn test_rejects_oversize_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let err = FileTextSource::new(&path)
            .with_max_bytes(16)
            .read_text()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { size: 64, limit: 16 }));
    }

    #[tokio::test]
    async fn test_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = FileTextSource::new(&path).read_text().await.unwrap_err();
        assert!(matches!(err, Error::OperationFailed { operation, .. } if operation == "decode_file"));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let err = FileTextSource::new("/nonexistent/menus.csv")
            .read_text()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { operation, .. } if operation == "read_file"));
    }

    #[tokio::test]
    async fn test_inline_source() {
        let source = InlineTextSource::new("abc");
        assert_eq!(source.read_text().await.unwrap(), "abc");
        assert_eq!(source.describe(), "<inline>");
    }
}
