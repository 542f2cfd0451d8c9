//! Interchange format constants and file helpers.
//!
//! The only interchange format is CSV; see [`csv`] for the codec itself.

pub mod csv;

use chrono::{DateTime, TimeZone};
use std::path::Path;

use crate::{Error, Result};

/// Column names of the header row, in order.
pub const HEADER: [&str; 4] = ["folder", "title", "prompt", "context"];

/// Number of leading header columns that must match exactly.
pub const REQUIRED_HEADER_COLUMNS: usize = 3;

/// Largest file accepted for import, in bytes.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest decoded text accepted for parsing, in bytes.
pub const MAX_TEXT_BYTES: usize = 5 * 1024 * 1024;

/// File extension used for interchange files.
pub const EXTENSION: &str = "csv";

/// Returns the header row as it appears in exported text.
#[must_use]
pub fn header_line() -> String {
    HEADER.join(",")
}

/// Checks that a path names a `.csv` file (case-insensitive).
///
/// # Errors
///
/// Returns [`Error::UnsupportedFileType`] for any other extension.
pub fn ensure_csv_path(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTENSION));

    if is_csv {
        Ok(())
    } else {
        Err(Error::UnsupportedFileType(path.display().to_string()))
    }
}

/// Builds the export file name for a point in time.
///
/// Format: `prompt-menus-YYYY-MM-DD-HHMMSS.csv`.
#[must_use]
pub fn export_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("prompt-menus-{}.{EXTENSION}", at.format("%Y-%m-%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_header_line() {
        assert_eq!(header_line(), "folder,title,prompt,context");
    }

    #[test]
    fn test_ensure_csv_path() {
        assert!(ensure_csv_path(Path::new("menus.csv")).is_ok());
        assert!(ensure_csv_path(Path::new("MENUS.CSV")).is_ok());
        assert!(matches!(
            ensure_csv_path(Path::new("menus.txt")),
            Err(Error::UnsupportedFileType(_))
        ));
        assert!(ensure_csv_path(Path::new("menus")).is_err());
    }

    #[test]
    fn test_export_filename() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(export_filename(&at), "prompt-menus-2024-03-09-070502.csv");
    }
}
