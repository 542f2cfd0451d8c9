//! Flat interchange records.
//!
//! One record corresponds to exactly one menu leaf. Folders are not rows of
//! their own; they appear as the slash-joined `folder` path of the menus they
//! contain.

use serde::{Deserialize, Serialize};

use super::MenuContext;

/// A data row exactly as read from the interchange text.
///
/// Nothing is trimmed or checked yet; see
/// [`RecordValidator`](crate::io::RecordValidator).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Slash-joined folder path (empty for root-level menus).
    pub folder: String,
    /// Menu title.
    pub title: String,
    /// Prompt template.
    pub prompt: String,
    /// Context value as written; empty when the column is absent.
    pub context: String,
}

impl RawRecord {
    /// Creates a raw record from its four columns.
    #[must_use]
    pub fn new(
        folder: impl Into<String>,
        title: impl Into<String>,
        prompt: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            title: title.into(),
            prompt: prompt.into(),
            context: context.into(),
        }
    }

    /// Builds a raw record from parsed fields.
    ///
    /// Returns `None` when fewer than three fields are present. A missing
    /// fourth field yields an empty context, and extra fields are ignored.
    #[must_use]
    pub fn from_fields(fields: Vec<String>) -> Option<Self> {
        if fields.len() < 3 {
            return None;
        }
        let mut it = fields.into_iter();
        Some(Self {
            folder: it.next().unwrap_or_default(),
            title: it.next().unwrap_or_default(),
            prompt: it.next().unwrap_or_default(),
            context: it.next().unwrap_or_default(),
        })
    }
}

/// A validated record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Slash-joined folder path (empty for root-level menus).
    pub folder: String,
    /// Menu title, non-empty.
    pub title: String,
    /// Prompt template, non-empty.
    pub prompt: String,
    /// Applicability context.
    pub context: MenuContext,
}

impl FlatRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(
        folder: impl Into<String>,
        title: impl Into<String>,
        prompt: impl Into<String>,
        context: MenuContext,
    ) -> Self {
        Self {
            folder: folder.into(),
            title: title.into(),
            prompt: prompt.into(),
            context,
        }
    }

    /// Returns the record as an interchange row in header order.
    #[must_use]
    pub fn as_row(&self) -> [&str; 4] {
        [
            &self.folder,
            &self.title,
            &self.prompt,
            self.context.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_from_fields_requires_three() {
        assert!(RawRecord::from_fields(fields(&["a", "b"])).is_none());
        assert!(RawRecord::from_fields(Vec::new()).is_none());
    }

    #[test]
    fn test_from_fields_missing_context() {
        let raw = RawRecord::from_fields(fields(&["f", "t", "p"])).unwrap();
        assert_eq!(raw, RawRecord::new("f", "t", "p", ""));
    }

    #[test]
    fn test_from_fields_ignores_extra_columns() {
        let raw = RawRecord::from_fields(fields(&["f", "t", "p", "page", "extra"])).unwrap();
        assert_eq!(raw.context, "page");
    }

    #[test]
    fn test_as_row_order() {
        let record = FlatRecord::new("A/B", "Title", "Prompt", MenuContext::Selection);
        assert_eq!(record.as_row(), ["A/B", "Title", "Prompt", "selection"]);
    }
}
