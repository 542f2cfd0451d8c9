//! Record validation and sanitization.
//!
//! Turns raw interchange rows into [`FlatRecord`]s, or explains why a row
//! was skipped. A single bad row never produces an `Err`; it produces a
//! [`ValidationResult`] carrying the reason.

use crate::models::{FlatRecord, MenuContext, RawRecord};
use crate::{Error, Result};

use super::formats::{HEADER, REQUIRED_HEADER_COLUMNS, header_line};

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Warning: issue noted but the record is still imported.
    Warning,
    /// Error: the record is skipped.
    Error,
}

/// A validation issue found in one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The field that has an issue.
    pub field: String,
    /// Description of the issue.
    pub message: String,
    /// Severity of the issue.
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    /// Creates a warning issue.
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Verdict for one raw record.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// The normalized record, absent when the row is skipped.
    pub record: Option<FlatRecord>,
    /// Issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Creates a passing result.
    #[must_use]
    pub const fn valid(record: FlatRecord) -> Self {
        Self {
            record: Some(record),
            issues: Vec::new(),
        }
    }

    /// Creates a skip verdict with its reason.
    #[must_use]
    pub fn invalid(issue: ValidationIssue) -> Self {
        Self {
            record: None,
            issues: vec![issue],
        }
    }

    /// Adds a warning to the result.
    #[must_use]
    pub fn with_warning(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.issues.push(ValidationIssue::warning(field, message));
        self
    }

    /// Whether the record survives.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.record.is_some()
    }

    /// Warning issues only.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }

    /// The first error, which is the reason a record was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&ValidationIssue> {
        self.issues
            .iter()
            .find(|i| i.severity == ValidationSeverity::Error)
    }
}

/// Per-field length ceilings, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    /// Longest folder path.
    pub max_folder_chars: usize,
    /// Longest title.
    pub max_title_chars: usize,
    /// Longest prompt.
    pub max_prompt_chars: usize,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self {
            max_folder_chars: 200,
            max_title_chars: 100,
            max_prompt_chars: 10_000,
        }
    }
}

/// Validates and normalizes raw records.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    limits: RecordLimits,
}

impl RecordValidator {
    /// Creates a validator with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the length limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: RecordLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates one raw record.
    ///
    /// Fields are trimmed, required fields checked, lengths bounded, the
    /// context normalized and control characters removed from title and
    /// prompt, in that order.
    #[must_use]
    pub fn validate(&self, raw: &RawRecord) -> ValidationResult {
        let folder = raw.folder.trim();
        let title = raw.title.trim();
        let prompt = raw.prompt.trim();
        let context = raw.context.trim();

        if title.is_empty() {
            return ValidationResult::invalid(ValidationIssue::error("title", "title missing"));
        }
        if prompt.is_empty() {
            return ValidationResult::invalid(ValidationIssue::error("prompt", "prompt missing"));
        }

        let checks = [
            ("folder", folder, self.limits.max_folder_chars),
            ("title", title, self.limits.max_title_chars),
            ("prompt", prompt, self.limits.max_prompt_chars),
        ];
        for (field, value, limit) in checks {
            let chars = value.chars().count();
            if chars > limit {
                return ValidationResult::invalid(ValidationIssue::error(
                    field,
                    format!("{field} too long ({chars} characters, limit {limit})"),
                ));
            }
        }

        let parsed_context = if context.is_empty() {
            Some(MenuContext::default())
        } else {
            MenuContext::parse(context)
        };

        let title = strip_control_chars(title);
        let prompt = strip_control_chars(prompt);
        if title.is_empty() {
            return ValidationResult::invalid(ValidationIssue::error("title", "title missing"));
        }
        if prompt.is_empty() {
            return ValidationResult::invalid(ValidationIssue::error("prompt", "prompt missing"));
        }

        let record = FlatRecord::new(
            folder,
            title,
            prompt,
            parsed_context.unwrap_or_default(),
        );
        let result = ValidationResult::valid(record);
        match parsed_context {
            Some(_) => result,
            None => result.with_warning(
                "context",
                format!("invalid context '{context}' converted to '{}'", MenuContext::Both),
            ),
        }
    }
}

/// Removes ASCII control characters (0x00-0x1F and 0x7F).
#[must_use]
pub fn strip_control_chars(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_control()).collect()
}

/// Checks the header row.
///
/// The first three columns, trimmed, must read `folder,title,prompt`
/// exactly. A fourth column is optional and not checked.
///
/// # Errors
///
/// Returns [`Error::HeaderMismatch`] when the header does not match.
pub fn check_header(header: &[String]) -> Result<()> {
    let matches = header.len() >= REQUIRED_HEADER_COLUMNS
        && header
            .iter()
            .zip(HEADER)
            .take(REQUIRED_HEADER_COLUMNS)
            .all(|(actual, expected)| actual.trim() == expected);

    if matches {
        Ok(())
    } else {
        Err(Error::HeaderMismatch {
            expected: header_line(),
            found: header.join(","),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn header(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_validate_valid_record() {
        let validator = RecordValidator::new();
        let result = validator.validate(&RawRecord::new(" A/B ", " Title ", " Prompt ", " page "));
        assert!(result.is_valid());
        assert!(result.issues.is_empty());
        assert_eq!(
            result.record,
            Some(FlatRecord::new("A/B", "Title", "Prompt", MenuContext::Page))
        );
    }

    #[test_case("", "p", "title missing" ; "empty title")]
    #[test_case("   ", "p", "title missing" ; "blank title")]
    #[test_case("t", "", "prompt missing" ; "empty prompt")]
    #[test_case("\u{1}", "p", "title missing" ; "title only control chars")]
    #[test_case("t", "\u{7f}\u{0}", "prompt missing" ; "prompt only control chars")]
    fn test_validate_missing_fields(title: &str, prompt: &str, reason: &str) {
        let result = RecordValidator::new().validate(&RawRecord::new("", title, prompt, "both"));
        assert!(!result.is_valid());
        assert_eq!(result.skip_reason().map(|i| i.message.as_str()), Some(reason));
    }

    #[test_case("f", 201, 1, 1 ; "folder")]
    #[test_case("t", 1, 101, 1 ; "title")]
    #[test_case("p", 1, 1, 10_001 ; "prompt")]
    fn test_validate_length_ceiling(field: &str, folder: usize, title: usize, prompt: usize) {
        let raw = RawRecord::new(
            "f".repeat(folder),
            "t".repeat(title),
            "p".repeat(prompt),
            "both",
        );
        let result = RecordValidator::new().validate(&raw);
        assert!(!result.is_valid());
        let reason = result.skip_reason().unwrap();
        assert!(reason.message.contains("too long"));
        assert!(reason.field.starts_with(field));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let raw = RawRecord::new("", "あ".repeat(100), "p", "both");
        assert!(RecordValidator::new().validate(&raw).is_valid());
    }

    #[test]
    fn test_length_at_ceiling_passes() {
        let raw = RawRecord::new("f".repeat(200), "t".repeat(100), "p".repeat(10_000), "");
        assert!(RecordValidator::new().validate(&raw).is_valid());
    }

    #[test]
    fn test_custom_limits() {
        let validator = RecordValidator::new().with_limits(RecordLimits {
            max_folder_chars: 5,
            max_title_chars: 5,
            max_prompt_chars: 5,
        });
        assert!(!validator.validate(&RawRecord::new("", "abcdef", "p", "")).is_valid());
    }

    #[test]
    fn test_invalid_context_degrades_to_both() {
        let result = RecordValidator::new().validate(&RawRecord::new("", "t", "p", "everywhere"));
        assert!(result.is_valid());
        assert_eq!(result.record.as_ref().unwrap().context, MenuContext::Both);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_empty_context_is_silent_default() {
        let result = RecordValidator::new().validate(&RawRecord::new("", "t", "p", ""));
        assert_eq!(result.record.unwrap().context, MenuContext::Both);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_control_chars_stripped() {
        let result =
            RecordValidator::new().validate(&RawRecord::new("", "Ti\u{7}tle", "line\none\ttab", ""));
        let record = result.record.unwrap();
        assert_eq!(record.title, "Title");
        assert_eq!(record.prompt, "lineonetab");
    }

    #[test]
    fn test_markup_is_not_escaped() {
        let result = RecordValidator::new().validate(&RawRecord::new("", "<b>", "a & b", ""));
        let record = result.record.unwrap();
        assert_eq!(record.title, "<b>");
        assert_eq!(record.prompt, "a & b");
    }

    #[test_case(&["folder", "title", "prompt", "context"], true ; "full header")]
    #[test_case(&["folder", "title", "prompt"], true ; "three columns")]
    #[test_case(&[" folder ", "title ", " prompt", "anything"], true ; "padded")]
    #[test_case(&["Folder", "title", "prompt"], false ; "case sensitive")]
    #[test_case(&["title", "folder", "prompt"], false ; "wrong order")]
    #[test_case(&["folder", "title"], false ; "too short")]
    #[test_case(&["フォルダ", "タイトル", "プロンプト", "適用範囲"], false ; "localized")]
    fn test_check_header(values: &[&str], ok: bool) {
        assert_eq!(check_header(&header(values)).is_ok(), ok);
    }
}
