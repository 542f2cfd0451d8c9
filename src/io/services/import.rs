//! Menu import service.
//!
//! Orchestrates the import path: read text, parse rows, validate records and
//! merge the survivors into a tree.

use crate::io::formats::csv::{self, RowError};
use crate::io::merge::{MergeOptions, integrate};
use crate::io::traits::{IdGenerator, TextSource};
use crate::io::validation::{RecordValidator, check_header};
use crate::models::{FlatRecord, MenuTree, RawRecord};
use crate::{Error, Result};

/// Cap on warnings and errors kept in results.
pub const MAX_REPORTED_ISSUES: usize = 10;

/// Number of row reasons quoted when nothing could be imported.
pub const MAX_AGGREGATE_REASONS: usize = 5;

/// Fields a data row needs to form a record.
const REQUIRED_FIELDS: usize = 3;

/// Options for menu import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Where and how records are merged.
    pub merge: MergeOptions,
    /// Merge into a copy of the tree and leave the caller's tree untouched.
    pub dry_run: bool,
}

impl ImportOptions {
    /// Creates import options with the given merge options.
    #[must_use]
    pub const fn new(merge: MergeOptions) -> Self {
        Self {
            merge,
            dry_run: false,
        }
    }

    /// Enables or disables dry run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Records that survived parsing and validation.
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    /// Valid records in input order.
    pub records: Vec<FlatRecord>,
    /// Data rows seen, parsed or not.
    pub total_rows: usize,
    /// Rows dropped by the parser or the validator.
    pub skipped_invalid: usize,
    /// Warnings for kept records (capped).
    pub warnings: Vec<String>,
    /// Reasons for dropped rows (capped).
    pub errors: Vec<String>,
}

/// Result of an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of menus added to the tree.
    pub imported: usize,
    /// Number of records skipped as duplicates.
    pub skipped_duplicates: usize,
    /// Number of rows skipped as unparsable or invalid.
    pub skipped_invalid: usize,
    /// Total data rows processed.
    pub total_processed: usize,
    /// Folder that received the menus.
    pub target_folder_name: String,
    /// Whether the target folder was created.
    pub folder_created: bool,
    /// Whether the tree was left untouched.
    pub dry_run: bool,
    /// Warnings encountered (capped).
    pub warnings: Vec<String>,
    /// Errors for skipped rows (capped).
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Returns whether any records were imported.
    #[must_use]
    pub const fn has_imports(&self) -> bool {
        self.imported > 0
    }

    /// Returns whether any errors occurred.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Service for importing menus from interchange text.
#[derive(Debug, Clone, Default)]
pub struct ImportService {
    validator: RecordValidator,
}

impl ImportService {
    /// Creates a new import service with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom validator.
    #[must_use]
    pub const fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Parses and validates interchange text.
    ///
    /// Row-level problems are collected, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFile`] for empty text, and an error if the text
    /// is too large, the header is wrong, or no row yields a valid record.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn parse_text(&self, text: &str) -> Result<ParsedImport> {
        if text.is_empty() {
            return Err(Error::EmptyFile);
        }
        let document = csv::parse(text, check_header)?;

        let mut rows: Vec<(usize, std::result::Result<Vec<String>, RowError>)> = document
            .rows
            .into_iter()
            .map(|row| (row.line, Ok(row.fields)))
            .chain(
                document
                    .failures
                    .into_iter()
                    .map(|failure| (failure.line, Err(failure.error))),
            )
            .collect();
        rows.sort_by_key(|(line, _)| *line);

        let mut parsed = ParsedImport {
            total_rows: rows.len(),
            ..ParsedImport::default()
        };

        for (line, row) in rows {
            let raw = row.and_then(|fields| {
                let found = fields.len();
                RawRecord::from_fields(fields).ok_or(RowError::InsufficientFields {
                    found,
                    required: REQUIRED_FIELDS,
                })
            });
            let raw = match raw {
                Ok(raw) => raw,
                Err(error) => {
                    parsed.skipped_invalid += 1;
                    report_issue(&mut parsed.errors, format!("Line {line}: {error}"));
                    continue;
                },
            };

            let validation = self.validator.validate(&raw);
            for issue in validation.warnings() {
                report_issue(
                    &mut parsed.warnings,
                    format!("Line {line}: {}: {}", issue.field, issue.message),
                );
            }
            if let Some(record) = validation.record {
                tracing::debug!(line, title = %record.title, "accepted row");
                parsed.records.push(record);
            } else {
                parsed.skipped_invalid += 1;
                if let Some(issue) = validation.issues.first() {
                    report_issue(
                        &mut parsed.errors,
                        format!("Line {line}: {}: {}", issue.field, issue.message),
                    );
                }
            }
        }

        if parsed.records.is_empty() {
            return Err(Error::NoImportableRecords {
                reasons: parsed
                    .errors
                    .iter()
                    .take(MAX_AGGREGATE_REASONS)
                    .cloned()
                    .collect(),
            });
        }

        tracing::info!(
            records = parsed.records.len(),
            skipped = parsed.skipped_invalid,
            "parsed import text"
        );
        Ok(parsed)
    }

    /// Merges validated records into a tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge fails; the tree is unchanged then.
    pub fn apply(
        &self,
        tree: &mut MenuTree,
        records: &[FlatRecord],
        options: &MergeOptions,
        ids: &mut dyn IdGenerator,
    ) -> Result<ImportResult> {
        let report = integrate(tree, records, options, ids)?;
        Ok(ImportResult {
            imported: report.added,
            skipped_duplicates: report.skipped,
            total_processed: records.len(),
            target_folder_name: report.target_folder_name,
            folder_created: report.folder_created,
            warnings: report.messages,
            ..ImportResult::default()
        })
    }

    /// Imports interchange text into a tree.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or merging fails.
    pub fn import_text(
        &self,
        text: &str,
        tree: &mut MenuTree,
        options: &ImportOptions,
        ids: &mut dyn IdGenerator,
    ) -> Result<ImportResult> {
        let parsed = self.parse_text(text)?;

        let mut result = if options.dry_run {
            let mut scratch = tree.clone();
            self.apply(&mut scratch, &parsed.records, &options.merge, ids)?
        } else {
            self.apply(tree, &parsed.records, &options.merge, ids)?
        };

        result.dry_run = options.dry_run;
        result.skipped_invalid = parsed.skipped_invalid;
        result.total_processed = parsed.total_rows;
        result.errors = parsed.errors;
        let merge_messages = std::mem::replace(&mut result.warnings, parsed.warnings);
        for message in merge_messages {
            report_issue(&mut result.warnings, message);
        }

        tracing::info!(
            imported = result.imported,
            skipped_duplicates = result.skipped_duplicates,
            skipped_invalid = result.skipped_invalid,
            dry_run = result.dry_run,
            "import complete"
        );
        Ok(result)
    }

    /// Reads a source to completion and imports it.
    ///
    /// Parsing starts only after the whole text has been read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, parsing or merging fails.
    #[tracing::instrument(skip_all, fields(source = %source.describe(), dry_run = options.dry_run))]
    pub async fn import_from_source<S: TextSource>(
        &self,
        source: &S,
        tree: &mut MenuTree,
        options: &ImportOptions,
        ids: &mut dyn IdGenerator,
    ) -> Result<ImportResult> {
        let text = source.read_text().await?;
        self.import_text(&text, tree, options, ids)
    }
}

/// Records an issue, keeping at most [`MAX_REPORTED_ISSUES`] entries.
fn report_issue(list: &mut Vec<String>, message: String) {
    if list.len() < MAX_REPORTED_ISSUES {
        tracing::warn!("{message}");
        list.push(message);
    }
}
