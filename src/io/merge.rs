//! Merge engine: folds validated records into a menu tree.
//!
//! Merging is strictly additive. Existing nodes are never removed, replaced
//! or reordered; new menus are appended to a single top-level target folder
//! which is created on demand.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::traits::{IdGenerator, IdKind};
use crate::models::{FlatRecord, Folder, Menu, MenuTree, NodeId};
use crate::{Error, Result};

/// Description given to folders created by a merge.
pub const IMPORTED_FOLDER_DESCRIPTION: &str = "Imported menus";

/// Default target folder name.
pub const DEFAULT_TARGET_FOLDER: &str = "Imported";

/// Cap on per-record messages kept in a report.
pub const MAX_REPORT_MESSAGES: usize = 10;

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

/// Options controlling where and how records are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Exact name of the top-level folder receiving the records.
    pub target_folder_name: String,
    /// Create the target folder when it does not exist.
    pub create_new_folder: bool,
    /// Add records even when a same-titled menu already exists.
    pub overwrite_existing: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FOLDER)
    }
}

impl MergeOptions {
    /// Creates options targeting the named folder, creating it if needed and
    /// skipping duplicate titles.
    #[must_use]
    pub fn new(target_folder_name: impl Into<String>) -> Self {
        Self {
            target_folder_name: target_folder_name.into(),
            create_new_folder: true,
            overwrite_existing: false,
        }
    }

    /// Sets whether a missing target folder is created.
    #[must_use]
    pub const fn with_create_new_folder(mut self, create: bool) -> Self {
        self.create_new_folder = create;
        self
    }

    /// Sets whether duplicate titles are added anyway.
    #[must_use]
    pub const fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }
}

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Menus appended to the target folder.
    pub added: usize,
    /// Records skipped as duplicates.
    pub skipped: usize,
    /// Name of the folder that received the records.
    pub target_folder_name: String,
    /// Whether the target folder was created by this merge.
    pub folder_created: bool,
    /// Ids of the appended menus, in order.
    pub added_ids: Vec<NodeId>,
    /// Messages about skipped records (capped).
    pub messages: Vec<String>,
}

/// Merges records into `tree` under the configured target folder.
///
/// Records are considered in order. A record is skipped when a menu with the
/// same title sits directly in the target folder, including menus added
/// earlier in the same call, unless `overwrite_existing` is set. Every new
/// node receives an id not already used anywhere in the tree.
///
/// An empty record slice leaves the tree untouched.
///
/// # Errors
///
/// Returns [`Error::TargetFolderNotFound`] when the folder is absent and
/// creation is disabled, or [`Error::OperationFailed`] when the id generator
/// keeps returning ids that are in use. The tree is unchanged on error.
#[tracing::instrument(
    skip(tree, records, ids),
    fields(records = records.len(), target = %options.target_folder_name)
)]
pub fn integrate(
    tree: &mut MenuTree,
    records: &[FlatRecord],
    options: &MergeOptions,
    ids: &mut dyn IdGenerator,
) -> Result<MergeReport> {
    let mut report = MergeReport {
        target_folder_name: options.target_folder_name.clone(),
        ..MergeReport::default()
    };
    if records.is_empty() {
        tracing::debug!("nothing to merge");
        return Ok(report);
    }

    let mut taken = tree.ids();
    let position = tree.top_level_folder_position(&options.target_folder_name);

    // Plan everything fallible before touching the tree.
    let new_folder = match position {
        Some(_) => None,
        None if options.create_new_folder => {
            let id = fresh_id(ids, &mut taken, IdKind::Folder)?;
            Some(
                Folder::new(id, options.target_folder_name.clone())
                    .with_description(IMPORTED_FOLDER_DESCRIPTION),
            )
        },
        None => {
            return Err(Error::TargetFolderNotFound(
                options.target_folder_name.clone(),
            ));
        },
    };

    let mut titles: HashSet<String> = position
        .and_then(|index| tree.nodes()[index].as_folder())
        .map(|folder| folder.menus().map(|menu| menu.title.clone()).collect())
        .unwrap_or_default();

    let mut additions = Vec::new();
    for record in records {
        if !options.overwrite_existing && titles.contains(&record.title) {
            report.skipped += 1;
            if report.messages.len() < MAX_REPORT_MESSAGES {
                tracing::warn!(title = %record.title, "skipping duplicate menu");
                report
                    .messages
                    .push(format!("duplicate title skipped: {}", record.title));
            }
            continue;
        }

        let id = fresh_id(ids, &mut taken, IdKind::Menu)?;
        titles.insert(record.title.clone());
        report.added_ids.push(id.clone());
        additions.push(Menu::new(
            id,
            record.title.clone(),
            record.prompt.clone(),
            record.context,
        ));
    }
    report.added = additions.len();

    let index = match (position, new_folder) {
        (Some(index), _) => index,
        (None, Some(folder)) => {
            tree.push(folder);
            report.folder_created = true;
            tree.len() - 1
        },
        (None, None) => {
            return Err(Error::TargetFolderNotFound(
                options.target_folder_name.clone(),
            ));
        },
    };
    let folder = tree
        .folder_at_mut(index)
        .ok_or_else(|| Error::TargetFolderNotFound(options.target_folder_name.clone()))?;
    folder.items.extend(additions.into_iter().map(Into::into));

    tracing::info!(
        added = report.added,
        skipped = report.skipped,
        folder_created = report.folder_created,
        "merge complete"
    );
    Ok(report)
}

/// Draws ids until one is unused, reserving it in `taken`.
fn fresh_id(
    ids: &mut dyn IdGenerator,
    taken: &mut HashSet<NodeId>,
    kind: IdKind,
) -> Result<NodeId> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.next_id(kind);
        if taken.insert(id.clone()) {
            return Ok(id);
        }
        tracing::debug!(%id, "generated id already in use");
    }
    Err(Error::OperationFailed {
        operation: "generate_id".to_string(),
        cause: format!("no unused {} id after {MAX_ID_ATTEMPTS} attempts", kind.as_str()),
    })
}
