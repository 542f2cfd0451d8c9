//! Built-in default menus.
//!
//! The default tree has a "Presets" folder of sample menus followed by an
//! empty "Custom" folder for the user's own entries.

use crate::models::{Folder, Menu, MenuContext, MenuTree, Separator};

/// Id of the built-in presets folder.
pub const PRESET_FOLDER_ID: &str = "preset-folder";

/// Id of the built-in custom folder.
pub const CUSTOM_FOLDER_ID: &str = "custom-folder";

fn preset_folder() -> Folder {
    Folder::new(PRESET_FOLDER_ID, "Presets")
        .with_description("Built-in prompt menus")
        .with_item(Menu::new(
            "preset-summary",
            "Summarize",
            "Summarize the following text clearly:\n\n{$TEXT}",
            MenuContext::Both,
        ))
        .with_item(Menu::new(
            "preset-translate",
            "Translate",
            "Translate the following text into natural English:\n\n{$TEXT}",
            MenuContext::Selection,
        ))
        .with_item(Menu::new(
            "preset-proofread",
            "Proofread",
            "Proofread the following text and suggest improvements:\n\n{$TEXT}",
            MenuContext::Selection,
        ))
        .with_item(Separator::new("preset-separator-1"))
        .with_item(Menu::new(
            "preset-explain",
            "Explain",
            "Explain the following text in plain terms:\n\n{$TEXT}",
            MenuContext::Both,
        ))
}

fn custom_folder() -> Folder {
    Folder::new(CUSTOM_FOLDER_ID, "Custom").with_description("User-defined menus")
}

/// Returns the default tree.
#[must_use]
pub fn default_tree() -> MenuTree {
    MenuTree::from_nodes(vec![preset_folder().into(), custom_folder().into()])
}

/// Puts back any default nodes missing from `tree`.
///
/// The presets folder is looked up by id at any depth. Default preset items
/// whose ids are absent from the tree are appended to it wherever it sits,
/// and a missing presets folder is re-created at the front. A custom folder
/// is appended only when its id is unused. Existing nodes are never removed
/// or reordered, and no id is ever added twice.
///
/// Returns the number of restored preset items.
pub fn restore_defaults(tree: &mut MenuTree) -> usize {
    let ids = tree.ids();
    let mut defaults = preset_folder();
    defaults.items.retain(|item| !ids.contains(item.id()));
    let mut restored = defaults.items.len();

    if let Some(existing) = tree.find_folder_mut(PRESET_FOLDER_ID) {
        for item in defaults.items {
            tracing::debug!(id = %item.id(), "restoring preset item");
            existing.items.push(item);
        }
    } else if ids.iter().any(|id| id.as_str() == PRESET_FOLDER_ID) {
        tracing::warn!(id = PRESET_FOLDER_ID, "preset folder id is taken by a non-folder node");
        restored = 0;
    } else {
        tree.insert(0, defaults);
    }

    if !ids.iter().any(|id| id.as_str() == CUSTOM_FOLDER_ID) {
        tree.push(custom_folder());
    }

    tracing::info!(restored, "restored default menus");
    restored
}
