//! Menu tree persistence.
//!
//! The surrounding application owns one tree. A [`MenuStore`] loads it before
//! an operation and saves it afterwards.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`FilesystemMenuStore`] | Pretty JSON file, written atomically |
//! | [`MemoryMenuStore`] | Tests and scratch work |

mod filesystem;
mod memory;
mod traits;

pub use filesystem::FilesystemMenuStore;
pub use memory::MemoryMenuStore;
pub use traits::MenuStore;

use crate::Result;
use crate::models::MenuTree;
use crate::services::presets::default_tree;

/// Loads the stored tree, seeding the store with the default tree when empty.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn load_or_seed(store: &dyn MenuStore) -> Result<MenuTree> {
    if let Some(tree) = store.load()? {
        return Ok(tree);
    }
    let tree = default_tree();
    store.save(&tree)?;
    tracing::info!(backend = store.backend_name(), "seeded store with default menus");
    Ok(tree)
}
