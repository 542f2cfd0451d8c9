//! In-memory menu store.

use std::sync::Mutex;

use super::MenuStore;
use crate::models::MenuTree;
use crate::{Error, Result};

/// Keeps the tree in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryMenuStore {
    tree: Mutex<Option<MenuTree>>,
}

impl MemoryMenuStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tree`.
    #[must_use]
    pub const fn with_tree(tree: MenuTree) -> Self {
        Self {
            tree: Mutex::new(Some(tree)),
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::OperationFailed {
        operation: "lock_memory_store".to_string(),
        cause: "lock poisoned".to_string(),
    }
}

impl MenuStore for MemoryMenuStore {
    fn load(&self) -> Result<Option<MenuTree>> {
        Ok(self.tree.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, tree: &MenuTree) -> Result<()> {
        *self.tree.lock().map_err(poisoned)? = Some(tree.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Separator;

    #[test]
    fn test_save_and_load() {
        let store = MemoryMenuStore::new();
        assert!(store.load().unwrap().is_none());

        let tree = MenuTree::from_nodes(vec![Separator::new("s").into()]);
        store.save(&tree).unwrap();
        assert_eq!(store.load().unwrap(), Some(tree));
    }
}
