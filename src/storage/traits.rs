//! Menu store trait definition.

use crate::Result;
use crate::models::MenuTree;

/// Trait for menu tree storage backends.
///
/// A store holds exactly one tree. Callers load it, work on it, and save
/// the whole tree back.
pub trait MenuStore: Send + Sync {
    /// Loads the stored tree.
    ///
    /// # Returns
    ///
    /// The tree if one has been saved, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or holds an invalid tree.
    fn load(&self) -> Result<Option<MenuTree>>;

    /// Replaces the stored tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be written.
    fn save(&self, tree: &MenuTree) -> Result<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
