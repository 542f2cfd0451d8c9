//! Tree-level services.
//!
//! - [`presets`]: the built-in default tree and restoring it

pub mod presets;

pub use presets::{CUSTOM_FOLDER_ID, PRESET_FOLDER_ID, default_tree, restore_defaults};
