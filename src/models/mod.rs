//! Data models for promptmenu.
//!
//! This module contains the menu tree and the flat interchange records.

mod context;
mod menu;
mod record;

pub use context::MenuContext;
pub use menu::{Folder, Menu, MenuNode, MenuTree, NodeId, Separator};
pub use record::{FlatRecord, RawRecord};
