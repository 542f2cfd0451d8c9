//! Flattens a menu tree into interchange records.

use crate::models::{FlatRecord, MenuNode, MenuTree};

/// Separator between folder names in a record's folder path.
pub const PATH_SEPARATOR: &str = "/";

/// Extracts one record per menu, in depth-first pre-order.
///
/// Each record carries the slash-joined names of its ancestor folders, or an
/// empty path for top-level menus. Separators produce nothing and folders
/// only contribute path segments.
#[must_use]
pub fn extract(tree: &MenuTree) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut path = Vec::new();
    extract_items(tree.nodes(), &mut path, &mut records);
    records
}

fn extract_items<'a>(items: &'a [MenuNode], path: &mut Vec<&'a str>, out: &mut Vec<FlatRecord>) {
    for node in items {
        match node {
            MenuNode::Folder(folder) => {
                path.push(&folder.name);
                extract_items(&folder.items, path, out);
                path.pop();
            },
            MenuNode::Menu(menu) => out.push(FlatRecord::new(
                path.join(PATH_SEPARATOR),
                menu.title.clone(),
                menu.prompt.clone(),
                menu.context,
            )),
            MenuNode::Separator(_) => {},
        }
    }
}
