//! Menu tree types and identifiers.
//!
//! The tree is an ordered forest of [`MenuNode`] values. Children are owned by
//! their folder, so a folder can never contain itself.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::MenuContext;
use crate::{Error, Result};

/// Opaque node identifier, unique within a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new node ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named container of child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier.
    pub id: NodeId,
    /// Display name, used for folder paths and merge targeting.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether the editor shows this folder open.
    #[serde(default)]
    pub expanded: bool,
    /// Ordered children.
    #[serde(default)]
    pub items: Vec<MenuNode>,
}

impl Folder {
    /// Creates an empty, expanded folder.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            expanded: true,
            items: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<MenuNode>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Iterates over the menus directly inside this folder.
    pub fn menus(&self) -> impl Iterator<Item = &Menu> {
        self.items.iter().filter_map(MenuNode::as_menu)
    }
}

/// A prompt menu leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Unique identifier.
    pub id: NodeId,
    /// Title shown in the menu.
    pub title: String,
    /// Prompt template sent when the menu is chosen.
    pub prompt: String,
    /// Applicability context.
    #[serde(default)]
    pub context: MenuContext,
}

impl Menu {
    /// Creates a menu.
    #[must_use]
    pub fn new(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        prompt: impl Into<String>,
        context: MenuContext,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            prompt: prompt.into(),
            context,
        }
    }
}

/// A visual divider with no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Separator {
    /// Unique identifier.
    pub id: NodeId,
}

impl Separator {
    /// Creates a separator.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }
}

/// A node of the menu tree.
///
/// Serialized with a `type` tag of `folder`, `menu` or `separator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MenuNode {
    /// A folder of nodes.
    Folder(Folder),
    /// A prompt menu.
    Menu(Menu),
    /// A separator.
    Separator(Separator),
}

impl MenuNode {
    /// Returns the node id.
    #[must_use]
    pub const fn id(&self) -> &NodeId {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Menu(menu) => &menu.id,
            Self::Separator(separator) => &separator.id,
        }
    }

    /// Returns the node kind as a lowercase label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Folder(_) => "folder",
            Self::Menu(_) => "menu",
            Self::Separator(_) => "separator",
        }
    }

    /// Returns the folder if this node is one.
    #[must_use]
    pub const fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    /// Returns the menu if this node is one.
    #[must_use]
    pub const fn as_menu(&self) -> Option<&Menu> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }
}

impl From<Folder> for MenuNode {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Menu> for MenuNode {
    fn from(menu: Menu) -> Self {
        Self::Menu(menu)
    }
}

impl From<Separator> for MenuNode {
    fn from(separator: Separator) -> Self {
        Self::Separator(separator)
    }
}

/// The whole menu forest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates a tree from top-level nodes.
    #[must_use]
    pub const fn from_nodes(nodes: Vec<MenuNode>) -> Self {
        Self { nodes }
    }

    /// Returns the top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    /// Returns the number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a top-level node.
    pub fn push(&mut self, node: impl Into<MenuNode>) {
        self.nodes.push(node.into());
    }

    /// Inserts a top-level node at `index`, shifting later nodes.
    pub fn insert(&mut self, index: usize, node: impl Into<MenuNode>) {
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node.into());
    }

    /// Visits every node in depth-first pre-order with its depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MenuNode, usize)) {
        fn walk_items<'a>(
            items: &'a [MenuNode],
            depth: usize,
            visit: &mut impl FnMut(&'a MenuNode, usize),
        ) {
            for node in items {
                visit(node, depth);
                if let MenuNode::Folder(folder) = node {
                    walk_items(&folder.items, depth + 1, visit);
                }
            }
        }
        walk_items(&self.nodes, 0, visit);
    }

    /// Returns the node with the given id anywhere in the tree.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MenuNode> {
        let mut found = None;
        self.walk(&mut |node, _| {
            if found.is_none() && node.id().as_str() == id {
                found = Some(node);
            }
        });
        found
    }

    /// Returns whether any node carries the given id.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Collects every node id in the tree.
    #[must_use]
    pub fn ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        self.walk(&mut |node, _| {
            ids.insert(node.id().clone());
        });
        ids
    }

    /// Counts menu leaves at any depth.
    #[must_use]
    pub fn menu_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node, _| {
            if matches!(node, MenuNode::Menu(_)) {
                count += 1;
            }
        });
        count
    }

    /// Returns the position of the first top-level folder with this exact name.
    #[must_use]
    pub fn top_level_folder_position(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.as_folder().is_some_and(|folder| folder.name == name))
    }

    /// Returns the folder with the given id at any depth, mutably.
    pub fn find_folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        fn find_in<'a>(items: &'a mut [MenuNode], id: &str) -> Option<&'a mut Folder> {
            for node in items {
                if let MenuNode::Folder(folder) = node {
                    if folder.id.as_str() == id {
                        return Some(folder);
                    }
                    if let Some(found) = find_in(&mut folder.items, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        find_in(&mut self.nodes, id)
    }

    /// Returns a mutable top-level folder at `index`, if that node is a folder.
    pub fn folder_at_mut(&mut self, index: usize) -> Option<&mut Folder> {
        match self.nodes.get_mut(index) {
            Some(MenuNode::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    /// Checks that every node id is unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateNodeId`] naming the first repeated id.
    pub fn validate_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut duplicate = None;
        self.walk(&mut |node, _| {
            if duplicate.is_none() && !seen.insert(node.id().as_str()) {
                duplicate = Some(node.id().to_string());
            }
        });
        match duplicate {
            Some(id) => Err(Error::DuplicateNodeId(id)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> MenuTree {
        MenuTree::from_nodes(vec![
            Folder::new("preset-folder", "Presets")
                .with_item(Menu::new("m1", "Summary", "Summarize", MenuContext::Both))
                .with_item(Separator::new("s1"))
                .with_item(
                    Folder::new("nested", "Nested").with_item(Menu::new(
                        "m2",
                        "Translate",
                        "Translate",
                        MenuContext::Selection,
                    )),
                )
                .into(),
            Menu::new("m3", "Root", "Root prompt", MenuContext::Page).into(),
        ])
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = sample_tree();
        let mut visited = Vec::new();
        tree.walk(&mut |node, depth| visited.push((node.id().to_string(), depth)));
        assert_eq!(
            visited,
            vec![
                ("preset-folder".to_string(), 0),
                ("m1".to_string(), 1),
                ("s1".to_string(), 1),
                ("nested".to_string(), 1),
                ("m2".to_string(), 2),
                ("m3".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_find_and_counts() {
        let tree = sample_tree();
        assert!(tree.contains_id("m2"));
        assert!(!tree.contains_id("missing"));
        assert_eq!(tree.menu_count(), 3);
        assert_eq!(tree.ids().len(), 6);
        assert_eq!(tree.find("nested").map(MenuNode::kind), Some("folder"));
    }

    #[test]
    fn test_top_level_folder_lookup_is_exact() {
        let tree = sample_tree();
        assert_eq!(tree.top_level_folder_position("Presets"), Some(0));
        assert_eq!(tree.top_level_folder_position("presets"), None);
        // Nested folders are not merge targets.
        assert_eq!(tree.top_level_folder_position("Nested"), None);
    }

    #[test]
    fn test_validate_ids_detects_duplicates() {
        let mut tree = sample_tree();
        assert!(tree.validate_ids().is_ok());

        tree.push(Separator::new("m2"));
        let err = tree.validate_ids().unwrap_err();
        assert!(matches!(err, Error::DuplicateNodeId(id) if id == "m2"));
    }

    #[test]
    fn test_serde_uses_type_tag() {
        let tree = MenuTree::from_nodes(vec![
            Folder::new("f", "Folder")
                .with_item(Separator::new("s"))
                .into(),
        ]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["type"], "folder");
        assert_eq!(json[0]["items"][0]["type"], "separator");

        let parsed: MenuTree = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"[
            {"id": "f", "type": "folder", "name": "Custom"},
            {"id": "m", "type": "menu", "title": "T", "prompt": "P"}
        ]"#;
        let tree: MenuTree = serde_json::from_str(json).unwrap();
        let folder = tree.nodes()[0].as_folder().unwrap();
        assert!(folder.items.is_empty());
        assert!(folder.description.is_empty());
        assert_eq!(tree.nodes()[1].as_menu().unwrap().context, MenuContext::Both);
    }

    #[test]
    fn test_find_folder_mut_reaches_nested() {
        let mut tree = sample_tree();
        tree.find_folder_mut("nested")
            .unwrap()
            .items
            .push(Separator::new("s2").into());
        assert_eq!(tree.find("s2").map(MenuNode::kind), Some("separator"));
        assert!(tree.find_folder_mut("m1").is_none());
        assert!(tree.find_folder_mut("missing").is_none());
    }
}
