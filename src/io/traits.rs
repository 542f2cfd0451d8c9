//! Collaborator seams for the interchange engine.
//!
//! [`TextSource`] is the single asynchronous boundary: it yields the full
//! decoded text of an input or fails once. [`IdGenerator`] supplies fresh
//! node ids so merges can be made deterministic in tests.

use std::future::Future;

use uuid::Uuid;

use crate::Result;
use crate::models::NodeId;

/// Something that can produce the complete text of an interchange document.
///
/// Implementations resolve once, with the whole text or with an error. They
/// never deliver partial content.
pub trait TextSource: Send + Sync {
    /// Reads the full text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be read or decoded.
    fn read_text(&self) -> impl Future<Output = Result<String>> + Send;

    /// Human-readable description for logs and messages.
    fn describe(&self) -> String;
}

/// Kind of node an id is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// An imported menu.
    Menu,
    /// A folder created by a merge.
    Folder,
}

impl IdKind {
    /// Returns the kind as a lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Folder => "folder",
        }
    }
}

/// Source of fresh node ids.
///
/// Generators need not guarantee uniqueness against a particular tree; the
/// merge engine checks every id it receives and asks again on collision.
pub trait IdGenerator: Send {
    /// Returns a new id for a node of the given kind.
    fn next_id(&mut self, kind: IdKind) -> NodeId;
}

/// Generates `imported-<kind>-<uuid>` ids from time-ordered UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self, kind: IdKind) -> NodeId {
        NodeId::new(format!("imported-{}-{}", kind.as_str(), Uuid::now_v7()))
    }
}

/// Generates `<prefix>-<n>` ids from a counter starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, _kind: IdKind) -> NodeId {
        let id = NodeId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIdGenerator::new("menu");
        assert_eq!(ids.next_id(IdKind::Menu).as_str(), "menu-1");
        assert_eq!(ids.next_id(IdKind::Folder).as_str(), "menu-2");
    }

    #[test]
    fn test_uuid_ids_are_prefixed_and_distinct() {
        let mut ids = UuidIdGenerator::new();
        let a = ids.next_id(IdKind::Menu);
        let b = ids.next_id(IdKind::Menu);
        assert!(a.as_str().starts_with("imported-menu-"));
        assert!(ids.next_id(IdKind::Folder).as_str().starts_with("imported-folder-"));
        assert_ne!(a, b);
    }
}
