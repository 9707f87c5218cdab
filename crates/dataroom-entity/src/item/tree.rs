//! Nested view of a user's hierarchy.

use serde::{Deserialize, Serialize};

use dataroom_core::types::ItemId;

use super::model::ItemKind;

/// One node in the item tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    /// Item ID.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Folder or file.
    pub kind: ItemKind,
    /// Size in bytes; zero for folders.
    pub size: i64,
    /// Children, empty for files.
    pub children: Vec<ItemNode>,
}

impl ItemNode {
    /// Number of nodes in this subtree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ItemNode::count).sum::<usize>()
    }
}

/// The full hierarchy of one user, starting at the root level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTree {
    /// Root-level items.
    pub roots: Vec<ItemNode>,
}

impl ItemTree {
    /// Total number of nodes.
    pub fn count(&self) -> usize {
        self.roots.iter().map(ItemNode::count).sum()
    }

    /// Whether the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
