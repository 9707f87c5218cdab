//! Breadcrumb trail entries.

use serde::{Deserialize, Serialize};

use dataroom_core::types::ItemId;

/// One step of a breadcrumb trail. The synthetic root entry has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID, `None` for the root.
    pub id: Option<ItemId>,
    /// Display name.
    pub name: String,
}

impl Breadcrumb {
    /// The synthetic root entry.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            id: None,
            name: label.into(),
        }
    }

    /// An entry for an existing folder.
    pub fn folder(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}
