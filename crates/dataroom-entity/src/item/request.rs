//! Untrusted creation requests handed to the factories.

use serde::{Deserialize, Serialize};

use dataroom_core::types::ItemId;

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Requested folder name (sanitized by the factory).
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<ItemId>,
}

impl NewFolder {
    /// Create a folder request.
    pub fn new(name: impl Into<String>, parent_id: Option<ItemId>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}

/// Data required to store a new file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// Requested file name (sanitized by the factory).
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<ItemId>,
    /// Declared size in bytes.
    pub size: i64,
    /// Declared MIME type.
    pub mime_type: String,
    /// Encoded content, stored verbatim.
    pub payload: String,
}
