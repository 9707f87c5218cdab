//! Item entity model.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use dataroom_core::types::ItemId;

/// Discriminant of an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A container for other items.
    Folder,
    /// A leaf carrying an encoded payload.
    File,
}

impl ItemKind {
    /// Return the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
        }
    }

    /// Parse the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "folder" => Some(Self::Folder),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Capitalized label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::File => "File",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-only fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Encoded content (e.g. a base64 data URL).
    pub payload: String,
}

/// Kind-specific part of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemContent {
    /// Folders carry no extra data.
    Folder,
    /// Files carry size, type, and payload.
    File(FileContent),
}

/// A folder or file in a user's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Sanitized name, unique among siblings ignoring case.
    pub name: String,
    /// Parent folder ID (null for root-level items).
    pub parent_id: Option<ItemId>,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last rename/move time, milliseconds since the Unix epoch.
    pub updated_at: i64,
    /// Kind-specific data.
    #[serde(flatten)]
    pub content: ItemContent,
}

impl Item {
    /// The item's kind.
    pub fn kind(&self) -> ItemKind {
        match self.content {
            ItemContent::Folder => ItemKind::Folder,
            ItemContent::File(_) => ItemKind::File,
        }
    }

    /// Check if this item is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self.content, ItemContent::Folder)
    }

    /// File fields, if this item is a file.
    pub fn file(&self) -> Option<&FileContent> {
        match &self.content {
            ItemContent::Folder => None,
            ItemContent::File(file) => Some(file),
        }
    }

    /// Size in bytes; folders count as zero.
    pub fn size(&self) -> i64 {
        self.file().map_or(0, |f| f.size)
    }

    /// Check if this item sits at the root (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Case-insensitive name comparison used for sibling uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str) -> Item {
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            parent_id: None,
            created_at: 1_000,
            updated_at: 1_000,
            content: ItemContent::Folder,
        }
    }

    #[test]
    fn test_kind_and_size() {
        let f = folder("Reports");
        assert_eq!(f.kind(), ItemKind::Folder);
        assert_eq!(f.size(), 0);
        assert!(f.file().is_none());

        let file = Item {
            content: ItemContent::File(FileContent {
                size: 42,
                mime_type: "application/pdf".to_string(),
                payload: "data".to_string(),
            }),
            ..folder("a.pdf")
        };
        assert_eq!(file.kind(), ItemKind::File);
        assert_eq!(file.size(), 42);
    }

    #[test]
    fn test_has_name_ignores_case() {
        let f = folder("Quarterly Report");
        assert!(f.has_name("quarterly report"));
        assert!(f.has_name("QUARTERLY REPORT"));
        assert!(!f.has_name("Quarterly Reports"));
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut f = folder("x");
        f.touch(500);
        assert_eq!(f.updated_at, 1_000);
        f.touch(2_000);
        assert_eq!(f.updated_at, 2_000);
    }

    #[test]
    fn test_serde_shape() {
        let f = folder("Docs");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["kind"], "folder");
        assert_eq!(json["name"], "Docs");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ItemKind::parse("folder"), Some(ItemKind::Folder));
        assert_eq!(ItemKind::parse("file"), Some(ItemKind::File));
        assert_eq!(ItemKind::parse("link"), None);
    }
}
