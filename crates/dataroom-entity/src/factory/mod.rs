//! Validated construction of items from untrusted input.
//!
//! Factories are pure functions over an explicit [`ValidationConfig`]; they
//! never touch storage. Sanitization strips reserved and control
//! characters, trims, then truncates to the configured length.

pub mod error;

use dataroom_core::config::ValidationConfig;
use dataroom_core::types::ItemId;

use crate::item::{FileContent, Item, ItemContent, ItemKind, NewFile, NewFolder, now_millis};

pub use error::ValidationError;

/// Characters that may never appear in an item name.
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

fn is_forbidden(c: char) -> bool {
    RESERVED_CHARS.contains(&c) || ('\u{00}'..='\u{1F}').contains(&c)
}

/// Strip forbidden characters, trim surrounding whitespace, and truncate to
/// `max_len` characters.
pub fn sanitize_name(name: &str, max_len: usize) -> String {
    let stripped: String = name.chars().filter(|c| !is_forbidden(*c)).collect();
    stripped.trim().chars().take(max_len).collect()
}

/// Sanitize `name` and reject it if nothing is left.
pub fn validate_name(
    limits: &ValidationConfig,
    kind: ItemKind,
    name: &str,
) -> Result<String, ValidationError> {
    let sanitized = sanitize_name(name, limits.max_name_length);
    if sanitized.is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    Ok(sanitized)
}

/// Check a declared MIME type against the allow list.
pub fn validate_mime_type(limits: &ValidationConfig, mime_type: &str) -> Result<(), ValidationError> {
    if !limits.is_mime_type_allowed(mime_type) {
        return Err(ValidationError::InvalidMimeType {
            received: mime_type.to_string(),
        });
    }
    Ok(())
}

/// Check a declared size: `1..=max_file_size_bytes`.
pub fn validate_size(limits: &ValidationConfig, size: i64) -> Result<(), ValidationError> {
    if size <= 0 || size > limits.max_file_size_bytes {
        return Err(ValidationError::InvalidSize {
            size,
            max: limits.max_file_size_bytes,
        });
    }
    Ok(())
}

/// Build a new folder.
pub fn build_folder(limits: &ValidationConfig, req: NewFolder) -> Result<Item, ValidationError> {
    let name = validate_name(limits, ItemKind::Folder, &req.name)?;
    let now = now_millis();

    Ok(Item {
        id: ItemId::new(),
        name,
        parent_id: req.parent_id,
        created_at: now,
        updated_at: now,
        content: ItemContent::Folder,
    })
}

/// Build a new file.
pub fn build_file(limits: &ValidationConfig, req: NewFile) -> Result<Item, ValidationError> {
    let name = validate_name(limits, ItemKind::File, &req.name)?;
    validate_mime_type(limits, &req.mime_type)?;
    validate_size(limits, req.size)?;
    let now = now_millis();

    Ok(Item {
        id: ItemId::new(),
        name,
        parent_id: req.parent_id,
        created_at: now,
        updated_at: now,
        content: ItemContent::File(FileContent {
            size: req.size,
            mime_type: req.mime_type,
            payload: req.payload,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &str = "application/pdf";

    fn limits() -> ValidationConfig {
        ValidationConfig::default()
    }

    fn new_file(name: &str, size: i64, mime_type: &str) -> NewFile {
        NewFile {
            name: name.to_string(),
            parent_id: None,
            size,
            mime_type: mime_type.to_string(),
            payload: "base64-data".to_string(),
        }
    }

    #[test]
    fn test_sanitize_strips_reserved_and_control_chars() {
        assert_eq!(sanitize_name("my<file>name.pdf", 255), "myfilename.pdf");
        assert_eq!(sanitize_name("a:b\"c/d\\e|f?g*h", 255), "abcdefgh");
        assert_eq!(sanitize_name("tab\there\u{0}\u{1F}", 255), "tabhere");
        assert_eq!(sanitize_name("   padded   ", 255), "padded");
    }

    #[test]
    fn test_sanitize_truncates_by_characters() {
        let long = "é".repeat(300);
        let out = sanitize_name(&long, 255);
        assert_eq!(out.chars().count(), 255);
    }

    #[test]
    fn test_build_folder() {
        let parent = ItemId::new();
        let folder = build_folder(&limits(), NewFolder::new("  Board <Minutes> ", Some(parent)))
            .unwrap();
        assert_eq!(folder.name, "Board Minutes");
        assert_eq!(folder.parent_id, Some(parent));
        assert_eq!(folder.kind(), ItemKind::Folder);
        assert_eq!(folder.created_at, folder.updated_at);
    }

    #[test]
    fn test_build_folder_rejects_reserved_only_name() {
        let err = build_folder(&limits(), NewFolder::new("<>:*?", None)).unwrap_err();
        assert_eq!(err, ValidationError::EmptyName { kind: ItemKind::Folder });
        assert_eq!(err.to_string(), "Folder name cannot be empty");
    }

    #[test]
    fn test_build_file() {
        let file = build_file(&limits(), new_file("document.pdf", 1024, PDF)).unwrap();
        assert_eq!(file.name, "document.pdf");
        let content = file.file().unwrap();
        assert_eq!(content.size, 1024);
        assert_eq!(content.mime_type, PDF);
        assert_eq!(content.payload, "base64-data");
    }

    #[test]
    fn test_build_file_rejects_other_mime_types() {
        let err = build_file(&limits(), new_file("notes.txt", 10, "text/plain")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidMimeType { .. }));
        assert_eq!(err.to_string(), "File type is not allowed. Received: text/plain");
    }

    #[test]
    fn test_build_file_size_boundaries() {
        let max = limits().max_file_size_bytes;
        assert_eq!(max, 52_428_800);

        assert!(build_file(&limits(), new_file("ok.pdf", max, PDF)).is_ok());
        assert!(matches!(
            build_file(&limits(), new_file("big.pdf", max + 1, PDF)),
            Err(ValidationError::InvalidSize { .. })
        ));
        assert!(matches!(
            build_file(&limits(), new_file("empty.pdf", 0, PDF)),
            Err(ValidationError::InvalidSize { .. })
        ));
        assert!(matches!(
            build_file(&limits(), new_file("neg.pdf", -5, PDF)),
            Err(ValidationError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_limits_are_overridable() {
        let custom = ValidationConfig {
            max_name_length: 4,
            max_file_size_bytes: 10,
            allowed_mime_types: vec!["text/plain".to_string()],
        };
        let file = build_file(&custom, new_file("abcdefgh", 10, "text/plain")).unwrap();
        assert_eq!(file.name, "abcd");
        assert!(build_file(&custom, new_file("x", 11, "text/plain")).is_err());
        assert!(build_file(&custom, new_file("x", 1, PDF)).is_err());
    }
}
