//! Limits enforced when building items from untrusted input.

use serde::{Deserialize, Serialize};

/// Factory limits. Passed explicitly to the item factories so tests can
/// override them without touching global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum item name length, in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Maximum file size in bytes (inclusive).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: i64,
    /// MIME types accepted for uploads.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_file_size_bytes: default_max_file_size(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl ValidationConfig {
    /// Whether `mime_type` is on the allow list.
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}

fn default_max_name_length() -> usize {
    255
}

fn default_max_file_size() -> i64 {
    52_428_800 // 50 MiB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}
