//! Name search and kind filtering over item listings.

use serde::{Deserialize, Serialize};

use dataroom_entity::Item;

/// Which kinds of item a listing keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    /// Folders and files.
    #[default]
    All,
    /// Folders only.
    Folders,
    /// Files only.
    Files,
}

impl ItemFilter {
    /// Whether `item` passes this filter.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Folders => item.is_folder(),
            Self::Files => !item.is_folder(),
        }
    }
}

/// A name query combined with a kind filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text matched against names; blank matches everything.
    #[serde(default)]
    pub text: String,
    /// Kind filter.
    #[serde(default)]
    pub filter: ItemFilter,
}

impl SearchQuery {
    /// Creates a query.
    pub fn new(text: impl Into<String>, filter: ItemFilter) -> Self {
        Self {
            text: text.into(),
            filter,
        }
    }
}

/// Lowercases and collapses runs of whitespace into single spaces.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keeps the items passing the filter whose name contains the query text.
pub fn search_items(items: Vec<Item>, query: &SearchQuery) -> Vec<Item> {
    let needle = normalize(&query.text);
    items
        .into_iter()
        .filter(|item| query.filter.matches(item))
        .filter(|item| needle.is_empty() || normalize(&item.name).contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataroom_core::types::ItemId;
    use dataroom_entity::{FileContent, ItemContent};

    fn item(name: &str, is_folder: bool) -> Item {
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            parent_id: None,
            created_at: 0,
            updated_at: 0,
            content: if is_folder {
                ItemContent::Folder
            } else {
                ItemContent::File(FileContent {
                    size: 1,
                    mime_type: "application/pdf".to_string(),
                    payload: String::new(),
                })
            },
        }
    }

    fn fixture() -> Vec<Item> {
        vec![
            item("Annual  Report", true),
            item("annual report 2024.pdf", false),
            item("Invoices", true),
        ]
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let found = search_items(fixture(), &SearchQuery::new("   ", ItemFilter::All));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_query_is_case_and_whitespace_insensitive() {
        let found = search_items(fixture(), &SearchQuery::new("  ANNUAL   report ", ItemFilter::All));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_filter_restricts_kind() {
        let folders = search_items(fixture(), &SearchQuery::new("", ItemFilter::Folders));
        assert!(folders.iter().all(Item::is_folder));
        assert_eq!(folders.len(), 2);

        let files = search_items(fixture(), &SearchQuery::new("annual", ItemFilter::Files));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "annual report 2024.pdf");
    }

    #[test]
    fn test_no_match() {
        assert!(search_items(fixture(), &SearchQuery::new("tax", ItemFilter::All)).is_empty());
    }
}
