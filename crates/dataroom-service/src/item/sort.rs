//! Listing order: folders first, then the requested key within each kind.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use dataroom_core::types::{SortBy, SortConfig, SortDirection};
use dataroom_entity::{Item, ItemKind};

/// Sorts `items` by `config`. Folders always precede files; the direction
/// only applies within a kind. The sort is stable.
pub fn sort_items(mut items: Vec<Item>, config: SortConfig) -> Vec<Item> {
    items.sort_by(|a, b| compare_items(a, b, config));
    items
}

/// Comparator behind [`sort_items`].
pub fn compare_items(a: &Item, b: &Item, config: SortConfig) -> Ordering {
    match (a.kind(), b.kind()) {
        (ItemKind::Folder, ItemKind::File) => return Ordering::Less,
        (ItemKind::File, ItemKind::Folder) => return Ordering::Greater,
        _ => {}
    }

    let ordering = match config.sort_by {
        SortBy::Name => collation_key(&a.name).cmp(&collation_key(&b.name)),
        SortBy::Date => a.updated_at.cmp(&b.updated_at),
        SortBy::Size => a.size().cmp(&b.size()),
    };

    match config.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Name key that ignores case and accents, so `éclair` sorts with `e`.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataroom_core::types::ItemId;
    use dataroom_entity::{FileContent, ItemContent};

    fn folder(name: &str, updated_at: i64) -> Item {
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            parent_id: None,
            created_at: 0,
            updated_at,
            content: ItemContent::Folder,
        }
    }

    fn file(name: &str, size: i64, updated_at: i64) -> Item {
        Item {
            content: ItemContent::File(FileContent {
                size,
                mime_type: "application/pdf".to_string(),
                payload: String::new(),
            }),
            ..folder(name, updated_at)
        }
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_folders_precede_files_in_both_directions() {
        let items = vec![file("a.pdf", 10, 1), folder("Zeta", 1), folder("alpha", 1)];

        let asc = sort_items(items.clone(), SortConfig::asc(SortBy::Name));
        assert_eq!(names(&asc), ["alpha", "Zeta", "a.pdf"]);

        let desc = sort_items(items, SortConfig::desc(SortBy::Name));
        assert_eq!(names(&desc), ["Zeta", "alpha", "a.pdf"]);
    }

    #[test]
    fn test_size_treats_folders_as_zero() {
        let items = vec![file("big.pdf", 300, 1), file("small.pdf", 5, 1), folder("F", 1)];
        let sorted = sort_items(items, SortConfig::desc(SortBy::Size));
        assert_eq!(names(&sorted), ["F", "big.pdf", "small.pdf"]);
    }

    #[test]
    fn test_date_uses_updated_at() {
        let items = vec![file("new.pdf", 1, 300), file("old.pdf", 1, 100)];
        let sorted = sort_items(items, SortConfig::asc(SortBy::Date));
        assert_eq!(names(&sorted), ["old.pdf", "new.pdf"]);
    }

    #[test]
    fn test_name_ties_keep_input_order() {
        let first = folder("Docs", 1);
        let second = folder("docs", 2);
        let sorted = sort_items(
            vec![first.clone(), second.clone()],
            SortConfig::asc(SortBy::Name),
        );
        assert_eq!(sorted[0].id, first.id);
        assert_eq!(sorted[1].id, second.id);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let items = vec![folder("Zebra", 1), folder("éclair", 1), folder("apple", 1)];
        let sorted = sort_items(items, SortConfig::asc(SortBy::Name));
        assert_eq!(names(&sorted), ["apple", "éclair", "Zebra"]);
    }

    #[test]
    fn test_accent_only_difference_is_a_tie() {
        let first = file("resume.pdf", 1, 1);
        let second = file("Résumé.pdf", 1, 1);
        let sorted = sort_items(
            vec![second.clone(), first.clone()],
            SortConfig::asc(SortBy::Name),
        );
        assert_eq!(sorted[0].id, second.id);
        assert_eq!(sorted[1].id, first.id);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_items(Vec::new(), SortConfig::default()).is_empty());
    }
}
