//! Sorting types for item listings.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Key items are compared by within the same kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Case-insensitive name.
    #[default]
    Name,
    /// Last modification time.
    Date,
    /// File size; folders count as zero.
    Size,
}

/// A sort specification consisting of a key and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Key to sort by.
    #[serde(default)]
    pub sort_by: SortBy,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    /// Create a new sort specification.
    pub fn new(sort_by: SortBy, direction: SortDirection) -> Self {
        Self { sort_by, direction }
    }

    /// Ascending sort on the given key.
    pub fn asc(sort_by: SortBy) -> Self {
        Self::new(sort_by, SortDirection::Asc)
    }

    /// Descending sort on the given key.
    pub fn desc(sort_by: SortBy) -> Self {
        Self::new(sort_by, SortDirection::Desc)
    }
}
