//! Item tree operations and query helpers.

pub mod search;
pub mod service;
pub mod sort;

pub use search::{ItemFilter, SearchQuery, search_items};
pub use service::TreeService;
pub use sort::sort_items;
