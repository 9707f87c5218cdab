//! Core type definitions used across the DataRoom workspace.

pub mod id;
pub mod sorting;

pub use id::ItemId;
pub use sorting::{SortBy, SortConfig, SortDirection};
