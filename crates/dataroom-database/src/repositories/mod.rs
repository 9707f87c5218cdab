//! Repository implementations for DataRoom entities.

pub mod item;

pub use item::{ItemRepository, ItemStore};
