//! # dataroom-entity
//!
//! Domain entity models for DataRoom. An [`Item`](item::Item) is either a
//! folder or a file; the factories in [`factory`] are the only way to
//! build one from untrusted input.

pub mod factory;
pub mod item;

pub use factory::ValidationError;
pub use item::{
    Breadcrumb, FileContent, Item, ItemContent, ItemKind, ItemNode, ItemTree, NewFile, NewFolder,
};
