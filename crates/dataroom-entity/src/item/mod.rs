//! Item domain entities.

pub mod breadcrumb;
pub mod model;
pub mod request;
pub mod tree;

pub use breadcrumb::Breadcrumb;
pub use model::{FileContent, Item, ItemContent, ItemKind, now_millis};
pub use request::{NewFile, NewFolder};
pub use tree::{ItemNode, ItemTree};
