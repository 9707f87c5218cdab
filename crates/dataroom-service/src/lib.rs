//! # dataroom-service
//!
//! Business logic for DataRoom. [`TreeService`] is the only mutator of a
//! user's hierarchy: it validates every create, rename, move, and delete
//! against persisted state before writing through the item store.
//!
//! Services follow constructor injection: the store, user context, and
//! validation limits are provided at construction time.

pub mod context;
pub mod item;
pub mod outcome;

pub use context::UserContext;
pub use item::{ItemFilter, SearchQuery, TreeService, search_items, sort_items};
pub use outcome::OperationOutcome;
