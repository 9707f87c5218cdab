//! # dataroom-database
//!
//! SQLite storage engine for DataRoom. Each user gets an isolated database
//! file; [`ItemRepository`](repositories::ItemRepository) persists items in
//! it with committed, read-after-write consistent transactions.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{ItemRepository, ItemStore};
