//! Core traits defined in `dataroom-core` and implemented by other crates.

pub mod repository;

pub use repository::Repository;
