//! # dataroom-core
//!
//! Core crate for DataRoom. Contains the repository trait, configuration
//! schemas, typed identifiers, sorting types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DataRoom crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
