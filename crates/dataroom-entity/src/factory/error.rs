//! Factory validation errors.

use thiserror::Error;

use dataroom_core::error::{AppError, ErrorKind};

use crate::item::ItemKind;

/// Reasons a creation request is rejected before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The name is empty after sanitization.
    #[error("{} name cannot be empty", .kind.label())]
    EmptyName {
        /// Kind of item being named.
        kind: ItemKind,
    },

    /// The MIME type is not on the allow list.
    #[error("File type is not allowed. Received: {received}")]
    InvalidMimeType {
        /// The rejected MIME type.
        received: String,
    },

    /// The size is not positive or exceeds the limit.
    #[error("File size must be between 1 and {max} bytes. Received: {size}")]
    InvalidSize {
        /// Declared size.
        size: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::with_source(ErrorKind::InvalidInput, err.to_string(), err)
    }
}
