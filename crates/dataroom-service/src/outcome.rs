//! Uniform tagged result handed to presentation layers.

use serde::Serialize;

use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::result::AppResult;

/// Outcome of one tree operation: either success carrying a value, or a
/// failure kind with a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome<T> {
    /// Whether the operation committed.
    pub success: bool,
    /// Failure kind, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Human-readable message.
    pub message: String,
    /// Resulting value, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

impl<T> OperationOutcome<T> {
    /// A successful outcome.
    pub fn succeeded(item: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            kind: None,
            message: message.into(),
            item: Some(item),
        }
    }

    /// A failed outcome describing `error`.
    pub fn failed(error: &AppError) -> Self {
        Self {
            success: false,
            kind: Some(error.kind),
            message: error.message.clone(),
            item: None,
        }
    }

    /// Builds an outcome from a result, using `message` on success.
    pub fn from_result(result: AppResult<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(item) => Self::succeeded(item, message),
            Err(e) => Self::failed(&e),
        }
    }
}

impl<T> From<AppResult<T>> for OperationOutcome<T> {
    fn from(result: AppResult<T>) -> Self {
        Self::from_result(result, "OK")
    }
}
