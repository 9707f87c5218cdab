//! Context identifying whose data a service operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user a tree service is bound to.
///
/// The identifier comes from the authentication collaborator and is
/// treated as opaque: it only selects which store is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// Opaque user identifier.
    pub user_id: String,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
}

impl UserContext {
    /// Creates a new user context.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            opened_at: Utc::now(),
        }
    }
}
