//! Local store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the per-user SQLite databases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one database file per user.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// How long SQLite waits on a locked database before failing.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            busy_timeout_seconds: default_busy_timeout(),
        }
    }
}

fn default_data_root() -> String {
    "./data/rooms".to_string()
}

fn default_busy_timeout() -> u64 {
    5
}
