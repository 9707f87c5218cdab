//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default, so a missing file still yields
//! a usable configuration.

pub mod logging;
pub mod storage;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;
pub use self::validation::ValidationConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + overlay) and environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Local store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Limits enforced by the item factories.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Presentation settings shared with UI collaborators.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Label of the synthetic root entry in breadcrumb trails.
    #[serde(default = "default_root_label")]
    pub root_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            root_label: default_root_label(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, the file at `path`, and environment
    /// variables prefixed with `DATAROOM__`. All file sources are optional.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("DATAROOM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_root_label() -> String {
    "DataRoom".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.validation.max_name_length, 255);
        assert_eq!(config.validation.max_file_size_bytes, 52_428_800);
        assert_eq!(
            config.validation.allowed_mime_types,
            vec!["application/pdf".to_string()]
        );
        assert_eq!(config.display.root_label, "DataRoom");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_root = \"/tmp/rooms\"\n\n[validation]\nmax_file_size_bytes = 1024\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.data_root, "/tmp/rooms");
        assert_eq!(config.validation.max_file_size_bytes, 1024);
        assert_eq!(config.validation.max_name_length, 255);
    }
}
