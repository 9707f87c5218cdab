//! CLI command definitions and dispatch.

pub mod config;
pub mod item;
pub mod search;
pub mod upload;

use clap::{Parser, Subcommand};
use tracing::debug;

use dataroom_core::config::AppConfig;
use dataroom_core::error::AppError;
use dataroom_core::types::ItemId;
use dataroom_service::{TreeService, UserContext};

use crate::output::OutputFormat;

/// DataRoom: a per-user folder and document store
#[derive(Debug, Parser)]
#[command(name = "dataroom", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/local.toml")]
    pub config: String,

    /// User whose data room is opened
    #[arg(short, long, env = "DATAROOM_USER")]
    pub user: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a folder
    Mkdir(item::MkdirArgs),
    /// Upload a local file
    Upload(upload::UploadArgs),
    /// List the contents of a folder
    Ls(item::LsArgs),
    /// Show the whole hierarchy
    Tree(item::TreeArgs),
    /// Rename a folder or file
    Rename(item::RenameArgs),
    /// Move a folder or file
    Mv(item::MoveArgs),
    /// Delete a folder (with its contents) or a file
    Rm(item::RemoveArgs),
    /// Show the breadcrumb path of a folder
    Path(item::PathArgs),
    /// Search every folder by name
    Search(search::SearchArgs),
    /// Show one item in detail
    Show(item::ShowArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, config, &self.config, self.format);
        }

        let service = open_service(config, self.user.as_deref()).await?;
        match &self.command {
            Commands::Mkdir(args) => item::mkdir(&service, args, self.format).await,
            Commands::Upload(args) => {
                upload::execute(
                    &service,
                    args,
                    config.validation.max_file_size_bytes,
                    self.format,
                )
                .await
            }
            Commands::Ls(args) => item::ls(&service, args, self.format).await,
            Commands::Tree(args) => item::tree(&service, args, self.format).await,
            Commands::Rename(args) => item::rename(&service, args, self.format).await,
            Commands::Mv(args) => item::mv(&service, args, self.format).await,
            Commands::Rm(args) => item::rm(&service, args, self.format).await,
            Commands::Path(args) => item::path(&service, args, self.format).await,
            Commands::Search(args) => search::execute(&service, args, self.format).await,
            Commands::Show(args) => item::show(&service, args, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Helper: open the tree service of `user`
pub async fn open_service(config: &AppConfig, user: Option<&str>) -> Result<TreeService, AppError> {
    let user = user
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::invalid_input("No user given; pass --user or set DATAROOM_USER"))?;
    debug!(user, data_root = %config.storage.data_root, "Opening data room");
    TreeService::open(config, UserContext::new(user)).await
}

/// Helper: parse an item ID argument
pub fn parse_id(raw: &str) -> Result<ItemId, AppError> {
    raw.parse::<ItemId>()
        .map_err(|_| AppError::invalid_input(format!("Invalid item ID: '{raw}'")))
}

/// Helper: parse an optional parent argument; absent or `root` means the root
pub fn parse_parent(raw: Option<&str>) -> Result<Option<ItemId>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("root") | Some("/") => Ok(None),
        Some(id) => parse_id(id).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parent_accepts_root_aliases() {
        assert_eq!(parse_parent(None).unwrap(), None);
        assert_eq!(parse_parent(Some("root")).unwrap(), None);
        assert_eq!(parse_parent(Some("/")).unwrap(), None);

        let id = ItemId::new();
        assert_eq!(parse_parent(Some(&id.to_string())).unwrap(), Some(id));
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        let err = parse_id("not-an-id").unwrap_err();
        assert!(err.message.contains("not-an-id"));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["dataroom", "--user", "alice", "-f", "json", "ls"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Ls(_)));
    }
}
