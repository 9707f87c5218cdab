//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use dataroom_core::config::AppConfig;
use dataroom_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => {
                println!("Configuration (overlay: {config_path})");
                output::print_kv("Data root", &config.storage.data_root);
                output::print_kv(
                    "Busy timeout",
                    &format!("{}s", config.storage.busy_timeout_seconds),
                );
                output::print_kv(
                    "Max name",
                    &format!("{} chars", config.validation.max_name_length),
                );
                output::print_kv(
                    "Max file size",
                    &output::format_file_size(config.validation.max_file_size_bytes),
                );
                output::print_kv(
                    "Allowed types",
                    &config.validation.allowed_mime_types.join(", "),
                );
                output::print_kv("Root label", &config.display.root_label);
                output::print_kv(
                    "Logging",
                    &format!("{} ({})", config.logging.level, config.logging.format),
                );
            }
        },
    }

    Ok(())
}
