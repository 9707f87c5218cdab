//! Global search CLI command.

use clap::Args;

use dataroom_core::error::AppError;
use dataroom_service::{SearchQuery, TreeService};

use super::item::{KindArg, SortArgs};
use crate::output::{self, OutputFormat};

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for in item names
    pub text: String,
    /// Only show this kind of item
    #[arg(short, long, value_enum, default_value = "all")]
    pub kind: KindArg,
    #[command(flatten)]
    pub order: SortArgs,
}

/// Execute the search command
pub async fn execute(
    svc: &TreeService,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let query = SearchQuery::new(&args.text, args.kind.into());
    let hits = svc.search(&query).await?;
    let hits = svc.sort_items(hits, args.order.config());
    output::print_items(&hits, format);
    Ok(())
}
