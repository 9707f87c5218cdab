//! Folder and file management CLI commands.

use clap::{Args, ValueEnum};
use serde::Serialize;

use dataroom_core::error::AppError;
use dataroom_core::types::{SortBy, SortConfig, SortDirection};
use dataroom_entity::{ItemContent, ItemKind, ItemNode, NewFolder};
use dataroom_service::{ItemFilter, OperationOutcome, SearchQuery, TreeService, search_items};

use super::{parse_id, parse_parent};
use crate::output::{self, OutputFormat};

/// Sort key argument
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortKey {
    /// Case-insensitive name
    #[default]
    Name,
    /// Last modified
    Date,
    /// File size
    Size,
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => SortBy::Name,
            SortKey::Date => SortBy::Date,
            SortKey::Size => SortBy::Size,
        }
    }
}

/// Kind filter argument
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum KindArg {
    /// Folders and files
    #[default]
    All,
    /// Folders only
    Folders,
    /// Files only
    Files,
}

impl From<KindArg> for ItemFilter {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => ItemFilter::All,
            KindArg::Folders => ItemFilter::Folders,
            KindArg::Files => ItemFilter::Files,
        }
    }
}

/// Ordering flags shared by listing commands
#[derive(Debug, Args)]
pub struct SortArgs {
    /// Sort key
    #[arg(short, long, value_enum, default_value = "name")]
    pub sort: SortKey,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl SortArgs {
    /// Sort configuration selected by the flags
    pub fn config(&self) -> SortConfig {
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        SortConfig::new(self.sort.into(), direction)
    }
}

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,
    /// Parent folder ID (omit for root)
    #[arg(short, long)]
    pub parent: Option<String>,
}

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID (omit for root)
    pub folder: Option<String>,
    /// Only show this kind of item
    #[arg(short, long, value_enum, default_value = "all")]
    pub kind: KindArg,
    #[command(flatten)]
    pub order: SortArgs,
}

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub order: SortArgs,
}

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Item ID
    pub id: String,
    /// New name
    pub name: String,
}

/// Arguments for `mv`
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Item ID
    pub id: String,
    /// Target folder ID, or `root`
    pub target: String,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Item ID
    pub id: String,
    /// Skip the confirmation prompt for folders
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `path`
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Folder ID (omit for root)
    pub folder: Option<String>,
}

/// Arguments for `show`
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Item ID
    pub id: String,
    /// Include the encoded payload of files
    #[arg(long)]
    pub payload: bool,
}

/// Execute `mkdir`
pub async fn mkdir(svc: &TreeService, args: &MkdirArgs, format: OutputFormat) -> Result<(), AppError> {
    let parent_id = parse_parent(args.parent.as_deref())?;
    let result = svc.create_folder(NewFolder::new(&args.name, parent_id)).await;
    report(result, "Folder created successfully", format)
}

/// Execute `ls`
pub async fn ls(svc: &TreeService, args: &LsArgs, format: OutputFormat) -> Result<(), AppError> {
    let parent_id = parse_parent(args.folder.as_deref())?;
    let items = svc.get_items(parent_id).await?;
    let items = search_items(items, &SearchQuery::new("", args.kind.into()));
    let items = svc.sort_items(items, args.order.config());
    output::print_items(&items, format);
    Ok(())
}

/// Execute `tree`
pub async fn tree(svc: &TreeService, args: &TreeArgs, format: OutputFormat) -> Result<(), AppError> {
    let tree = svc.get_tree(args.order.config()).await?;
    match format {
        OutputFormat::Json => output::print_json(&tree),
        OutputFormat::Table => {
            println!("{}", svc.root_label());
            let mut lines = Vec::new();
            render_nodes(&tree.roots, "", &mut lines);
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Execute `rename`
pub async fn rename(svc: &TreeService, args: &RenameArgs, format: OutputFormat) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let result = svc.rename_item(id, &args.name).await;
    report(result, "Item renamed successfully", format)
}

/// Execute `mv`
pub async fn mv(svc: &TreeService, args: &MoveArgs, format: OutputFormat) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let target = parse_parent(Some(&args.target))?;
    let result = svc.move_item(id, target).await;
    let message = match &result {
        Ok(item) => format!("{} moved successfully", item.name),
        Err(_) => String::new(),
    };
    report(result, message, format)
}

/// Execute `rm`
pub async fn rm(svc: &TreeService, args: &RemoveArgs, format: OutputFormat) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let Some(item) = svc.get_item(id).await? else {
        output::print_warning("Nothing to delete.");
        return Ok(());
    };

    if !args.yes {
        let mut prompt = format!("Are you sure you want to delete \"{}\"?", item.name);
        if item.is_folder() {
            prompt.push_str(" This will also delete all items inside this folder.");
        }
        let confirm = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AppError::invalid_input(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let result = svc.delete_item(id).await;
    report(result, "Item deleted successfully", format)
}

/// Execute `path`
pub async fn path(svc: &TreeService, args: &PathArgs, format: OutputFormat) -> Result<(), AppError> {
    let folder_id = parse_parent(args.folder.as_deref())?;
    let crumbs = svc.get_breadcrumbs(folder_id).await?;
    match format {
        OutputFormat::Json => output::print_json(&crumbs),
        OutputFormat::Table => {
            let names: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
            println!("{}", names.join(" / "));
        }
    }
    Ok(())
}

/// Execute `show`
pub async fn show(svc: &TreeService, args: &ShowArgs, format: OutputFormat) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let mut item = svc
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    if !args.payload {
        if let ItemContent::File(file) = &mut item.content {
            file.payload.clear();
        }
    }

    match format {
        OutputFormat::Json => output::print_json(&item),
        OutputFormat::Table => {
            let crumbs = svc.get_breadcrumbs(item.parent_id).await?;
            let location: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();

            output::print_kv("ID", &item.id.to_string());
            output::print_kv("Name", &item.name);
            output::print_kv("Kind", item.kind().label());
            output::print_kv("Location", &location.join(" / "));
            if let Some(file) = item.file() {
                output::print_kv("Size", &output::format_file_size(file.size));
                output::print_kv("Type", &file.mime_type);
                if args.payload {
                    output::print_kv("Payload", &file.payload);
                }
            }
            output::print_kv("Created", &output::format_timestamp(item.created_at));
            output::print_kv("Modified", &output::format_timestamp(item.updated_at));
        }
    }
    Ok(())
}

/// Print the outcome of a mutation and turn failures into the exit error.
fn report<T: Serialize>(
    result: Result<T, AppError>,
    message: impl Into<String>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let error = result.as_ref().err().cloned();
    let outcome = OperationOutcome::from_result(result, message);

    match format {
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Table if outcome.success => output::print_success(&outcome.message),
        OutputFormat::Table => {}
    }

    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Draw `nodes` with box-drawing connectors.
fn render_nodes(nodes: &[ItemNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let connector = if last { "└── " } else { "├── " };
        let label = if node.kind == ItemKind::Folder {
            format!("{}/", node.name)
        } else {
            format!("{} ({})", node.name, output::format_file_size(node.size))
        };
        lines.push(format!("{prefix}{connector}{label}"));

        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_nodes(&node.children, &child_prefix, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataroom_core::types::ItemId;

    fn node(name: &str, kind: ItemKind, children: Vec<ItemNode>) -> ItemNode {
        ItemNode {
            id: ItemId::new(),
            name: name.to_string(),
            kind,
            size: if kind == ItemKind::File { 2048 } else { 0 },
            children,
        }
    }

    #[test]
    fn test_render_nodes_draws_connectors() {
        let roots = vec![
            node(
                "Legal",
                ItemKind::Folder,
                vec![node("nda.pdf", ItemKind::File, Vec::new())],
            ),
            node("readme.pdf", ItemKind::File, Vec::new()),
        ];

        let mut lines = Vec::new();
        render_nodes(&roots, "", &mut lines);
        assert_eq!(
            lines,
            [
                "├── Legal/",
                "│   └── nda.pdf (2 KB)",
                "└── readme.pdf (2 KB)",
            ]
        );
    }

    #[test]
    fn test_sort_args_config() {
        let args = SortArgs {
            sort: SortKey::Size,
            desc: true,
        };
        assert_eq!(args.config(), SortConfig::desc(SortBy::Size));
    }
}
