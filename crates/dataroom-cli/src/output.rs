//! Table and JSON output formatting for CLI commands.

use chrono::{DateTime, Local};
use serde::Serialize;
use tabled::{Table, Tabled};

use dataroom_entity::Item;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Item display row
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// Item ID
    pub id: String,
    /// Folder or file
    pub kind: String,
    /// Name
    pub name: String,
    /// Size
    pub size: String,
    /// Last modified
    pub modified: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind().to_string(),
            name: item.name.clone(),
            size: if item.is_folder() {
                "-".to_string()
            } else {
                format_file_size(item.size())
            },
            modified: format_timestamp(item.updated_at),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_items(items: &[Item], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
            print_list(&rows, format);
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => print_json(&rows),
    }
}

/// Print any value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{key}:"), value);
}

/// Human-readable byte count: `0 Bytes`, `1 KB`, `1.5 MB`.
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Local date and time of a millisecond timestamp.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
