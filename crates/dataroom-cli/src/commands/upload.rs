//! File upload CLI command.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Args;

use dataroom_core::error::{AppError, ErrorKind};
use dataroom_entity::{NewFile, ValidationError};
use dataroom_service::{OperationOutcome, TreeService};

use super::parse_parent;
use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub file: PathBuf,

    /// Target folder ID (omit for root)
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Override file name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Override the detected MIME type
    #[arg(short, long)]
    pub mime_type: Option<String>,
}

/// Execute the upload command
///
/// Oversized files are refused from their metadata, before anything is read.
pub async fn execute(
    svc: &TreeService,
    args: &UploadArgs,
    max_file_size_bytes: i64,
    format: OutputFormat,
) -> Result<(), AppError> {
    let parent_id = parse_parent(args.parent.as_deref())?;

    let metadata = tokio::fs::metadata(&args.file).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::InvalidInput,
            format!("Failed to read file '{}'", args.file.display()),
            e,
        )
    })?;
    check_size(metadata.len(), max_file_size_bytes)?;

    let content = tokio::fs::read(&args.file).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::InvalidInput,
            format!("Failed to read file '{}'", args.file.display()),
            e,
        )
    })?;

    let name = args.name.clone().unwrap_or_else(|| file_name(&args.file));
    let mime_type = args
        .mime_type
        .clone()
        .unwrap_or_else(|| guess_mime_type(&args.file));

    let req = NewFile {
        name,
        parent_id,
        size: content.len() as i64,
        payload: data_url(&mime_type, &content),
        mime_type,
    };

    match svc.upload_file(req).await {
        Ok(file) => {
            match format {
                OutputFormat::Json => {
                    output::print_json(&OperationOutcome::succeeded(
                        &file,
                        "File uploaded successfully",
                    ));
                }
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Uploaded '{}' ({})",
                        file.name,
                        output::format_file_size(file.size())
                    ));
                    output::print_kv("ID", &file.id.to_string());
                }
            }
            Ok(())
        }
        Err(e) => {
            if format == OutputFormat::Json {
                output::print_json(&OperationOutcome::<()>::failed(&e));
            }
            Err(e)
        }
    }
}

/// Reject sizes outside `1..=max` bytes.
fn check_size(len: u64, max: i64) -> Result<(), ValidationError> {
    let size = i64::try_from(len).unwrap_or(i64::MAX);
    if size < 1 || size > max {
        return Err(ValidationError::InvalidSize { size, max });
    }
    Ok(())
}

/// Final path component, or `upload` when there is none.
fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

/// MIME type guessed from the file extension.
fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Encode `content` as a `data:` URL.
fn data_url(mime_type: &str, content: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("deck.PDF")), "application/pdf");
        assert_eq!(
            guess_mime_type(Path::new("no-extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_data_url() {
        assert_eq!(
            data_url("application/pdf", b"%PDF"),
            "data:application/pdf;base64,JVBERg=="
        );
    }

    #[test]
    fn test_check_size_bounds() {
        assert!(check_size(1, 10).is_ok());
        assert!(check_size(10, 10).is_ok());
        assert_eq!(
            check_size(11, 10),
            Err(ValidationError::InvalidSize { size: 11, max: 10 })
        );
        assert!(check_size(0, 10).is_err());
    }

    #[tokio::test]
    async fn test_oversized_file_is_refused_before_upload() {
        use dataroom_core::config::ValidationConfig;
        use dataroom_database::ItemRepository;
        use dataroom_service::UserContext;
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let repo = Arc::new(ItemRepository::in_memory().await.unwrap());
        let svc = TreeService::new(
            repo,
            UserContext::new("alice"),
            ValidationConfig::default(),
        );
        let args = UploadArgs {
            file: path,
            parent: None,
            name: None,
            mime_type: None,
        };

        let err = execute(&svc, &args, 32, OutputFormat::Table)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(
            err.message,
            "File size must be between 1 and 32 bytes. Received: 64"
        );
        assert!(svc.get_all_items().await.unwrap().is_empty());
    }

    #[test]
    fn test_file_name_falls_back() {
        assert_eq!(file_name(Path::new("/tmp/report.pdf")), "report.pdf");
        assert_eq!(file_name(Path::new("/")), "upload");
    }
}
