mod local_fs;
mod supabase;

pub use local_fs::LocalFileStorage;
pub use supabase::SupabaseStorage;

use async_trait::async_trait;
use axum::body::Bytes;
use mime::Mime;
use reqwest::StatusCode;
use std::path::Path;
use thiserror::Error;

#[derive(Debug)]
pub struct FileData {
    pub bytes: Bytes,
    pub content_type: Mime,
    /// Final stored name, already unique-prefixed.
    pub filename: String,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage rejected upload with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[async_trait]
pub trait MediaStorage: Send + Sync + 'static {
    /// Persists the file and returns the reference clients fetch it from.
    async fn store(&self, file_data: FileData) -> Result<String, StorageError>;
}

/// `<unix-ms>-<original>`, with the original reduced to its last path
/// component so uploads cannot escape the storage root.
pub fn stored_file_name(unix_ms: i64, original: Option<&str>) -> String {
    let base = original
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("upload");
    format!("{unix_ms}-{base}")
}
