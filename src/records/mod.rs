mod in_memory;
mod supabase;

pub use in_memory::InMemoryRecords;
pub use supabase::SupabaseRecords;

use crate::models::{GalleryRecord, NewGalleryRecord};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("record store rejected request with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("record store returned no row for the insert")]
    MissingRow,
}

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Stores the record and returns it with its assigned identity.
    async fn append(&self, record: NewGalleryRecord) -> Result<GalleryRecord, RecordError>;
    async fn list(&self) -> Result<Vec<GalleryRecord>, RecordError>;
}
