use super::*;
use crate::models::RecordId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime record list. Ids are millisecond timestamps, bumped when
/// two appends land in the same millisecond so they stay unique.
#[derive(Clone, Default)]
pub struct InMemoryRecords {
    records: Arc<RwLock<Vec<GalleryRecord>>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecords {
    async fn append(&self, record: NewGalleryRecord) -> Result<GalleryRecord, RecordError> {
        let mut records = self.records.write().await;

        let now = chrono::Utc::now().timestamp_millis();
        let id = match records.last().map(|last| &last.id) {
            Some(RecordId::Int(last)) if *last >= now => last + 1,
            _ => now,
        };

        let record = record.with_id(id, None);
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<GalleryRecord>, RecordError> {
        Ok(self.records.read().await.clone())
    }
}
