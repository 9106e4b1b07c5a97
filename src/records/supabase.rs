use super::*;
use crate::models::MediaKind;
use crate::supabase::{SupabaseClient, check_status};
use serde::Serialize;

pub struct SupabaseRecords {
    client: SupabaseClient,
    table: String,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    #[serde(rename = "type")]
    kind: MediaKind,
    url: &'a str,
    name: &'a str,
    message: &'a str,
}

impl SupabaseRecords {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RecordStore for SupabaseRecords {
    async fn append(&self, record: NewGalleryRecord) -> Result<GalleryRecord, RecordError> {
        let url = self.client.endpoint(&["rest", "v1", &self.table]);
        let row = InsertRow {
            kind: record.kind,
            url: &record.src,
            name: &record.name,
            message: &record.message,
        };

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| RecordError::Rejected { status, body })?;

        let mut rows: Vec<GalleryRecord> = response.json().await?;
        if rows.is_empty() {
            return Err(RecordError::MissingRow);
        }
        Ok(rows.swap_remove(0))
    }

    async fn list(&self) -> Result<Vec<GalleryRecord>, RecordError> {
        let mut url = self.client.endpoint(&["rest", "v1", &self.table]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.client.get(url).send().await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| RecordError::Rejected { status, body })?;

        Ok(response.json().await?)
    }
}
