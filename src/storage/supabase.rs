use super::*;
use crate::supabase::{SupabaseClient, check_status};
use http::header;

/// Bucket-backed storage; references are the objects' public URLs, so the
/// bucket must be public for clients to fetch them.
pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn public_url(&self, filename: &str) -> String {
        self.client
            .endpoint(&["storage", "v1", "object", "public", &self.bucket, filename])
            .to_string()
    }
}

#[async_trait]
impl MediaStorage for SupabaseStorage {
    async fn store(&self, file_data: FileData) -> Result<String, StorageError> {
        let url = self
            .client
            .endpoint(&["storage", "v1", "object", &self.bucket, &file_data.filename]);

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, file_data.content_type.as_ref())
            .header("x-upsert", "false")
            .body(file_data.bytes)
            .send()
            .await?;
        check_status(response)
            .await
            .map_err(|(status, body)| StorageError::Rejected { status, body })?;

        Ok(self.public_url(&file_data.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage_for(server: &MockServer) -> SupabaseStorage {
        let client = SupabaseClient::new(&server.uri(), "anon-key").unwrap();
        SupabaseStorage::new(client, "gallery")
    }

    #[tokio::test]
    async fn uploads_object_and_returns_public_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/gallery/1-cat.jpg"))
            .and(header_is("apikey", "anon-key"))
            .and(header_is("authorization", "Bearer anon-key"))
            .and(header_is("content-type", "image/jpeg"))
            .and(body_bytes(b"meow".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Key": "gallery/1-cat.jpg"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reference = storage_for(&server)
            .store(FileData {
                bytes: Bytes::from_static(b"meow"),
                content_type: mime::IMAGE_JPEG,
                filename: "1-cat.jpg".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            reference,
            format!("{}/storage/v1/object/public/gallery/1-cat.jpg", server.uri())
        );
    }

    #[tokio::test]
    async fn rejected_upload_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("Duplicate"))
            .mount(&server)
            .await;

        let err = storage_for(&server)
            .store(FileData {
                bytes: Bytes::from_static(b"x"),
                content_type: mime::APPLICATION_OCTET_STREAM,
                filename: "1-x.bin".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            StorageError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(body, "Duplicate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
