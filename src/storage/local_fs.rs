use super::*;
use std::path::PathBuf;
use tokio::fs;

pub struct LocalFileStorage {
    storage_path: PathBuf,
    public_prefix: String,
}

impl LocalFileStorage {
    pub fn new(storage_path: PathBuf, public_prefix: impl Into<String>) -> Result<Self, StorageError> {
        if !storage_path.exists() {
            std::fs::create_dir_all(&storage_path)?;
        }
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Ok(Self {
            storage_path,
            public_prefix,
        })
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }
}

#[async_trait]
impl MediaStorage for LocalFileStorage {
    async fn store(&self, file_data: FileData) -> Result<String, StorageError> {
        let file_path = self.storage_path.join(&file_data.filename);
        fs::write(&file_path, &file_data.bytes).await?;

        tracing::debug!(path = %file_path.display(), bytes = file_data.bytes.len(), "wrote upload");
        Ok(format!("{}/{}", self.public_prefix, file_data.filename))
    }
}
