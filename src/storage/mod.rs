use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Reference to a durably stored deliverable.
#[derive(Debug, Clone)]
pub struct StoredDeliverable {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("upload rejected: {0}")]
    Upload(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// External collaborator that persists submitted work artifacts.
///
/// Order completion must not record a deliverable reference unless this call
/// succeeded, so implementations return the final URL only on success.
#[async_trait]
pub trait DeliverableStore: Send + Sync {
    /// Store a base64-encoded artifact under `folder` and return its URL.
    async fn store(&self, data_base64: &str, folder: &str) -> Result<StoredDeliverable, StoreError>;
}

/// Cloudinary-backed store using an unsigned upload preset.
pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: &str, upload_preset: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
        }
    }

    /// Build from `CLOUDINARY_CLOUD_NAME` / `CLOUDINARY_UPLOAD_PRESET`.
    pub fn from_env() -> Result<Self, String> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| "CLOUDINARY_CLOUD_NAME must be set".to_string())?;
        let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET")
            .map_err(|_| "CLOUDINARY_UPLOAD_PRESET must be set".to_string())?;
        Ok(Self::new(&cloud_name, &upload_preset))
    }
}

#[async_trait]
impl DeliverableStore for CloudinaryStore {
    async fn store(&self, data_base64: &str, folder: &str) -> Result<StoredDeliverable, StoreError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );

        // Cloudinary accepts data URIs in the `file` field; resource type
        // `auto` lets it detect images vs PDFs.
        let form = reqwest::multipart::Form::new()
            .text("file", format!("data:application/octet-stream;base64,{data_base64}"))
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", folder.to_string());

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "deliverable upload failed");
            return Err(StoreError::Upload(format!("{status}: {body}")));
        }

        let parsed: CloudinaryResponse = response.json().await?;
        Ok(StoredDeliverable {
            url: parsed.secure_url,
        })
    }
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    uploads: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliverableStore for MemoryStore {
    async fn store(&self, data_base64: &str, folder: &str) -> Result<StoredDeliverable, StoreError> {
        if data_base64.is_empty() {
            return Err(StoreError::Upload("empty payload".to_string()));
        }
        let url = format!("memory://{folder}/{}", Uuid::new_v4());
        self.uploads
            .lock()
            .unwrap()
            .push((url.clone(), data_base64.to_string()));
        Ok(StoredDeliverable { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_returns_distinct_urls() {
        let store = MemoryStore::new();
        let a = store.store("aGVsbG8=", "work").await.unwrap();
        let b = store.store("d29ybGQ=", "work").await.unwrap();
        assert_ne!(a.url, b.url);
        assert!(a.url.starts_with("memory://work/"));
        assert_eq!(store.upload_count(), 2);
    }

    #[tokio::test]
    async fn memory_store_rejects_empty_payload() {
        let store = MemoryStore::new();
        let err = store.store("", "work").await.unwrap_err();
        assert!(matches!(err, StoreError::Upload(_)));
    }
}
