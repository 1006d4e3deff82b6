//! Storage API endpoints (`/storage/v1/object/...`).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use waveshelf_storage::{BlobStore, SignedUrl, StorageError, StorageResult};

use crate::{encode_key, RestBackend};

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl RestBackend {
    fn object_url(&self, key: &str) -> String {
        self.build_url(&format!(
            "/storage/v1/object/{}/{}",
            self.bucket,
            encode_key(key)
        ))
    }

    /// Signed URLs come back service-relative ("/object/sign/...").
    fn absolute_signed_url(&self, relative: &str) -> String {
        format!(
            "{}/storage/v1/{}",
            self.base_url,
            relative.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BlobStore for RestBackend {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        let request = self
            .client
            .post(self.object_url(key))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT => Err(StorageError::AlreadyExists(key.to_string())),
            _ => Err(StorageError::UploadFailed(Self::error_text(response).await)),
        }
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let request = self.client.delete(self.object_url(key));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Err(StorageError::NotFound(key.to_string())),
            _ => Err(StorageError::DeleteFailed(Self::error_text(response).await)),
        }
    }

    async fn issue_signed_url(&self, key: &str, ttl: Duration) -> StorageResult<SignedUrl> {
        let url = self.build_url(&format!(
            "/storage/v1/object/sign/{}/{}",
            self.bucket,
            encode_key(key)
        ));
        let request = self
            .client
            .post(&url)
            .json(&json!({ "expiresIn": ttl.as_secs() }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::SignFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let body: SignResponse = response
                    .json()
                    .await
                    .map_err(|e| StorageError::SignFailed(e.to_string()))?;
                let expires_at = Utc::now()
                    + chrono::Duration::from_std(ttl)
                        .map_err(|e| StorageError::SignFailed(e.to_string()))?;
                Ok(SignedUrl {
                    url: self.absolute_signed_url(&body.signed_url),
                    expires_at,
                })
            }
            reqwest::StatusCode::NOT_FOUND => Err(StorageError::NotFound(key.to_string())),
            _ => Err(StorageError::SignFailed(Self::error_text(response).await)),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let request = self.client.head(self.object_url(key));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            _ => Err(StorageError::UploadFailed(Self::error_text(response).await)),
        }
    }
}
