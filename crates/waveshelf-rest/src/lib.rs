//! HTTP backend for a Supabase-compatible service.
//!
//! One [`RestBackend`] implements all three collaborator traits:
//! `AuthProvider` against the GoTrue auth endpoints (`/auth/v1/...`),
//! `BlobStore` against the Storage API (`/storage/v1/object/...`), and
//! `RecordStore` against PostgREST (`/rest/v1/{table}`).
//!
//! Row-level ownership filtering is enforced twice: the service applies its
//! own row-level security, and every request this crate builds carries an
//! explicit `user_id` filter anyway.

mod auth;
mod records;
mod storage;

use std::time::Duration;

use reqwest::Client;
use tokio::sync::RwLock;

use waveshelf_core::{AppError, BackendConfig, Session};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for a Supabase-compatible backend.
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
    table: String,
    session: RwLock<Option<Session>>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
            table: config.table.clone(),
            session: RwLock::new(None),
        })
    }

    /// Build the backend from `WAVESHELF_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(&BackendConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the `apikey` header plus a bearer token: the session token when
    /// signed in, the anon key otherwise.
    pub(crate) async fn apply_auth(
        &self,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        let token = {
            let session = self.session.read().await;
            session
                .as_ref()
                .map(|s| s.access_token.clone())
                .unwrap_or_else(|| self.anon_key.clone())
        };
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
    }

    pub(crate) async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    pub(crate) async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Body text of a failed response, for error messages.
    pub(crate) async fn error_text(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string())
    }
}

/// Percent-encode an object key, keeping `/` as the segment separator.
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
