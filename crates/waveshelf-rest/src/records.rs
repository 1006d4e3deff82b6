//! PostgREST endpoints for the `audio_files` table.
//!
//! With `Prefer: return=representation` every mutation answers with the
//! affected rows, so an empty array doubles as the not-found signal for
//! rows the caller does not own.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use waveshelf_core::{AppError, AudioFileRecord, NewAudioFile, RecordStore};

use crate::RestBackend;

impl RestBackend {
    fn table_url(&self) -> String {
        self.build_url(&format!("/rest/v1/{}", self.table))
    }

    async fn parse_rows(response: reqwest::Response) -> Result<Vec<AudioFileRecord>, AppError> {
        response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("Malformed row response: {}", e)))
    }
}

#[async_trait]
impl RecordStore for RestBackend {
    async fn insert(&self, file: NewAudioFile) -> Result<AudioFileRecord, AppError> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&file);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Database(Self::error_text(response).await));
        }
        Self::parse_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AudioFileRecord>, AppError> {
        let request = self.client.get(self.table_url()).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("order", "created_at.desc".to_string()),
        ]);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Database(Self::error_text(response).await));
        }
        Self::parse_rows(response).await
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<AudioFileRecord>, AppError> {
        let request = self.client.get(self.table_url()).query(&[
            ("select", "*".to_string()),
            ("id", format!("eq.{}", id)),
            ("user_id", format!("eq.{}", user_id)),
        ]);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Database(Self::error_text(response).await));
        }
        Ok(Self::parse_rows(response).await?.into_iter().next())
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        file_name: &str,
    ) -> Result<(), AppError> {
        let request = self
            .client
            .patch(self.table_url())
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", user_id)),
            ])
            .json(&json!({ "file_name": file_name }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Database(Self::error_text(response).await));
        }
        if Self::parse_rows(response).await?.is_empty() {
            return Err(AppError::NotFound(format!("Audio file {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let request = self
            .client
            .delete(self.table_url())
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", user_id)),
            ]);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Database(Self::error_text(response).await));
        }
        if Self::parse_rows(response).await?.is_empty() {
            return Err(AppError::NotFound(format!("Audio file {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveshelf_core::BackendConfig;

    #[test]
    fn test_table_url() {
        let backend = RestBackend::new(&BackendConfig {
            base_url: "https://abc.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            bucket: "audio-files".to_string(),
            table: "audio_files".to_string(),
            max_file_size_bytes: 50 * 1024 * 1024,
            signed_url_ttl_secs: 3600,
        })
        .unwrap();
        assert_eq!(
            backend.table_url(),
            "https://abc.supabase.co/rest/v1/audio_files"
        );
    }
}
