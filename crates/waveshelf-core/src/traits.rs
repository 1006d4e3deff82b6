//! Collaborator traits for the external backend.
//!
//! The upload pipeline, library, and session code only see these traits, so
//! any backend (HTTP, Postgres, in-memory) can stand behind them and the
//! core stays testable against fakes. The blob storage collaborator lives in
//! `waveshelf-storage` next to its backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AudioFileRecord, NewAudioFile, Session, User};

/// Authentication collaborator: sign-up, sign-in, sign-out, password flows,
/// and the current-session accessor.
///
/// OAuth sign-in happens in a browser; the provider only builds the
/// authorize URL and picks the session up afterwards via `current_user`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AppError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AppError>;

    /// Authorize URL for a browser-driven OAuth sign-in with the named
    /// provider (e.g. "github"). No network call is made.
    fn oauth_authorize_url(&self, provider: &str, redirect_to: &str) -> String;

    async fn sign_out(&self) -> Result<(), AppError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), AppError>;

    /// Update the password of the currently signed-in user.
    async fn update_password(&self, new_password: &str) -> Result<(), AppError>;

    /// Currently signed-in user, or `None` when no session is held.
    async fn current_user(&self) -> Result<Option<User>, AppError>;
}

/// Data-store collaborator for the `audio_files` table.
///
/// Every query and mutation is scoped to the owning user; mutating a row
/// owned by someone else reports `NotFound` rather than touching it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a row; the store assigns `id` and `created_at` and returns the
    /// stored record.
    async fn insert(&self, file: NewAudioFile) -> Result<AudioFileRecord, AppError>;

    /// All records owned by `user_id`, ordered by creation time descending.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AudioFileRecord>, AppError>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<AudioFileRecord>, AppError>;

    /// Rename the display name. `file_path` is immutable and not touched.
    async fn update_file_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        file_name: &str,
    ) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError>;
}
