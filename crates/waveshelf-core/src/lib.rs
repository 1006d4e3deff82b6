//! Waveshelf Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! collaborator traits shared across all Waveshelf components. The actual
//! backends (HTTP, Postgres, local filesystem) live in sibling crates and
//! plug into the traits defined here and in `waveshelf-storage`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types
pub use config::BackendConfig;
pub use constants::{
    ALLOWED_AUDIO_MIME_TYPES, AUDIO_BUCKET, AUDIO_FILES_TABLE, MAX_AUDIO_FILE_SIZE, SIGNED_URL_TTL,
};
pub use error::AppError;
pub use models::{AudioFileRecord, NewAudioFile, Session, User};
pub use traits::{AuthProvider, RecordStore};
