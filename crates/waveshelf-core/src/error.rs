//! Error types module
//!
//! All errors are unified under the `AppError` enum, which covers validation
//! failures, transient backend failures (storage, record store, auth), and
//! the two failure modes specific to this system: a blob written without its
//! metadata row (`PartialWrite`) and a playback URL outliving its validity
//! window (`StaleSession`).
//!
//! Errors are always caught at the operation boundary and turned into status
//! text via [`AppError::user_message`]; nothing here triggers a retry.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Record store error: {0}")]
    Database(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Blob written, metadata insert failed. The compensating delete has
    /// already been attempted by the time this is constructed; `source` is
    /// the original insert error.
    #[error("Metadata insert failed after blob write to {file_path}: {source}")]
    PartialWrite {
        file_path: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Signed URL expired: {0}")]
    StaleSession(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl AppError {
    /// Whether the failure is transient from the caller's point of view
    /// (worth retrying by hand; nothing in this crate retries automatically).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::Database(_)
                | AppError::Auth(_)
                | AppError::PartialWrite { .. }
                | AppError::Internal(_)
        )
    }

    /// User-facing status text. Validation and not-found messages are shown
    /// verbatim; backend failures keep the underlying message so the user
    /// sees what actually went wrong.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(msg) => format!("Storage request failed: {}", msg),
            AppError::Database(msg) => format!("Backend request failed: {}", msg),
            AppError::Auth(msg) => format!("Authentication failed: {}", msg),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PartialWrite { source, .. } => source.user_message(),
            AppError::StaleSession(_) => {
                "Playback link expired, please reselect the file".to_string()
            }
            AppError::Playback(msg) => format!("Playback failed: {}", msg),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }
}
