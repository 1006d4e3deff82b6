use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One metadata row describing an uploaded audio blob.
///
/// `file_path` is the storage key of the blob (`{user_id}/{generated-name}`),
/// immutable after creation and the only field guaranteed unique. The row and
/// the blob it references are created and destroyed together; seeing one
/// without the other means a pipeline step failed mid-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Display name, user-mutable via rename. Uniqueness is not enforced.
    pub file_name: String,
    /// Storage key of the blob, immutable after creation.
    pub file_path: String,
    pub file_size: i64,
    /// Probed play duration in seconds; 0.0 when probing failed.
    pub duration: f64,
    pub mime_type: String,
    /// Assigned by the record store; default listing order (descending).
    pub created_at: DateTime<Utc>,
}

impl AudioFileRecord {
    /// Extension of the display name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.file_name)
    }
}

/// Insert form of [`AudioFileRecord`]: the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAudioFile {
    pub user_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub duration: f64,
    pub mime_type: String,
}

/// Extension of a file name, without the dot. A leading dot alone
/// (".gitignore" style) does not count as an extension.
pub fn extension_of(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
