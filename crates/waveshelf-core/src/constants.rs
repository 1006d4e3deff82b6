//! Shared constants.

use std::time::Duration;

/// Storage bucket holding uploaded audio blobs.
pub const AUDIO_BUCKET: &str = "audio-files";

/// Table holding one metadata row per uploaded blob.
pub const AUDIO_FILES_TABLE: &str = "audio_files";

/// Upload size ceiling: 50 MiB.
pub const MAX_AUDIO_FILE_SIZE: usize = 50 * 1024 * 1024;

/// MIME types accepted by the upload pipeline.
pub const ALLOWED_AUDIO_MIME_TYPES: &[&str] = &[
    "audio/mp3",
    "audio/mpeg",
    "audio/wav",
    "audio/aac",
    "audio/flac",
    "audio/ogg",
];

/// Validity window for playback signed URLs.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);
