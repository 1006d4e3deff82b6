//! Local duration probing.
//!
//! Probing reads the candidate's media properties in-process, without any
//! network I/O. It is best-effort: the pipeline maps any failure to a zero
//! duration and carries on.

use async_trait::async_trait;
use bytes::Bytes;
use lofty::AudioFile;

use waveshelf_core::AppError;

/// Probes the playable duration of raw audio bytes.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds, or an error when the bytes are not parseable
    /// audio. Callers treat errors as "duration unknown", never as fatal.
    async fn probe_seconds(&self, data: Bytes) -> Result<f64, AppError>;
}

/// Duration probe backed by lofty's container parsing.
#[derive(Debug, Default)]
pub struct LoftyDurationProbe;

impl LoftyDurationProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DurationProbe for LoftyDurationProbe {
    async fn probe_seconds(&self, data: Bytes) -> Result<f64, AppError> {
        // Parsing is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let cursor = std::io::Cursor::new(data);
            let tagged = lofty::Probe::new(cursor)
                .guess_file_type()
                .map_err(|e| AppError::Internal(format!("Probe failed: {}", e)))?
                .read()
                .map_err(|e| AppError::Internal(format!("Probe failed: {}", e)))?;
            Ok(tagged.properties().duration().as_secs_f64())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Probe task failed: {}", e)))?
    }
}
