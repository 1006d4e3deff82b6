//! Upload pipeline.
//!
//! Turns a candidate file into a durable blob plus a durable metadata
//! record, or leaves no trace. Pipeline invocations are independent: a
//! batch drop runs one pipeline per file with no cross-file ordering, and
//! nothing deduplicates identical bytes.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use waveshelf_core::traits::RecordStore;
use waveshelf_core::{validation, AppError, AudioFileRecord, NewAudioFile};
use waveshelf_storage::{generate_object_key, BlobStore};

use super::observer::{NoOpUploadObserver, UploadObserver};
use super::probe::{DurationProbe, LoftyDurationProbe};

/// Probing must never stall an upload; past this it counts as failed.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A file as selected or dropped by the user.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// The upload pipeline. Cheap to clone behind `Arc`s; concurrent uploads
/// share one instance.
pub struct UploadPipeline {
    blobs: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
    probe: Arc<dyn DurationProbe>,
    observer: Arc<dyn UploadObserver>,
}

impl UploadPipeline {
    pub fn new(blobs: Arc<dyn BlobStore>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            blobs,
            records,
            probe: Arc::new(LoftyDurationProbe::new()),
            observer: Arc::new(NoOpUploadObserver),
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn UploadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full pipeline for one candidate.
    ///
    /// Validation runs before any I/O: a disallowed MIME type or an
    /// oversized file causes zero storage and record-store calls. After a
    /// successful blob write, a failed metadata insert triggers a
    /// best-effort compensating delete of the blob; the insert error is
    /// what gets reported either way.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        candidate: CandidateFile,
    ) -> Result<AudioFileRecord, AppError> {
        validation::validate_mime_type(&candidate.mime_type)?;
        validation::validate_file_size(candidate.bytes.len())?;

        self.observer.on_progress(&candidate.file_name, 0);

        let duration = self.probe_duration(&candidate).await;

        let file_path = generate_object_key(owner_id, &candidate.file_name);
        let file_size = candidate.bytes.len() as i64;

        self.blobs
            .put(&file_path, &candidate.mime_type, candidate.bytes.clone())
            .await?;
        self.observer.on_progress(&candidate.file_name, 50);

        let record = match self
            .records
            .insert(NewAudioFile {
                user_id: owner_id,
                file_name: candidate.file_name.clone(),
                file_path: file_path.clone(),
                file_size,
                duration,
                mime_type: candidate.mime_type.clone(),
            })
            .await
        {
            Ok(record) => record,
            Err(insert_err) => {
                // Blob is durable but unreferenced; take it back out. A
                // failed cleanup leaves an orphan, which is logged and
                // never masks the insert error.
                if let Err(cleanup_err) = self.blobs.remove(&file_path).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        file_path = %file_path,
                        "Failed to clean up blob after metadata insert error"
                    );
                }
                return Err(AppError::PartialWrite {
                    file_path,
                    source: Box::new(insert_err),
                });
            }
        };

        self.observer.on_progress(&candidate.file_name, 100);
        tracing::info!(
            file_path = %record.file_path,
            file_size,
            duration,
            mime_type = %record.mime_type,
            "Upload complete"
        );
        self.observer.on_completed(&record);
        Ok(record)
    }

    /// Best-effort duration probe: failures and timeouts yield 0.0.
    async fn probe_duration(&self, candidate: &CandidateFile) -> f64 {
        let probed = tokio::time::timeout(
            PROBE_TIMEOUT,
            self.probe.probe_seconds(candidate.bytes.clone()),
        )
        .await;

        match probed {
            Ok(Ok(seconds)) if seconds.is_finite() && seconds >= 0.0 => seconds,
            Ok(Ok(_)) => 0.0,
            Ok(Err(e)) => {
                tracing::debug!(
                    file_name = %candidate.file_name,
                    error = %e,
                    "Duration probe failed, recording 0"
                );
                0.0
            }
            Err(_) => {
                tracing::debug!(
                    file_name = %candidate.file_name,
                    "Duration probe timed out, recording 0"
                );
                0.0
            }
        }
    }
}
