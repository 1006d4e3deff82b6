//! Facade tying the library, upload pipeline, and playback transport
//! together for one signed-in user.

use std::sync::Arc;

use uuid::Uuid;

use waveshelf_core::traits::RecordStore;
use waveshelf_core::{AppError, AudioFileRecord};
use waveshelf_storage::BlobStore;

use crate::library::AudioLibrary;
use crate::player::{MediaElement, MediaEvent, PlaybackTransport};
use crate::session::SessionManager;
use crate::upload::{CandidateFile, UploadPipeline};

/// One user's audio manager: upload adds records, the library lists and
/// mutates them, the transport plays one at a time. Deleting the record the
/// transport currently holds unloads it.
pub struct AudioManager<E: MediaElement> {
    blobs: Arc<dyn BlobStore>,
    library: AudioLibrary,
    pipeline: UploadPipeline,
    transport: PlaybackTransport<E>,
}

impl<E: MediaElement> AudioManager<E> {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
        user_id: Uuid,
        element: E,
    ) -> Self {
        let library = AudioLibrary::new(blobs.clone(), records.clone(), user_id);
        let pipeline = UploadPipeline::new(blobs.clone(), records);
        Self {
            blobs,
            library,
            pipeline,
            transport: PlaybackTransport::new(element),
        }
    }

    /// Build a manager for the currently signed-in user. Fails with
    /// `Unauthorized` when the session has not resolved to a user.
    pub fn for_session(
        blobs: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
        session: &SessionManager,
        element: E,
    ) -> Result<Self, AppError> {
        Ok(Self::new(blobs, records, session.user_id()?, element))
    }

    /// Replace the default pipeline, keeping library and transport.
    pub fn with_pipeline(mut self, pipeline: UploadPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn library(&self) -> &AudioLibrary {
        &self.library
    }

    pub fn transport(&self) -> &PlaybackTransport<E> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut PlaybackTransport<E> {
        &mut self.transport
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.library.refresh().await
    }

    /// Upload one candidate and refresh the library so the new record is
    /// visible in listings.
    pub async fn upload_file(
        &mut self,
        candidate: CandidateFile,
    ) -> Result<AudioFileRecord, AppError> {
        let record = self
            .pipeline
            .upload(self.library.user_id(), candidate)
            .await?;
        self.library.refresh().await?;
        Ok(record)
    }

    pub async fn rename_file(
        &mut self,
        id: Uuid,
        new_name: &str,
    ) -> Result<AudioFileRecord, AppError> {
        self.library.rename(id, new_name).await
    }

    /// Delete a record and its blob. If the transport currently holds the
    /// deleted record, it is unloaded back to idle.
    pub async fn delete_file(&mut self, id: Uuid) -> Result<AudioFileRecord, AppError> {
        let record = self.library.delete(id).await?;
        if self.transport.loaded_record_id() == Some(id) {
            self.transport.unload();
        }
        Ok(record)
    }

    /// Load a record into the transport, resolving its signed URL.
    ///
    /// Returns the load generation; element events must carry it back via
    /// [`handle_media_event`](Self::handle_media_event).
    pub async fn play_file(&mut self, id: Uuid) -> Result<u64, AppError> {
        let record = self
            .library
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("No audio file with id {}", id)))?
            .clone();
        self.transport.load(self.blobs.as_ref(), record).await
    }

    pub fn handle_media_event(
        &mut self,
        generation: u64,
        event: MediaEvent,
    ) -> Result<(), AppError> {
        self.transport.handle_event(generation, event)
    }
}
