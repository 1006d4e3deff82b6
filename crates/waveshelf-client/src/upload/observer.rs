//! Upload progress hooks.
//!
//! The pipeline reports coarse milestones (0 before I/O, 50 after the blob
//! write, 100 after the metadata insert) plus the completed record, so an
//! owning view can render a progress bar and refresh its listing.

use waveshelf_core::AudioFileRecord;

/// Receiver for upload progress and completion.
pub trait UploadObserver: Send + Sync {
    fn on_progress(&self, _file_name: &str, _percent: u8) {}

    /// Called once per successful upload with the stored record.
    fn on_completed(&self, _record: &AudioFileRecord) {}
}

/// Observer that ignores everything. Default when no UI is attached.
#[derive(Debug, Default)]
pub struct NoOpUploadObserver;

impl UploadObserver for NoOpUploadObserver {}
