//! The seam between the transport and whatever actually emits sound.

use waveshelf_core::AppError;

/// Notifications flowing back from a media element to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Enough of the source has loaded that its duration is known.
    MetadataLoaded { duration: f64, position: f64 },
    /// The playhead advanced during playback.
    TimeUpdate { position: f64 },
    /// Playback reached the end of the source.
    Ended,
    /// The element failed while loading or playing the source.
    Error(String),
}

/// An audio output the transport drives. Implementations wrap a real
/// decoder/sink; tests substitute a recording fake.
pub trait MediaElement {
    /// Point the element at a new source URL.
    fn bind(&mut self, url: &str) -> Result<(), AppError>;
    /// Detach from the current source, if any.
    fn unbind(&mut self);
    fn play(&mut self) -> Result<(), AppError>;
    fn pause(&mut self) -> Result<(), AppError>;
    fn seek(&mut self, position: f64) -> Result<(), AppError>;
    fn set_volume(&mut self, volume: f64) -> Result<(), AppError>;
}
