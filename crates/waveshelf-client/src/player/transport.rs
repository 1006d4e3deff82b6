//! Playback transport.
//!
//! Drives a single media element against a signed URL and mirrors the
//! element's real-time state. The element is the source of truth for the
//! playhead position; the transport never derives position from wall-clock
//! timers.

use uuid::Uuid;
use waveshelf_core::{AppError, AudioFileRecord, SIGNED_URL_TTL};
use waveshelf_storage::{BlobStore, SignedUrl};

use super::element::{MediaElement, MediaEvent};

/// Transport states.
///
/// `Resolving` covers the in-flight signed-URL fetch; `Ready` means the URL
/// is bound but the element has not yet reported metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Resolving,
    Ready,
    Paused,
    Playing,
    Ended,
}

impl TransportState {
    /// States in which the element has a bound source.
    fn is_bound(self) -> bool {
        matches!(
            self,
            TransportState::Ready
                | TransportState::Paused
                | TransportState::Playing
                | TransportState::Ended
        )
    }
}

/// A transport for one media element.
///
/// Loading is split into [`begin_load`](Self::begin_load) and
/// [`finish_load`](Self::finish_load) around the URL fetch so a load that
/// was superseded mid-flight can be discarded by generation: each
/// `begin_load` (and each `unload`) bumps the generation, and results or
/// events carrying an older generation are ignored.
pub struct PlaybackTransport<E: MediaElement> {
    element: E,
    state: TransportState,
    record: Option<AudioFileRecord>,
    resolved: Option<SignedUrl>,
    generation: u64,
    position_seconds: f64,
    duration_seconds: f64,
    volume: f64,
}

/// Element-reported timings must stay usable as clamp bounds.
fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

impl<E: MediaElement> PlaybackTransport<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            state: TransportState::Idle,
            record: None,
            resolved: None,
            generation: 0,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume: 1.0,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the record currently loaded (any non-idle state).
    pub fn loaded_record_id(&self) -> Option<Uuid> {
        self.record.as_ref().map(|r| r.id)
    }

    /// Start loading a record, tearing down whatever was loaded before.
    ///
    /// Returns the generation the caller must pass back to
    /// [`finish_load`](Self::finish_load) once the signed URL resolves.
    pub fn begin_load(&mut self, record: AudioFileRecord) -> u64 {
        self.teardown();
        self.generation += 1;
        self.record = Some(record);
        self.state = TransportState::Resolving;
        self.generation
    }

    /// Apply the outcome of a signed-URL fetch started by `begin_load`.
    ///
    /// A result carrying a stale generation is discarded: some later load
    /// or unload already superseded it, and binding its URL would attach
    /// the wrong source to the element.
    pub fn finish_load(
        &mut self,
        generation: u64,
        resolved: Result<SignedUrl, AppError>,
    ) -> Result<(), AppError> {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding superseded URL resolution"
            );
            return Ok(());
        }
        match resolved {
            Ok(signed) => {
                self.element.bind(&signed.url)?;
                self.resolved = Some(signed);
                self.state = TransportState::Ready;
                Ok(())
            }
            Err(e) => {
                self.teardown();
                Err(e)
            }
        }
    }

    /// Resolve a signed URL for `record` and bind it in one call.
    ///
    /// Returns the generation of the load on success.
    pub async fn load(
        &mut self,
        blobs: &dyn BlobStore,
        record: AudioFileRecord,
    ) -> Result<u64, AppError> {
        let file_path = record.file_path.clone();
        let generation = self.begin_load(record);
        let resolved = blobs
            .issue_signed_url(&file_path, SIGNED_URL_TTL)
            .await
            .map_err(AppError::from);
        self.finish_load(generation, resolved)?;
        Ok(generation)
    }

    /// Unload the current record, if any. The transport goes back to
    /// `Idle` and any in-flight resolution becomes stale.
    pub fn unload(&mut self) {
        self.teardown();
        self.generation += 1;
    }

    /// Feed an element event into the state machine.
    ///
    /// Events from a previous binding (stale generation) are discarded.
    pub fn handle_event(&mut self, generation: u64, event: MediaEvent) -> Result<(), AppError> {
        if generation != self.generation {
            return Ok(());
        }
        match event {
            MediaEvent::MetadataLoaded { duration, position } => {
                if self.state == TransportState::Ready {
                    // Elements report NaN duration until metadata settles;
                    // a non-finite bound would make later seek clamps panic.
                    self.duration_seconds = sanitize_seconds(duration);
                    self.position_seconds = sanitize_seconds(position);
                    self.state = TransportState::Paused;
                }
                Ok(())
            }
            MediaEvent::TimeUpdate { position } => {
                if self.state == TransportState::Playing {
                    self.position_seconds = position;
                }
                Ok(())
            }
            MediaEvent::Ended => {
                if self.state == TransportState::Playing {
                    self.state = TransportState::Ended;
                    self.position_seconds = self.duration_seconds;
                }
                Ok(())
            }
            MediaEvent::Error(message) => {
                let expired = self
                    .resolved
                    .as_ref()
                    .map(SignedUrl::is_expired)
                    .unwrap_or(false);
                let file_path = self
                    .record
                    .as_ref()
                    .map(|r| r.file_path.clone())
                    .unwrap_or_default();
                self.teardown();
                if expired {
                    Err(AppError::StaleSession(file_path))
                } else {
                    Err(AppError::Playback(message))
                }
            }
        }
    }

    /// Start or resume playback. From `Ended` this restarts at the top.
    pub fn play(&mut self) -> Result<(), AppError> {
        match self.state {
            TransportState::Paused => {
                self.element.play()?;
                self.state = TransportState::Playing;
                Ok(())
            }
            TransportState::Ended => {
                self.element.seek(0.0)?;
                self.position_seconds = 0.0;
                self.element.play()?;
                self.state = TransportState::Playing;
                Ok(())
            }
            TransportState::Playing => Ok(()),
            other => Err(AppError::Playback(format!(
                "cannot play from {other:?} state"
            ))),
        }
    }

    pub fn pause(&mut self) -> Result<(), AppError> {
        match self.state {
            TransportState::Playing => {
                self.element.pause()?;
                self.state = TransportState::Paused;
                Ok(())
            }
            TransportState::Paused => Ok(()),
            other => Err(AppError::Playback(format!(
                "cannot pause from {other:?} state"
            ))),
        }
    }

    /// Move the playhead. Only allowed once duration is known; the target
    /// is clamped to `[0, duration]`. Play/pause state is unchanged.
    pub fn seek(&mut self, position: f64) -> Result<(), AppError> {
        if !matches!(self.state, TransportState::Paused | TransportState::Playing) {
            return Err(AppError::Playback(format!(
                "cannot seek from {:?} state",
                self.state
            )));
        }
        if !position.is_finite() {
            return Err(AppError::Validation("seek position must be finite".into()));
        }
        let clamped = position.clamp(0.0, self.duration_seconds);
        self.element.seek(clamped)?;
        self.position_seconds = clamped;
        Ok(())
    }

    /// Set the volume. Allowed whenever a source is bound; values outside
    /// `[0.0, 1.0]` are rejected and leave the prior volume in place.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), AppError> {
        if !self.state.is_bound() {
            return Err(AppError::Playback(
                "no source bound, cannot set volume".into(),
            ));
        }
        if !(0.0..=1.0).contains(&volume) || volume.is_nan() {
            return Err(AppError::Validation(format!(
                "volume must be within [0.0, 1.0], got {volume}"
            )));
        }
        self.element.set_volume(volume)?;
        self.volume = volume;
        Ok(())
    }

    fn teardown(&mut self) {
        if self.state != TransportState::Idle {
            self.element.unbind();
        }
        self.state = TransportState::Idle;
        self.record = None;
        self.resolved = None;
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
    }
}
