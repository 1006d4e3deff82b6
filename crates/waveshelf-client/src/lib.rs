//! Waveshelf Client Library
//!
//! The client-side core of the audio library: the upload pipeline
//! (validate, probe, blob write, metadata insert, compensating delete), the
//! playback transport state machine, the library view owning a user's
//! record set, and the session lifecycle. Everything talks to the backend
//! through the collaborator traits in `waveshelf-core` and
//! `waveshelf-storage`, so any backend crate (or an in-memory fake) can
//! stand behind it.

pub mod library;
pub mod manager;
pub mod player;
pub mod session;
pub mod upload;

pub use library::AudioLibrary;
pub use manager::AudioManager;
pub use player::{MediaElement, MediaEvent, PlaybackTransport, TransportState};
pub use session::{SessionManager, SessionState};
pub use upload::{CandidateFile, DurationProbe, NoOpUploadObserver, UploadObserver, UploadPipeline};
