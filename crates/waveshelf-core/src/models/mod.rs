//! Domain models shared across Waveshelf components.

pub mod audio;
pub mod user;

pub use audio::{AudioFileRecord, NewAudioFile};
pub use user::{Session, User};
