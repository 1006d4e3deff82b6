//! Upload pipeline: validate -> probe -> blob write -> metadata insert,
//! with a compensating blob delete when the insert fails.

pub mod observer;
pub mod pipeline;
pub mod probe;

pub use observer::{NoOpUploadObserver, UploadObserver};
pub use pipeline::{CandidateFile, UploadPipeline};
pub use probe::{DurationProbe, LoftyDurationProbe};
