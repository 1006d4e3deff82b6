mod element;
mod transport;

pub use element::{MediaElement, MediaEvent};
pub use transport::{PlaybackTransport, TransportState};
