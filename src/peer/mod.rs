pub mod connection;
pub mod negotiator;
pub mod track;
pub mod transport;
pub mod types;

pub use negotiator::TransportNegotiator;
pub use transport::{PeerTransport, TransportFactory};
pub use types::{IncomingTrack, SdpKind, ServerConfig, SessionDescription, TrackKind};
