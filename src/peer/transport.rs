use crate::error::NegotiationError;
use crate::peer::types::SessionDescription;
use async_trait::async_trait;
use std::sync::Arc;

/// The local half of one offer/answer exchange.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Offer asking to receive video and nothing else
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError>;

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError>;

    /// Tears the transport down and releases its sockets
    async fn close(&self);
}

/// Builds a fresh transport, with its inbound track subscription already
/// registered.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn PeerTransport>, NegotiationError>;
}
