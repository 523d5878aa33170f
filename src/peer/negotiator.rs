use crate::error::NegotiationError;
use crate::peer::transport::{PeerTransport, TransportFactory};
use crate::peer::types::SessionDescription;
use crate::session::Session;
use crate::signaling::{CreatedSession, SignalingApi};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the offer/answer exchange against the signaling server.
pub struct TransportNegotiator {
    factory: Arc<dyn TransportFactory>,
}

impl TransportNegotiator {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self { factory }
    }

    /// Builds a transport, sends its offer and applies the server's answer.
    ///
    /// Order is fixed: local description, then `/pc`, then remote description.
    /// Nothing here is retried. A failed attempt closes its transport before
    /// the error is returned.
    pub async fn create_session(
        &self,
        signaling: &dyn SignalingApi,
    ) -> Result<Session, NegotiationError> {
        let transport = self.factory.open().await?;

        match exchange(transport.as_ref(), signaling).await {
            Ok((offer, created)) => Ok(Session {
                id: created.id,
                local_description: offer,
                remote_description: created.answer,
                transport,
            }),
            Err(e) => {
                warn!("Negotiation failed, closing transport: {}", e);
                transport.close().await;
                Err(e)
            }
        }
    }
}

async fn exchange(
    transport: &dyn PeerTransport,
    signaling: &dyn SignalingApi,
) -> Result<(SessionDescription, CreatedSession), NegotiationError> {
    let offer = transport.create_offer().await?;
    transport.set_local_description(offer.clone()).await?;
    info!("Local offer applied, {} bytes of SDP", offer.sdp.len());

    let created = signaling.create_session(&offer).await?;
    info!("Server assigned session {}", created.id);

    transport
        .set_remote_description(created.answer.clone())
        .await?;
    Ok((offer, created))
}
