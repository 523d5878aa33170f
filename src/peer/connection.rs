use crate::error::NegotiationError;
use crate::logger::dump_selected_pair;
use crate::peer::track::TrackAttacher;
use crate::peer::transport::{PeerTransport, TransportFactory};
use crate::peer::types::{IncomingTrack, SdpKind, ServerConfig, SessionDescription, TrackKind};
use crate::utils::add_ice_url_scheme;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_gatherer_state::RTCIceGathererState;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::track::track_remote::TrackRemote;
use webrtc::{
    api::APIBuilder,
    ice_transport::ice_server::RTCIceServer,
    peer_connection::{
        configuration::RTCConfiguration, peer_connection_state::RTCPeerConnectionState,
        sdp::session_description::RTCSessionDescription, RTCPeerConnection,
    },
};

/// Builds receive-only video peers; every peer shares one track attacher
pub struct WebRtcTransportFactory {
    ice_servers: Vec<ServerConfig>,
    attacher: Arc<TrackAttacher<Arc<TrackRemote>>>,
}

impl WebRtcTransportFactory {
    pub fn new(
        ice_servers: Vec<ServerConfig>,
        attacher: Arc<TrackAttacher<Arc<TrackRemote>>>,
    ) -> Self {
        Self {
            ice_servers,
            attacher,
        }
    }
}

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn open(&self) -> Result<Arc<dyn PeerTransport>, NegotiationError> {
        let pc = new_peer(&self.ice_servers, self.attacher.clone()).await?;
        Ok(Arc::new(WebRtcTransport { pc }))
    }
}

/// A live webrtc-rs peer connection
pub struct WebRtcTransport {
    pc: Arc<RTCPeerConnection>,
}

#[async_trait]
impl PeerTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .map_err(|e| NegotiationError::Offer(e.to_string()))?;
        from_rtc(offer).ok_or_else(|| NegotiationError::Offer("unexpected sdp type".into()))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        let desc = to_rtc(desc).map_err(NegotiationError::LocalDescription)?;
        self.pc
            .set_local_description(desc)
            .await
            .map_err(|e| NegotiationError::LocalDescription(e.to_string()))
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError> {
        let desc = to_rtc(desc).map_err(NegotiationError::RemoteDescription)?;
        self.pc
            .set_remote_description(desc)
            .await
            .map_err(|e| NegotiationError::RemoteDescription(e.to_string()))
    }

    async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            warn!("Error while closing peer connection: {}", e);
        }
    }
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, String> {
    let built = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp),
        SdpKind::Pranswer => RTCSessionDescription::pranswer(desc.sdp),
        SdpKind::Rollback => return Err("rollback descriptions are not supported".into()),
    };
    built.map_err(|e| e.to_string())
}

fn from_rtc(desc: RTCSessionDescription) -> Option<SessionDescription> {
    let kind = match desc.sdp_type {
        RTCSdpType::Offer => SdpKind::Offer,
        RTCSdpType::Answer => SdpKind::Answer,
        RTCSdpType::Pranswer => SdpKind::Pranswer,
        RTCSdpType::Rollback => SdpKind::Rollback,
        RTCSdpType::Unspecified => return None,
    };
    Some(SessionDescription {
        kind,
        sdp: desc.sdp,
    })
}

/// Creates the peer: one recvonly video transceiver, track and state handlers
pub async fn new_peer(
    ice_servers: &[ServerConfig],
    attacher: Arc<TrackAttacher<Arc<TrackRemote>>>,
) -> Result<Arc<RTCPeerConnection>, NegotiationError> {
    let mut media_engine = MediaEngine::default();
    media_engine
        .register_default_codecs()
        .map_err(|e| NegotiationError::Transport(format!("failed to register codecs: {e}")))?;

    let registry = register_default_interceptors(Registry::new(), &mut media_engine)
        .map_err(|e| NegotiationError::Transport(format!("failed to register interceptors: {e}")))?;

    let api = APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .build();

    let pc = Arc::new(
        api.new_peer_connection(rtc_config(ice_servers))
            .await
            .map_err(|e| NegotiationError::Transport(e.to_string()))?,
    );

    // receive video only: no local capture, no audio m-line
    pc.add_transceiver_from_kind(
        RTPCodecType::Video,
        Some(RTCRtpTransceiverInit {
            direction: RTCRtpTransceiverDirection::Recvonly,
            send_encodings: vec![],
        }),
    )
    .await
    .map_err(|e| NegotiationError::Transport(e.to_string()))?;

    pc.on_track(Box::new(move |track: Arc<TrackRemote>, _receiver, _transceiver| {
        let incoming = IncomingTrack {
            id: track.id(),
            stream_id: track.stream_id(),
            kind: match track.kind() {
                RTPCodecType::Video => TrackKind::Video,
                RTPCodecType::Audio => TrackKind::Audio,
                _ => TrackKind::Other,
            },
        };
        attacher.on_track(incoming, track);
        Box::pin(async {})
    }));

    pc.on_ice_gathering_state_change(Box::new(move |state: RTCIceGathererState| {
        info!("iceGatheringState {:?}", state);
        if state == RTCIceGathererState::Complete {
            // nothing to do yet: the offer was already sent with whatever was gathered
        }
        Box::pin(async {})
    }));

    let pc_stats = Arc::downgrade(&pc);
    pc.on_peer_connection_state_change(Box::new(move |st: RTCPeerConnectionState| {
        info!("Peer connection state changed to: {:?}", st);
        match st {
            RTCPeerConnectionState::Connected => {
                if let Some(pc) = pc_stats.upgrade() {
                    tokio::spawn(async move {
                        dump_selected_pair(&pc, "CONNECTED").await;
                    });
                }
            }
            RTCPeerConnectionState::Failed | RTCPeerConnectionState::Disconnected => {
                warn!("Peer connection {:?}; no reconnect is attempted", st);
            }
            _ => debug!("Peer connection state: {:?} - ignoring", st),
        }
        Box::pin(async {})
    }));

    Ok(pc)
}

fn rtc_config(servers: &[ServerConfig]) -> RTCConfiguration {
    RTCConfiguration {
        ice_servers: get_user_ice_servers(servers),
        ..Default::default()
    }
}

/// Converts config entries to webrtc-rs ICE servers
pub fn get_user_ice_servers(servers: &[ServerConfig]) -> Vec<RTCIceServer> {
    servers
        .iter()
        .map(|config| RTCIceServer {
            urls: vec![add_ice_url_scheme(config)],
            username: config.username.clone().unwrap_or_default(),
            credential: config.credential.clone().unwrap_or_default(),
        })
        .collect()
}
