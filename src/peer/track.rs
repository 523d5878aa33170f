use crate::coordinator::{ClientEvent, EventSender};
use crate::peer::types::{IncomingTrack, TrackKind};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use webrtc::track::track_remote::TrackRemote;

/// Where attached video ends up.
pub trait RenderSurface<T>: Send + Sync {
    fn attach_video(&self, track: &IncomingTrack, media: T);
}

/// Single handler behind the transport's `on_track` subscription.
///
/// Video tracks reach the surface once per track id; everything else is
/// dropped.
pub struct TrackAttacher<T> {
    surface: Arc<dyn RenderSurface<T>>,
    attached: Mutex<HashSet<String>>,
}

impl<T> TrackAttacher<T> {
    pub fn new(surface: Arc<dyn RenderSurface<T>>) -> Self {
        Self {
            surface,
            attached: Mutex::new(HashSet::new()),
        }
    }

    /// Returns whether the track was handed to the surface
    pub fn on_track(&self, track: IncomingTrack, media: T) -> bool {
        if track.kind != TrackKind::Video {
            debug!("Ignoring {:?} track {}", track.kind, track.id);
            return false;
        }

        let first = match self.attached.lock() {
            Ok(mut seen) => seen.insert(track.id.clone()),
            Err(poisoned) => poisoned.into_inner().insert(track.id.clone()),
        };
        if !first {
            debug!("Track {} already attached", track.id);
            return false;
        }

        self.surface.attach_video(&track, media);
        info!("track attached: {} (stream {})", track.id, track.stream_id);
        true
    }

    pub fn attached_count(&self) -> usize {
        match self.attached.lock() {
            Ok(seen) => seen.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// Terminal "video element": drains RTP from each track and reports how much
/// arrived once the track ends.
pub struct RtpStatsSurface {
    events: EventSender,
}

impl RtpStatsSurface {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

const REPORT_EVERY: u64 = 500;

/// Received totals for one track
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RtpTally {
    packets: u64,
    bytes: u64,
}

impl RtpTally {
    /// Counts one packet; true when a progress line is due
    fn record(&mut self, payload_len: usize) -> bool {
        self.packets += 1;
        self.bytes += payload_len as u64;
        self.packets % REPORT_EVERY == 0
    }
}

fn report_end(events: &EventSender, track_id: String, tally: RtpTally) {
    info!(
        "track {} ended after {} packets, {} bytes",
        track_id, tally.packets, tally.bytes
    );
    let _ = events.send(ClientEvent::TrackEnded {
        track_id,
        packets: tally.packets,
        bytes: tally.bytes,
    });
}

impl RenderSurface<Arc<TrackRemote>> for RtpStatsSurface {
    fn attach_video(&self, track: &IncomingTrack, media: Arc<TrackRemote>) {
        let _ = self.events.send(ClientEvent::TrackAttached {
            track_id: track.id.clone(),
        });

        let events = self.events.clone();
        let track_id = track.id.clone();
        tokio::spawn(async move {
            let mut tally = RtpTally::default();
            loop {
                match media.read_rtp().await {
                    Ok((pkt, _)) => {
                        if tally.record(pkt.payload.len()) {
                            debug!(
                                "track {}: {} packets, {} bytes",
                                track_id, tally.packets, tally.bytes
                            );
                        }
                    }
                    Err(e) => {
                        debug!("track {} read stopped: {}", track_id, e);
                        break;
                    }
                }
            }
            report_end(&events, track_id, tally);
        });
    }
}
