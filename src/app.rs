use crate::commands::{self, Intent, HELP};
use crate::config::ClientConfig;
use crate::coordinator::{event_channel, ClientEvent, Coordinator, EventReceiver};
use crate::error::ConfigError;
use crate::peer::connection::WebRtcTransportFactory;
use crate::peer::negotiator::TransportNegotiator;
use crate::peer::track::{RtpStatsSurface, TrackAttacher};
use crate::signaling::HttpSignaling;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use webrtc::track::track_remote::TrackRemote;

/// Wires the components together and reads intents from stdin until EOF or `quit`
pub async fn run(config: ClientConfig) -> Result<(), ConfigError> {
    let ice_servers = config.load_ice_servers()?;
    let signaling = Arc::new(HttpSignaling::from_config(&config)?);
    info!(
        "Signaling server {} ({} ICE servers)",
        signaling.base_url(),
        ice_servers.len()
    );

    let (events, rx) = event_channel();
    let surface = Arc::new(RtpStatsSurface::new(events.clone()));
    let attacher: Arc<TrackAttacher<Arc<TrackRemote>>> = Arc::new(TrackAttacher::new(surface));
    let factory = Arc::new(WebRtcTransportFactory::new(ice_servers, attacher));
    let coordinator = Arc::new(Coordinator::new(
        signaling,
        TransportNegotiator::new(factory),
        events,
    ));

    tokio::spawn(print_events(rx));

    println!("{HELP}");
    commands::dispatch(&coordinator, Intent::Refresh);

    read_intents(BufReader::new(tokio::io::stdin()), |intent| {
        commands::dispatch(&coordinator, intent)
    })
    .await;

    info!("Bye");
    Ok(())
}

/// Feeds parsed intents to `on_intent` until EOF, `quit` or a read error.
/// A line that is not UTF-8 is skipped.
async fn read_intents<R>(reader: R, mut on_intent: impl FnMut(Intent))
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping unreadable input line: {}", e);
                continue;
            }
            Err(e) => {
                error!("Reading stdin failed, exiting: {}", e);
                break;
            }
        };
        match commands::parse(&line) {
            None => continue,
            Some(Err(msg)) => println!("{msg}"),
            Some(Ok(Intent::Quit)) => break,
            Some(Ok(intent)) => on_intent(intent),
        }
    }
}

async fn print_events(mut rx: EventReceiver) {
    while let Some(event) = rx.recv().await {
        print!("[{}] ", chrono::Local::now().format("%H:%M:%S"));
        match event {
            ClientEvent::Connected { session_id } => println!("connected: session {session_id}"),
            ClientEvent::RoomsRendered(view) => {
                println!("rooms:");
                print!("{view}");
                if !view.switch_enabled() && !view.is_empty() {
                    println!("(connect to switch rooms)");
                }
            }
            ClientEvent::RoomCreated { id, port } => println!(
                "room created: {} port {}",
                id.as_deref().unwrap_or("?"),
                port.map(|p| p.to_string()).unwrap_or_else(|| "?".into())
            ),
            ClientEvent::SwitchRequested { room_id } => println!("switching to {room_id}"),
            ClientEvent::TrackAttached { track_id } => println!("video attached: {track_id}"),
            ClientEvent::TrackEnded {
                track_id,
                packets,
                bytes,
            } => println!("video ended: {track_id} ({packets} packets, {bytes} bytes)"),
            ClientEvent::Error(msg) => println!("error: {msg}"),
        }
    }
}
