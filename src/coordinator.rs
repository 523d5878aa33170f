//! Session coordinator: owns the one session id and runs user intents.
//!
//! State is `Absent -> Connecting -> Present`, with `Connecting` falling back to
//! `Absent` on failure. There is no way back from `Present`. Intents never wait
//! on each other; the lock below is only held between awaits.

use crate::error::{ClientError, Result};
use crate::peer::negotiator::TransportNegotiator;
use crate::session::{Session, SessionId};
use crate::signaling::SignalingApi;
use crate::view::RoomListView;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// What the front end gets told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Connected { session_id: SessionId },
    RoomsRendered(RoomListView),
    RoomCreated { id: Option<String>, port: Option<i64> },
    SwitchRequested { room_id: String },
    TrackAttached { track_id: String },
    TrackEnded { track_id: String, packets: u64, bytes: u64 },
    Error(String),
}

pub type EventSender = mpsc::UnboundedSender<ClientEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

enum SessionState {
    Absent,
    Connecting,
    Present(Session),
}

pub struct Coordinator {
    signaling: Arc<dyn SignalingApi>,
    negotiator: TransportNegotiator,
    state: Mutex<SessionState>,
    view: Mutex<RoomListView>,
    events: EventSender,
}

impl Coordinator {
    pub fn new(
        signaling: Arc<dyn SignalingApi>,
        negotiator: TransportNegotiator,
        events: EventSender,
    ) -> Self {
        Self {
            signaling,
            negotiator,
            state: Mutex::new(SessionState::Absent),
            view: Mutex::new(RoomListView::default()),
            events,
        }
    }

    /// Current session id; `None` until a connect has succeeded
    pub fn session_id(&self) -> Option<SessionId> {
        match &*self.state() {
            SessionState::Present(session) => Some(session.id.clone()),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session_id().is_some()
    }

    /// Last rendered room list
    pub fn view(&self) -> RoomListView {
        lock(&self.view).clone()
    }

    /// Negotiates the one session this client will ever have, then refreshes
    /// the list so switch targets show up.
    pub async fn connect(&self) -> Result<SessionId> {
        let rejected = {
            let mut state = self.state();
            let rejected = match &*state {
                SessionState::Present(session) => {
                    Some(ClientError::AlreadyConnected(session.id.to_string()))
                }
                SessionState::Connecting => Some(ClientError::ConnectInProgress),
                SessionState::Absent => None,
            };
            if rejected.is_none() {
                *state = SessionState::Connecting;
            }
            rejected
        };
        if let Some(e) = rejected {
            warn!("Connect rejected: {}", e);
            self.emit(ClientEvent::Error(format!("connect rejected: {e}")));
            return Err(e);
        }

        info!("Connecting");
        let session = match self
            .negotiator
            .create_session(self.signaling.as_ref())
            .await
        {
            Ok(session) => session,
            Err(e) => {
                *self.state() = SessionState::Absent;
                error!("Connect failed: {}", e);
                self.emit(ClientEvent::Error(format!("connect failed: {e}")));
                return Err(e.into());
            }
        };

        let id = session.id.clone();
        *self.state() = SessionState::Present(session);
        info!("Connected as session {}", id);
        self.emit(ClientEvent::Connected {
            session_id: id.clone(),
        });

        if let Err(e) = self.refresh().await {
            warn!("Room refresh after connect failed: {}", e);
        }
        Ok(id)
    }

    /// Creates a room on the server, then refreshes the list
    pub async fn create_room(&self) -> Result<RoomListView> {
        let room = match self.signaling.create_room().await {
            Ok(room) => room,
            Err(e) => {
                error!("Create room failed: {}", e);
                self.emit(ClientEvent::Error(format!("create room failed: {e}")));
                return Err(e.into());
            }
        };
        info!("Room created: id={:?} port={:?}", room.id, room.port);
        self.emit(ClientEvent::RoomCreated {
            id: room.id,
            port: room.port,
        });

        self.refresh().await
    }

    /// Replaces the room list with a fresh server snapshot
    pub async fn refresh(&self) -> Result<RoomListView> {
        let entries = match self.signaling.list_rooms().await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Listing rooms failed: {}", e);
                self.emit(ClientEvent::Error(format!("refresh failed: {e}")));
                return Err(e.into());
            }
        };

        // switch affordances follow the session state at render time
        let view = RoomListView::build(&entries, self.is_connected());
        *lock(&self.view) = view.clone();
        self.emit(ClientEvent::RoomsRendered(view.clone()));
        Ok(view)
    }

    /// Asks the server to move this session into `room_id`.
    ///
    /// The request runs on its own task; its outcome is only logged. Without
    /// a session nothing is sent.
    pub fn switch(&self, room_id: &str) -> Result<JoinHandle<()>> {
        let Some(session_id) = self.session_id() else {
            warn!("Switch to {} ignored: not connected", room_id);
            return Err(ClientError::SwitchUnavailable);
        };

        info!("Switch to {}", room_id);
        self.emit(ClientEvent::SwitchRequested {
            room_id: room_id.to_string(),
        });

        let signaling = self.signaling.clone();
        let events = self.events.clone();
        let room_id = room_id.to_string();
        Ok(tokio::spawn(async move {
            if let Err(e) = signaling.switch_room(&session_id, &room_id).await {
                error!("Switch to {} failed: {}", room_id, e);
                let _ = events.send(ClientEvent::Error(format!("switch failed: {e}")));
            }
        }))
    }

    /// Switch by 1-based position in the last rendered list
    pub fn switch_to_position(&self, position: usize) -> Result<JoinHandle<()>> {
        if !self.is_connected() {
            return Err(ClientError::SwitchUnavailable);
        }
        let room_id = lock(&self.view)
            .room_at(position)
            .map(|r| r.id.clone())
            .ok_or(ClientError::UnknownRoom(position))?;
        self.switch(&room_id)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.state)
    }

    fn emit(&self, event: ClientEvent) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
