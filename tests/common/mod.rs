#![allow(dead_code)]

use async_trait::async_trait;
use relay_viewer_lib::coordinator::{event_channel, ClientEvent, Coordinator, EventReceiver};
use relay_viewer_lib::error::{NegotiationError, SignalingError};
use relay_viewer_lib::peer::{
    PeerTransport, SessionDescription, TransportFactory, TransportNegotiator,
};
use relay_viewer_lib::session::SessionId;
use relay_viewer_lib::signaling::{CreatedSession, RoomDescriptor, RoomEntry, SignalingApi};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Ordered record of every call across transport and signaling mocks
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.lock().unwrap().iter().any(|e| e == entry)
    }
}

fn server_error(path: &'static str) -> SignalingError {
    SignalingError::Status {
        path,
        status: 500,
        body: "boom".into(),
    }
}

pub struct MockSignaling {
    pub log: CallLog,
    pub session_ids: Mutex<Vec<&'static str>>,
    pub rooms: Mutex<Vec<RoomEntry>>,
    pub switches: Mutex<Vec<(String, String)>>,
    pub fail_session: AtomicBool,
    pub fail_create_room: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_switch: AtomicBool,
    /// when set, `create_session` waits for a permit before answering
    pub session_gate: Option<Arc<Notify>>,
}

impl MockSignaling {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            session_ids: Mutex::new(vec!["sess-1"]),
            rooms: Mutex::new(Vec::new()),
            switches: Mutex::new(Vec::new()),
            fail_session: AtomicBool::new(false),
            fail_create_room: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            fail_switch: AtomicBool::new(false),
            session_gate: None,
        }
    }

    pub fn with_rooms(self, rooms: serde_json::Value) -> Self {
        *self.rooms.lock().unwrap() = serde_json::from_value(rooms).unwrap();
        self
    }

    pub fn switches(&self) -> Vec<(String, String)> {
        self.switches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalingApi for MockSignaling {
    async fn create_session(
        &self,
        offer: &SessionDescription,
    ) -> Result<CreatedSession, SignalingError> {
        self.log.push("create_session");
        if let Some(gate) = &self.session_gate {
            gate.notified().await;
        }
        if self.fail_session.load(Ordering::SeqCst) {
            return Err(server_error("pc"));
        }
        let id = {
            let mut ids = self.session_ids.lock().unwrap();
            if ids.len() > 1 {
                ids.remove(0)
            } else {
                ids[0]
            }
        };
        Ok(CreatedSession {
            id: SessionId::new(id),
            answer: SessionDescription::answer(format!("answer-to:{}", offer.sdp)),
        })
    }

    async fn create_room(&self) -> Result<RoomDescriptor, SignalingError> {
        self.log.push("create_room");
        if self.fail_create_room.load(Ordering::SeqCst) {
            return Err(server_error("room"));
        }
        Ok(RoomDescriptor {
            id: Some("new-room".into()),
            port: Some(5004),
        })
    }

    async fn switch_room(&self, session: &SessionId, room_id: &str) -> Result<(), SignalingError> {
        self.log.push("switch_room");
        self.switches
            .lock()
            .unwrap()
            .push((session.to_string(), room_id.to_string()));
        if self.fail_switch.load(Ordering::SeqCst) {
            return Err(server_error("switch"));
        }
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<RoomEntry>, SignalingError> {
        self.log.push("list_rooms");
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error("rooms"));
        }
        Ok(self.rooms.lock().unwrap().clone())
    }
}

pub struct MockTransport {
    log: CallLog,
    fail_offer: bool,
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        self.log.push("create_offer");
        if self.fail_offer {
            return Err(NegotiationError::Offer("no codecs".into()));
        }
        Ok(SessionDescription::offer("mock-offer"))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        self.log.push(format!("set_local:{}", desc.sdp));
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError> {
        self.log.push(format!("set_remote:{}", desc.sdp));
        Ok(())
    }

    async fn close(&self) {
        self.log.push("close");
    }
}

pub struct MockFactory {
    pub log: CallLog,
    pub opened: AtomicUsize,
    pub fail_offer: AtomicBool,
}

impl MockFactory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            opened: AtomicUsize::new(0),
            fail_offer: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl TransportFactory for MockFactory {
    async fn open(&self) -> Result<Arc<dyn PeerTransport>, NegotiationError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.log.push("open");
        Ok(Arc::new(MockTransport {
            log: self.log.clone(),
            fail_offer: self.fail_offer.load(Ordering::SeqCst),
        }))
    }
}

pub struct Harness {
    pub log: CallLog,
    pub signaling: Arc<MockSignaling>,
    pub factory: Arc<MockFactory>,
    pub coordinator: Arc<Coordinator>,
    pub events: EventReceiver,
}

impl Harness {
    pub fn new(configure: impl FnOnce(MockSignaling) -> MockSignaling) -> Self {
        let log = CallLog::default();
        let signaling = Arc::new(configure(MockSignaling::new(log.clone())));
        let factory = Arc::new(MockFactory::new(log.clone()));
        let (tx, events) = event_channel();
        let coordinator = Arc::new(Coordinator::new(
            signaling.clone(),
            TransportNegotiator::new(factory.clone()),
            tx,
        ));
        Self {
            log,
            signaling,
            factory,
            coordinator,
            events,
        }
    }

    pub fn drain_events(&mut self) -> Vec<ClientEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }
}
