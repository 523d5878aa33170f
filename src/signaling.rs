//! Typed client for the relay's four signaling endpoints.
//!
//! Every call is a single request/response, issued only because the user asked
//! for it. Nothing is retried or cached here.

pub mod http;

use crate::error::SignalingError;
use crate::peer::types::SessionDescription;
use crate::session::SessionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpSignaling;

pub const PATH_CREATE_SESSION: &str = "pc";
pub const PATH_CREATE_ROOM: &str = "room";
pub const PATH_SWITCH: &str = "switch";
pub const PATH_LIST_ROOMS: &str = "rooms";

#[async_trait]
pub trait SignalingApi: Send + Sync {
    /// `POST /pc`: hand over the local offer, get the session id and answer
    async fn create_session(
        &self,
        offer: &SessionDescription,
    ) -> Result<CreatedSession, SignalingError>;

    /// `POST /room`
    async fn create_room(&self) -> Result<RoomDescriptor, SignalingError>;

    /// `POST /switch`: point the session at another room
    async fn switch_room(&self, session: &SessionId, room_id: &str) -> Result<(), SignalingError>;

    /// `GET /rooms`, entries in server order
    async fn list_rooms(&self) -> Result<Vec<RoomEntry>, SignalingError>;
}

/// ========  WIRE TYPES  =========

#[derive(Serialize, Debug)]
pub struct CreateSessionRequest<'a> {
    pub offer: &'a SessionDescription,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub id: SessionId,
    pub answer: SessionDescription,
}

#[derive(Serialize, Debug, Default)]
pub struct CreateRoomRequest {}

/// What `/room` answers with; only logged
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub port: Option<i64>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRequest<'a> {
    pub peer_connection_id: &'a str,
    pub room_id: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct ListRoomsResponse {
    pub rooms: Vec<RoomEntry>,
}

/// One room as sent by the server, unvalidated. Field checks happen when the
/// list is rendered so a single bad entry does not sink the whole refresh.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RoomEntry {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub port: Option<serde_json::Value>,
    #[serde(default)]
    pub participants: Option<serde_json::Value>,
}
