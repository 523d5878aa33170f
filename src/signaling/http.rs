use super::{
    CreateRoomRequest, CreateSessionRequest, CreatedSession, ListRoomsResponse, RoomDescriptor,
    RoomEntry, SignalingApi, SwitchRequest, PATH_CREATE_ROOM, PATH_CREATE_SESSION,
    PATH_LIST_ROOMS, PATH_SWITCH,
};
use crate::config::ClientConfig;
use crate::error::{ConfigError, SignalingError};
use crate::peer::types::SessionDescription;
use crate::session::SessionId;
use crate::utils::endpoint_url;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// `SignalingApi` over HTTP/JSON
pub struct HttpSignaling {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSignaling {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.signaling_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &'static str,
        body: &B,
    ) -> Result<R, SignalingError> {
        let url = endpoint_url(&self.base_url, path);
        debug!("POST {}", url);
        let request = self.client.post(&url).json(body);
        self.send(path, request).await
    }

    async fn get<R: DeserializeOwned>(&self, path: &'static str) -> Result<R, SignalingError> {
        let url = endpoint_url(&self.base_url, path);
        debug!("GET {}", url);
        let request = self.client.get(&url);
        self.send(path, request).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        path: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<R, SignalingError> {
        let response = request
            .send()
            .await
            .map_err(|source| SignalingError::Transport { path, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| SignalingError::Transport { path, source })?;

        if !status.is_success() {
            return Err(SignalingError::Status {
                path,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| SignalingError::Decode {
            path,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SignalingApi for HttpSignaling {
    async fn create_session(
        &self,
        offer: &SessionDescription,
    ) -> Result<CreatedSession, SignalingError> {
        self.post(PATH_CREATE_SESSION, &CreateSessionRequest { offer })
            .await
    }

    async fn create_room(&self) -> Result<RoomDescriptor, SignalingError> {
        self.post(PATH_CREATE_ROOM, &CreateRoomRequest::default())
            .await
    }

    async fn switch_room(&self, session: &SessionId, room_id: &str) -> Result<(), SignalingError> {
        // body is acknowledged but must still be JSON
        let _: serde_json::Value = self
            .post(
                PATH_SWITCH,
                &SwitchRequest {
                    peer_connection_id: session.as_str(),
                    room_id,
                },
            )
            .await?;
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<RoomEntry>, SignalingError> {
        let response: ListRoomsResponse = self.get(PATH_LIST_ROOMS).await?;
        Ok(response.rooms)
    }
}
