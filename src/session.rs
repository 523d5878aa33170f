use crate::peer::transport::PeerTransport;
use crate::peer::types::SessionDescription;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Server-assigned id of the negotiated peer connection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The one negotiated transport. Holding it keeps the peer connection and its
/// track subscription alive.
pub struct Session {
    pub id: SessionId,
    pub local_description: SessionDescription,
    pub remote_description: SessionDescription,
    pub transport: Arc<dyn PeerTransport>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("local_description", &self.local_description.kind)
            .field("remote_description", &self.remote_description.kind)
            .finish_non_exhaustive()
    }
}
