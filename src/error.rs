use thiserror::Error;

/// Failure talking to the signaling server.
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Request never produced a response (connect, timeout, reset).
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} answered HTTP {status}: {body}")]
    Status {
        path: &'static str,
        status: u16,
        body: String,
    },

    /// Response arrived but its body is not the expected JSON.
    #[error("malformed response from {path}: {reason}")]
    Decode { path: &'static str, reason: String },
}

/// Failure while building or finishing the offer/answer exchange.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("failed to build peer connection: {0}")]
    Transport(String),

    #[error("failed to create offer: {0}")]
    Offer(String),

    #[error("failed to apply local description: {0}")]
    LocalDescription(String),

    #[error("failed to apply remote description: {0}")]
    RemoteDescription(String),

    #[error("session round trip failed: {0}")]
    Signaling(#[from] SignalingError),
}

/// A room entry from `/rooms` that cannot be displayed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("room entry #{index} has no {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("room entry #{index} has invalid {field}: {found}")]
    InvalidField {
        index: usize,
        field: &'static str,
        found: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read ICE server file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse ICE server file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("ICE server {id}: {reason}")]
    Invalid { id: String, reason: &'static str },

    #[error("signaling url must start with http:// or https://, got {0}")]
    BadServerUrl(String),

    #[error("request timeout must be at least one second")]
    ZeroTimeout,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Everything a user intent can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error("already connected as session {0}")]
    AlreadyConnected(String),

    #[error("a connect is already in progress")]
    ConnectInProgress,

    #[error("switch unavailable: no session")]
    SwitchUnavailable,

    #[error("no room at position {0}")]
    UnknownRoom(usize),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
