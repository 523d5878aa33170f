use crate::error::ConfigError;
use crate::peer::types::ServerConfig;
use crate::utils::add_ice_url_scheme;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// Logging is on by default in debug builds only; `--log` turns it on in release.

#[cfg(debug_assertions)]
pub const LOGGING_ENABLED: bool = true;

#[cfg(not(debug_assertions))]
pub const LOGGING_ENABLED: bool = false;

pub const DEFAULT_SIGNALING_URL: &str = "http://localhost:3000";

/// Receive-only viewer for a multi-room relay
#[derive(Parser, Debug, Clone)]
#[command(name = "relay-viewer", version, about)]
pub struct ClientConfig {
    /// Signaling server base url
    #[arg(long = "server", env = "RELAY_SIGNALING_URL", default_value = DEFAULT_SIGNALING_URL)]
    pub signaling_url: String,

    /// JSON file with an array of ICE servers
    #[arg(long = "ice-servers", env = "RELAY_ICE_SERVERS")]
    pub ice_servers_file: Option<PathBuf>,

    /// HTTP request timeout, seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// tracing filter, e.g. `info` or `relay_viewer_lib=debug`
    #[arg(long = "log")]
    pub log_filter: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.into(),
            ice_servers_file: None,
            timeout_secs: 30,
            log_filter: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.signaling_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::BadServerUrl(url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Reads and validates the ICE server file; no file means no ICE servers
    pub fn load_ice_servers(&self) -> Result<Vec<ServerConfig>, ConfigError> {
        match &self.ice_servers_file {
            Some(path) => load_ice_servers(path),
            None => Ok(Vec::new()),
        }
    }
}

pub fn load_ice_servers(path: &std::path::Path) -> Result<Vec<ServerConfig>, ConfigError> {
    let shown = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let servers: Vec<ServerConfig> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: shown,
            source,
        })?;
    validate_ice_servers(servers)
}

/// Same rules the connect path relies on: non-empty url, TURN needs credentials
pub fn validate_ice_servers(servers: Vec<ServerConfig>) -> Result<Vec<ServerConfig>, ConfigError> {
    tracing::debug!("Validating {} ICE servers", servers.len());

    servers
        .into_iter()
        .map(|mut server| {
            if server.url.is_empty() {
                return Err(ConfigError::Invalid {
                    id: server.id,
                    reason: "url cannot be empty",
                });
            }
            if server.r#type != "stun" && server.r#type != "turn" {
                return Err(ConfigError::Invalid {
                    id: server.id,
                    reason: "type must be 'stun' or 'turn'",
                });
            }
            if server.r#type == "turn" && (server.username.is_none() || server.credential.is_none())
            {
                return Err(ConfigError::Invalid {
                    id: server.id,
                    reason: "TURN servers require username and credential",
                });
            }
            server.url = add_ice_url_scheme(&server);
            Ok(server)
        })
        .collect()
}
