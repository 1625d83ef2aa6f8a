//! Client configuration.
//!
//! Defaults can be overridden from a TOML document and, for the socket
//! path, from the `LLDPCTL_SOCKET` environment variable.

use std::ffi::OsString;
use std::path::PathBuf;

use lldp_protocol::{HEADER_LEN, MAX_PAYLOAD_LEN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default path of the daemon control socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/lldpd.socket";

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "LLDPCTL_SOCKET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of a client connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Unix socket the daemon listens on
    pub socket_path: PathBuf,

    /// Bytes requested from the transport per receive call
    pub recv_chunk_size: usize,

    /// Largest response frame accepted, header included
    pub max_message_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            recv_chunk_size: 4096,
            max_message_size: HEADER_LEN + MAX_PAYLOAD_LEN,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the socket path taken from `LLDPCTL_SOCKET` when set.
    pub fn from_env() -> Self {
        Self::default().with_socket_override(std::env::var_os(SOCKET_ENV))
    }

    /// Replaces the socket path with `value` unless it is absent or empty.
    pub fn with_socket_override(mut self, value: Option<OsString>) -> Self {
        if let Some(path) = value.filter(|v| !v.is_empty()) {
            self.socket_path = PathBuf::from(path);
        }
        self
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_chunk_size == 0 {
            return Err(ConfigError::Validation {
                field: "recv_chunk_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_message_size < HEADER_LEN {
            return Err(ConfigError::Validation {
                field: "max_message_size",
                reason: format!("must be at least {HEADER_LEN} bytes"),
            });
        }
        if self.socket_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                field: "socket_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
