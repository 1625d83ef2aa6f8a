//! Daemon configuration loaded from TOML.
//!
//! ```toml
//! socket_path = "/run/lldpd.socket"
//!
//! [[inventory]]
//! name = "eth0"
//! ifindex = 2
//!
//! [inventory.local]
//! id_subtype = "interface_name"
//! id = [101, 116, 104, 48]
//!
//! [[inventory.neighbors]]
//! description = "uplink"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lldp_core::Hardware;

use crate::server::{MAX_MESSAGE_SIZE, READ_TIMEOUT};

/// Default path of the control socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/lldpd.socket";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What the daemon serves and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub socket_path: PathBuf,

    /// Idle connections are dropped after this many seconds
    pub read_timeout_secs: u64,

    /// Largest request frame accepted, header included
    pub max_message_size: usize,

    /// Hardware ports, in the order interfaces are listed
    pub inventory: Vec<Hardware>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            read_timeout_secs: READ_TIMEOUT.as_secs(),
            max_message_size: MAX_MESSAGE_SIZE,
            inventory: Vec::new(),
        }
    }
}

impl DaemonConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.socket_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                field: "socket_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "read_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_message_size < lldp_protocol::HEADER_LEN {
            return Err(ConfigError::Validation {
                field: "max_message_size",
                reason: format!("must be at least {} bytes", lldp_protocol::HEADER_LEN),
            });
        }

        let mut seen = HashSet::new();
        for hw in &self.inventory {
            if hw.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: "inventory.name",
                    reason: "must not be empty".to_string(),
                });
            }
            if !seen.insert(hw.name.as_str()) {
                return Err(ConfigError::Validation {
                    field: "inventory.name",
                    reason: format!("duplicate interface {}", hw.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::PortIdSubtype;

    const SAMPLE: &str = r#"
socket_path = "/tmp/lldpd-test.socket"

[[inventory]]
name = "eth0"
ifindex = 2

[inventory.local]
id_subtype = "interface_name"
id = [101, 116, 104, 48]

[[inventory.neighbors]]
description = "uplink"
ttl = 120

[[inventory]]
name = "eth1"

[inventory.local]
"#;

    #[test]
    fn test_sample_config() {
        let config = DaemonConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/lldpd-test.socket"));
        assert_eq!(config.inventory.len(), 2);

        let eth0 = &config.inventory[0];
        assert_eq!(eth0.local.id_subtype, PortIdSubtype::InterfaceName);
        assert_eq!(eth0.local.display_id(), "eth0");
        assert_eq!(eth0.neighbors[0].ttl, 120);
        assert_eq!(config.read_timeout(), READ_TIMEOUT);
    }

    #[test]
    fn test_duplicate_interface_rejected() {
        let input = "[[inventory]]\nname = \"eth0\"\n[inventory.local]\n\
                     [[inventory]]\nname = \"eth0\"\n[inventory.local]\n";
        let err = DaemonConfig::from_toml_str(input).unwrap_err();
        assert!(err.to_string().contains("duplicate interface eth0"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = DaemonConfig::from_toml_str("read_timeout_secs = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                field: "read_timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DaemonConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lldpd.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(DaemonConfig::load(&path).unwrap().inventory.len(), 2);
    }
}
