//! Registry command and error types.
//!
//! Commands are sent from connection handlers to the `RegistryActor` via
//! an mpsc channel. Each command carries a oneshot sender the actor uses to
//! reply.

use thiserror::Error;
use tokio::sync::oneshot;

use lldp_core::{Hardware, Interface, PortSettings};

// ============================================================================
// Registry Commands
// ============================================================================

/// Commands that can be sent to the registry actor.
#[derive(Debug)]
pub enum RegistryCommand {
    /// List every known interface, in inventory order.
    ListInterfaces {
        respond_to: oneshot::Sender<Vec<Interface>>,
    },

    /// Fetch the hardware port behind an interface.
    GetPort {
        name: String,
        respond_to: oneshot::Sender<Result<Hardware, RegistryError>>,
    },

    /// Apply a set-port request to the local side of an interface.
    SetPort {
        settings: Box<PortSettings>,
        respond_to: oneshot::Sender<Result<(), RegistryError>>,
    },

    /// Number of hardware ports held.
    Count {
        respond_to: oneshot::Sender<usize>,
    },
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No hardware port carries this interface name.
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    /// The actor went away before answering.
    #[error("response channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::InterfaceNotFound("eth9".to_string());
        assert_eq!(err.to_string(), "interface not found: eth9");
        assert!(RegistryError::ChannelClosed.to_string().contains("closed"));
    }
}
