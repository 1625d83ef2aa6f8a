//! Client interface for interacting with the RegistryActor.
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Channel errors are mapped to `RegistryError::ChannelClosed`

use tokio::sync::{mpsc, oneshot};

use lldp_core::{Hardware, Interface, PortSettings};
use lldp_protocol::{Request, Response};

use super::commands::{RegistryCommand, RegistryError};

// ============================================================================
// Registry Handle
// ============================================================================

/// Cheap-to-clone handle shared by every connection task.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    pub fn new(sender: mpsc::Sender<RegistryCommand>) -> Self {
        Self { sender }
    }

    /// Lists every interface in inventory order.
    ///
    /// # Errors
    ///
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn list_interfaces(&self) -> Result<Vec<Interface>, RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.send(RegistryCommand::ListInterfaces { respond_to: tx })
            .await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Fetches the hardware port behind `name`.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InterfaceNotFound` if no port has this name
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn get_port(&self, name: impl Into<String>) -> Result<Hardware, RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.send(RegistryCommand::GetPort {
            name: name.into(),
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)?
    }

    /// Applies a set-port request.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InterfaceNotFound` if no port has this name
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn set_port(&self, settings: PortSettings) -> Result<(), RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.send(RegistryCommand::SetPort {
            settings: Box::new(settings),
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)?
    }

    /// Number of hardware ports, or 0 if the actor is gone.
    pub async fn count(&self) -> usize {
        let (tx, rx) = oneshot::channel();
        if self
            .send(RegistryCommand::Count { respond_to: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }

    /// Answers a decoded client request.
    ///
    /// Registry errors become a failure reply carrying the reason.
    pub async fn answer(&self, request: Request) -> Response {
        let result = match request {
            Request::ListInterfaces => self.list_interfaces().await.map(Response::Interfaces),
            Request::GetPort { name } => self
                .get_port(name)
                .await
                .map(|hw| Response::Port(Box::new(hw))),
            Request::SetPort(settings) => self.set_port(settings).await.map(|()| Response::PortSet),
        };
        result.unwrap_or_else(|e| Response::failure(e.to_string()))
    }

    async fn send(&self, cmd: RegistryCommand) -> Result<(), RegistryError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RegistryError::ChannelClosed)
    }
}
