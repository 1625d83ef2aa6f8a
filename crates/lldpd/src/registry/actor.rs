//! Registry actor - owns the inventory and processes commands.
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Reply send failures are ignored: the requester may have gone away

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::commands::RegistryCommand;
use crate::inventory::Inventory;

// ============================================================================
// Registry Actor
// ============================================================================

/// The registry actor - single owner of the daemon inventory.
///
/// Commands are processed one at a time, so a set-port is fully applied
/// before the next get-port observes it.
pub struct RegistryActor {
    receiver: mpsc::Receiver<RegistryCommand>,
    inventory: Inventory,
}

impl RegistryActor {
    pub fn new(receiver: mpsc::Receiver<RegistryCommand>, inventory: Inventory) -> Self {
        Self {
            receiver,
            inventory,
        }
    }

    /// Runs the actor until every handle has been dropped.
    pub async fn run(mut self) {
        info!(ports = self.inventory.len(), "Registry actor starting");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("Registry actor stopped");
    }

    fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::ListInterfaces { respond_to } => {
                let _ = respond_to.send(self.inventory.interfaces());
            }
            RegistryCommand::GetPort { name, respond_to } => {
                debug!(interface = %name, "Get port");
                let _ = respond_to.send(self.inventory.port(&name));
            }
            RegistryCommand::SetPort {
                settings,
                respond_to,
            } => {
                let _ = respond_to.send(self.inventory.set_port(&settings));
            }
            RegistryCommand::Count { respond_to } => {
                let _ = respond_to.send(self.inventory.len());
            }
        }
    }
}
