//! Inventory registry using the actor pattern.
//!
//! ```text
//! ┌─────────────────┐  RegistryCommand  ┌─────────────────┐
//! │ConnectionHandler│──────────────────▶│  RegistryActor  │
//! │  (per client)   │◀──────────────────│  (Inventory)    │
//! └─────────────────┘  oneshot reply    └─────────────────┘
//! ```
//!
//! # Panic-Free Guarantees
//!
//! All operations in this module follow the panic-free policy:
//! - No `.unwrap()` or `.expect()` in production code
//! - Channel operations handle closure gracefully

use tokio::sync::mpsc;

mod actor;
mod commands;
mod handle;

pub use actor::RegistryActor;
pub use commands::{RegistryCommand, RegistryError};
pub use handle::RegistryHandle;

use crate::inventory::Inventory;

/// Command channel buffer size
const COMMAND_BUFFER: usize = 100;

/// Spawns the registry actor over `inventory` and returns a handle to it.
///
/// The actor stops once every handle has been dropped.
///
/// # Example
///
/// ```no_run
/// use lldpd::{registry::spawn_registry, Inventory};
///
/// #[tokio::main]
/// async fn main() {
///     let handle = spawn_registry(Inventory::default());
///     let interfaces = handle.list_interfaces().await;
/// }
/// ```
pub fn spawn_registry(inventory: Inventory) -> RegistryHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

    let actor = RegistryActor::new(cmd_rx, inventory);
    tokio::spawn(actor.run());

    RegistryHandle::new(cmd_tx)
}
