//! Simulated LLDP daemon
//!
//! Serves the control protocol from a static inventory of hardware ports:
//! - `registry` - actor owning the inventory, answering the three exchanges
//! - `server` - Unix socket server speaking the framed protocol
//! - `handle_frame` - synchronous request handling for in-process use
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  DaemonServer   │────▶│  RegistryActor  │
//! │ (Unix Socket)   │     │   (Inventory)   │
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! No packets are captured and neighbors never age out.
//!
//! # Panic-Free Guarantees
//!
//! All production code in this crate follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations return `Result` or `Option`

pub mod config;
pub mod handler;
pub mod inventory;
pub mod registry;
pub mod server;

pub use config::{ConfigError, DaemonConfig, DEFAULT_SOCKET_PATH};
pub use handler::{encode_reply, handle_frame};
pub use inventory::Inventory;
pub use registry::{spawn_registry, RegistryError, RegistryHandle};
pub use server::{DaemonServer, ServerError};
