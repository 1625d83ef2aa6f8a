//! lldpctl - Client library for a running LLDP daemon
//!
//! This crate lets a program query and modify the daemon's state over its
//! control socket:
//! - `atom` - uniform handles on interfaces, ports, neighbors and the
//!   802.1 / 802.3 / LLDP-MED records they carry
//! - `connection` - request/response state machine over any transport,
//!   usable from an event loop (would-block is a normal outcome)
//! - `sync` - blocking wrapper over a Unix socket
//! - `dump` - generic rendering of any atom
//! - `log` - forwards the library's diagnostics to a plain callback
//!
//! # Example
//!
//! ```rust,ignore
//! use lldpctl::{AtomKey, SyncConnection};
//!
//! let mut conn = SyncConnection::connect("/var/run/lldpd.socket")?;
//! for interface in conn.get_interfaces()?.children()? {
//!     let port = conn.get_port(&interface)?;
//!     for neighbor in port.get(AtomKey::PortNeighbors)?.children()? {
//!         println!("{}", neighbor.get_str(AtomKey::ChassisName)?);
//!     }
//! }
//! ```
//!
//! # Panic-Free Guarantees
//!
//! Production code follows the panic-free policy: no `.unwrap()`,
//! `.expect()`, `panic!()`, `unreachable!()`, `todo!()`, or direct indexing.

pub mod atom;
pub mod config;
pub mod connection;
pub mod dump;
pub mod error;
pub mod log;
pub mod sync;

pub use atom::{Atom, AtomArgs, AtomKey, AtomKind, Children, Cursor, ValueType};
pub use config::{ClientConfig, ConfigError, DEFAULT_SOCKET_PATH, SOCKET_ENV};
pub use connection::{Connection, ConnectionId, Exchange, Progress, State, Transport};
pub use dump::dump;
pub use error::{CtlError, ErrorCode, Result};
pub use sync::{SyncConnection, SyncTransport};
