//! LLDP Core - Shared domain types for LLDP discovery
//!
//! This crate provides the entities shared between the daemon (lldpd)
//! and the control client (lldpctl): local interfaces, hardware ports,
//! discovered neighbors and the 802.1, 802.3 and LLDP-MED records they
//! carry.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod dot1;
pub mod dot3;
pub mod error;
pub mod interface;
pub mod med;
pub mod port;
pub mod settings;
pub mod values;

// Re-exports for convenience
pub use dot1::{Dot1, Ppvid, ProtocolIdentity, Vlan};
pub use dot3::{Dot3, Dot3Power, MacPhy, PowerDeviceType, PowerPairs};
pub use error::{DomainError, DomainResult};
pub use interface::{Hardware, Interface, PortCounters};
pub use med::{
    CaElement, LocationFormat, MedAppType, MedInventory, MedLocation, MedPolicy, MedPort,
    MedPower, MedPowerPriority, MedPowerType,
};
pub use port::{Chassis, ChassisIdSubtype, MgmtAddress, Port, PortIdSubtype, Protocol};
pub use settings::PortSettings;
pub use values::{format_hex, SystemCapabilities};
