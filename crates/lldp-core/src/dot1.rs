//! IEEE 802.1 organizationally specific records.

use serde::{Deserialize, Serialize};

/// A VLAN a port is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub vid: u16,
    pub name: String,
}

/// Port and protocol VLAN ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ppvid {
    /// Bit 1: supported, bit 2: enabled
    pub cap_status: u8,
    pub ppvid: u16,
}

impl Ppvid {
    pub const SUPPORTED: u8 = 0x02;
    pub const ENABLED: u8 = 0x04;

    pub fn is_supported(&self) -> bool {
        self.cap_status & Self::SUPPORTED != 0
    }

    pub fn is_enabled(&self) -> bool {
        self.cap_status & Self::ENABLED != 0
    }
}

/// Protocol identity: the leading bytes of a protocol's frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolIdentity {
    pub identity: Vec<u8>,
}

/// All 802.1 information attached to a port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dot1 {
    /// Port VLAN ID, 0 when not advertised
    #[serde(default)]
    pub pvid: u16,
    #[serde(default)]
    pub vlans: Vec<Vlan>,
    #[serde(default)]
    pub ppvids: Vec<Ppvid>,
    #[serde(default)]
    pub pis: Vec<ProtocolIdentity>,
}
