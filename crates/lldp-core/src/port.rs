//! Port and chassis entities.
//!
//! A `Port` is either the local side of a hardware interface or a
//! neighbor learned on it. Both carry the advertising chassis and the
//! optional 802.1, 802.3 and LLDP-MED records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::values::{format_hex, wire_enum, SystemCapabilities};
use crate::{Dot1, Dot3, MedInventory, MedPort};

wire_enum! {
    /// Chassis ID subtype (802.1AB, table 8-2).
    pub enum ChassisIdSubtype: "chassis id subtype" {
        ChassisComponent = 1 => "chassis component",
        InterfaceAlias = 2 => "ifalias",
        PortComponent = 3 => "port component",
        MacAddress = 4 => "mac",
        NetworkAddress = 5 => "ip",
        InterfaceName = 6 => "ifname",
        Local = 7 => "local",
    }
}

wire_enum! {
    /// Port ID subtype (802.1AB, table 8-3).
    pub enum PortIdSubtype: "port id subtype" {
        InterfaceAlias = 1 => "ifalias",
        PortComponent = 2 => "port component",
        MacAddress = 3 => "mac",
        NetworkAddress = 4 => "ip",
        InterfaceName = 5 => "ifname",
        AgentCircuitId = 6 => "circuit id",
        Local = 7 => "local",
    }
}

wire_enum! {
    /// Discovery protocol a port was learned through.
    pub enum Protocol: "protocol" {
        Lldp = 1 => "LLDP",
        Cdpv1 = 2 => "CDPv1",
        Cdpv2 = 3 => "CDPv2",
        Sonmp = 4 => "SONMP",
        Edp = 5 => "EDP",
        Fdp = 6 => "FDP",
    }
}

impl Default for ChassisIdSubtype {
    fn default() -> Self {
        Self::Local
    }
}

impl Default for PortIdSubtype {
    fn default() -> Self {
        Self::Local
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Lldp
    }
}

/// Renders an identifier the way the subtype suggests.
///
/// MAC addresses become colon-separated hex, network addresses use the
/// IANA family byte followed by the address, names are printed as-is
/// when they are valid UTF-8, anything else falls back to hex.
fn render_id(is_mac: bool, is_ip: bool, id: &[u8]) -> String {
    if is_mac {
        return format_hex(id, ':');
    }
    if is_ip {
        if let Some((family, addr)) = id.split_first() {
            let parsed = match (family, addr.len()) {
                (1, 4) => <[u8; 4]>::try_from(addr).ok().map(IpAddr::from),
                (2, 16) => <[u8; 16]>::try_from(addr).ok().map(IpAddr::from),
                _ => None,
            };
            if let Some(ip) = parsed {
                return ip.to_string();
            }
        }
        return format_hex(id, ':');
    }
    match std::str::from_utf8(id) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => format_hex(id, ' '),
    }
}

impl ChassisIdSubtype {
    /// Formats a chassis identifier for display.
    pub fn format_id(self, id: &[u8]) -> String {
        render_id(self == Self::MacAddress, self == Self::NetworkAddress, id)
    }
}

impl PortIdSubtype {
    /// Formats a port identifier for display.
    pub fn format_id(self, id: &[u8]) -> String {
        render_id(self == Self::MacAddress, self == Self::NetworkAddress, id)
    }
}

/// Management address advertised by a chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgmtAddress {
    pub address: IpAddr,
    /// Interface number the address is reachable through (ifIndex)
    #[serde(default)]
    pub iface: u32,
}

impl MgmtAddress {
    pub fn new(address: IpAddr, iface: u32) -> Self {
        Self { address, iface }
    }

    /// IANA address family number (1 = IPv4, 2 = IPv6).
    pub fn family(&self) -> u8 {
        match self.address {
            IpAddr::V4(_) => 1,
            IpAddr::V6(_) => 2,
        }
    }

    /// Address bytes as sent on the wire.
    pub fn octets(&self) -> Vec<u8> {
        match self.address {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        }
    }
}

/// The system advertising a port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chassis {
    #[serde(default)]
    pub id_subtype: ChassisIdSubtype,
    #[serde(default)]
    pub id: Vec<u8>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cap_available: SystemCapabilities,
    #[serde(default)]
    pub cap_enabled: SystemCapabilities,
    #[serde(default)]
    pub mgmt: Vec<MgmtAddress>,
    /// LLDP-MED capability bitmap
    #[serde(default)]
    pub med_capabilities: u16,
    /// LLDP-MED device class (0 = not defined, 1-3 = endpoint class, 4 = network device)
    #[serde(default)]
    pub med_device_type: u8,
    #[serde(default)]
    pub inventory: Option<MedInventory>,
}

impl Chassis {
    /// Returns the formatted chassis identifier.
    pub fn display_id(&self) -> String {
        self.id_subtype.format_id(&self.id)
    }
}

/// A local or remote port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Port {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub id_subtype: PortIdSubtype,
    #[serde(default)]
    pub id: Vec<u8>,
    #[serde(default)]
    pub description: Option<String>,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u16,
    /// When this port's information last changed
    #[serde(default)]
    pub last_change: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chassis: Chassis,
    #[serde(default)]
    pub dot1: Dot1,
    #[serde(default)]
    pub dot3: Dot3,
    #[serde(default)]
    pub med: MedPort,
}

impl Port {
    /// Creates a port with an interface-name identifier.
    pub fn with_ifname(name: &str) -> Self {
        Self {
            id_subtype: PortIdSubtype::InterfaceName,
            id: name.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    /// Returns the formatted port identifier.
    pub fn display_id(&self) -> String {
        self.id_subtype.format_id(&self.id)
    }

    /// Seconds elapsed since `last_change`, relative to `now`.
    ///
    /// Returns 0 when the change time is unknown or in the future.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.last_change
            .map(|changed| (now - changed).num_seconds().max(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::net::Ipv4Addr;

    #[test]
    fn test_mac_chassis_id() {
        let id = [0x00, 0x16, 0x3e, 0x11, 0x22, 0x33];
        assert_eq!(
            ChassisIdSubtype::MacAddress.format_id(&id),
            "00:16:3e:11:22:33"
        );
    }

    #[test]
    fn test_network_address_id() {
        let id = [1, 192, 0, 2, 1];
        assert_eq!(ChassisIdSubtype::NetworkAddress.format_id(&id), "192.0.2.1");
        // Unknown family falls back to hex
        assert_eq!(PortIdSubtype::NetworkAddress.format_id(&[9, 1]), "09:01");
    }

    #[test]
    fn test_name_id_and_binary_fallback() {
        assert_eq!(PortIdSubtype::InterfaceName.format_id(b"eth0"), "eth0");
        assert_eq!(PortIdSubtype::Local.format_id(&[0x01, 0xff]), "01 ff");
    }

    #[test]
    fn test_subtype_wire_values() {
        assert_eq!(PortIdSubtype::from_u8(5), Ok(PortIdSubtype::InterfaceName));
        assert_eq!(ChassisIdSubtype::MacAddress.value(), 4);
        assert!(ChassisIdSubtype::from_u8(0).is_err());
        assert!(PortIdSubtype::from_u8(8).is_err());
    }

    #[test]
    fn test_mgmt_family() {
        let mgmt = MgmtAddress::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 3);
        assert_eq!(mgmt.family(), 1);
        assert_eq!(mgmt.octets(), vec![10, 0, 0, 1]);
    }

    #[test]
    fn test_port_age() {
        let now = Utc::now();
        let mut port = Port::with_ifname("eth0");
        assert_eq!(port.age_seconds(now), 0);
        port.last_change = Some(now - Duration::seconds(90));
        assert_eq!(port.age_seconds(now), 90);
    }

    #[test]
    fn test_port_serde_defaults() {
        let port: Port = serde_json::from_str("{}").unwrap();
        assert_eq!(port.protocol, Protocol::Lldp);
        assert!(port.chassis.mgmt.is_empty());
    }
}
