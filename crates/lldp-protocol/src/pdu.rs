//! LLDPDU construction and parsing.
//!
//! A PDU is the TLV sequence carried by one LLDP frame. It must start
//! with chassis ID, port ID and TTL, in that order, and end with the
//! end-of-PDU marker. Organizationally specific TLVs this module does
//! not understand are skipped and counted so that newer peers remain
//! readable.

use std::net::IpAddr;

use lldp_core::{
    ChassisIdSubtype, LocationFormat, MedAppType, MedInventory, MedLocation, MedPolicy,
    MedPower, MedPowerPriority, MedPowerType, MgmtAddress, Port, PortIdSubtype, Ppvid,
    ProtocolIdentity, SystemCapabilities, Vlan,
};
use tracing::debug;

use crate::tlv::{
    oui, Dot1Subtype, Dot3Subtype, MedSubtype, Tlv, TlvError, TlvType, ETHERTYPE_LLDP,
    LLDP_MULTICAST_ADDR,
};

/// Ethernet header: destination, source, EtherType.
const ETHERNET_HEADER_LEN: usize = 14;

/// Interface numbering subtype "ifIndex" in the management address TLV.
const MGMT_IFACE_IFINDEX: u8 = 2;

/// A parsed or freshly built LLDPDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    tlvs: Vec<Tlv>,
}

/// Result of turning a PDU into a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPdu {
    pub port: Port,
    /// TLVs skipped because their type or subtype is not understood
    pub unrecognized: usize,
}

impl Pdu {
    /// Wraps an existing TLV sequence (without end-of-PDU marker).
    pub fn from_tlvs(tlvs: Vec<Tlv>) -> Self {
        Self { tlvs }
    }

    pub fn tlvs(&self) -> &[Tlv] {
        &self.tlvs
    }

    /// Builds the PDU advertising `port`.
    pub fn from_port(port: &Port) -> Result<Self, TlvError> {
        let chassis = &port.chassis;
        let mut tlvs = vec![
            Tlv::standard(TlvType::ChassisId, prefixed(chassis.id_subtype.value(), &chassis.id))?,
            Tlv::standard(TlvType::PortId, prefixed(port.id_subtype.value(), &port.id))?,
            Tlv::standard(TlvType::Ttl, port.ttl.to_be_bytes().to_vec())?,
        ];

        if let Some(descr) = &port.description {
            tlvs.push(Tlv::standard(TlvType::PortDescription, descr.as_bytes().to_vec())?);
        }
        if let Some(name) = &chassis.name {
            tlvs.push(Tlv::standard(TlvType::SystemName, name.as_bytes().to_vec())?);
        }
        if let Some(descr) = &chassis.description {
            tlvs.push(Tlv::standard(TlvType::SystemDescription, descr.as_bytes().to_vec())?);
        }
        if chassis.cap_available.bits() != 0 {
            let mut caps = chassis.cap_available.bits().to_be_bytes().to_vec();
            caps.extend_from_slice(&chassis.cap_enabled.bits().to_be_bytes());
            tlvs.push(Tlv::standard(TlvType::SystemCapabilities, caps)?);
        }
        for mgmt in &chassis.mgmt {
            tlvs.push(Tlv::standard(TlvType::ManagementAddress, encode_mgmt(mgmt))?);
        }

        let dot1 = &port.dot1;
        if dot1.pvid != 0 {
            tlvs.push(dot1_tlv(Dot1Subtype::Pvid, &dot1.pvid.to_be_bytes())?);
        }
        for ppvid in &dot1.ppvids {
            let mut value = vec![ppvid.cap_status];
            value.extend_from_slice(&ppvid.ppvid.to_be_bytes());
            tlvs.push(dot1_tlv(Dot1Subtype::Ppvid, &value)?);
        }
        for vlan in &dot1.vlans {
            let mut value = vlan.vid.to_be_bytes().to_vec();
            value.extend_from_slice(&length_prefixed("VLAN name", vlan.name.as_bytes())?);
            tlvs.push(dot1_tlv(Dot1Subtype::VlanName, &value)?);
        }
        for pi in &dot1.pis {
            let value = length_prefixed("protocol identity", &pi.identity)?;
            tlvs.push(dot1_tlv(Dot1Subtype::ProtocolIdentity, &value)?);
        }

        let dot3 = &port.dot3;
        let macphy = &dot3.macphy;
        if macphy.autoneg_support || macphy.mau_type != 0 {
            let flags = u8::from(macphy.autoneg_support) | (u8::from(macphy.autoneg_enabled) << 1);
            let mut value = vec![flags];
            value.extend_from_slice(&macphy.autoneg_advertised.to_be_bytes());
            value.extend_from_slice(&macphy.mau_type.to_be_bytes());
            tlvs.push(dot3_tlv(Dot3Subtype::MacPhy, &value)?);
        }
        if let Some(power) = &dot3.power {
            let flags = u8::from(power.device_type == lldp_core::PowerDeviceType::Pse)
                | (u8::from(power.supported) << 1)
                | (u8::from(power.enabled) << 2)
                | (u8::from(power.pair_control) << 3);
            let value = [flags, power.pairs.value(), power.class.saturating_add(1)];
            tlvs.push(dot3_tlv(Dot3Subtype::Power, &value)?);
        }
        if dot3.aggregation_id != 0 {
            let mut value = vec![0x03];
            value.extend_from_slice(&dot3.aggregation_id.to_be_bytes());
            tlvs.push(dot3_tlv(Dot3Subtype::LinkAggregation, &value)?);
        }
        if dot3.mfs != 0 {
            tlvs.push(dot3_tlv(Dot3Subtype::MaxFrameSize, &dot3.mfs.to_be_bytes())?);
        }

        if chassis.med_capabilities != 0 {
            let mut value = chassis.med_capabilities.to_be_bytes().to_vec();
            value.push(chassis.med_device_type);
            tlvs.push(med_tlv(MedSubtype::Capabilities, &value)?);
        }
        for policy in &port.med.policies {
            tlvs.push(med_tlv(MedSubtype::Policy, &encode_policy(policy))?);
        }
        for location in &port.med.locations {
            let value = prefixed(location.format.value(), &location.data);
            tlvs.push(med_tlv(MedSubtype::Location, &value)?);
        }
        if let Some(power) = &port.med.power {
            let packed = ((power.power_type.value() - 1) << 6)
                | ((power.source & 0x03) << 4)
                | (power.priority.value() & 0x0f);
            let mut value = vec![packed];
            value.extend_from_slice(&power.value.to_be_bytes());
            tlvs.push(med_tlv(MedSubtype::ExtendedPower, &value)?);
        }
        if let Some(inventory) = &chassis.inventory {
            for (subtype, field) in inventory_fields(inventory) {
                if let Some(text) = field {
                    tlvs.push(med_tlv(subtype, text.as_bytes())?);
                }
            }
        }

        Ok(Self { tlvs })
    }

    /// Encodes the PDU, end-of-PDU marker included.
    pub fn encode(&self) -> Vec<u8> {
        Tlv::encode_all(&self.tlvs)
    }

    /// Decodes a PDU from its TLV bytes.
    pub fn decode(buf: &[u8]) -> Result<Self, TlvError> {
        Ok(Self {
            tlvs: Tlv::decode_all(buf)?,
        })
    }

    /// Prepends an Ethernet header addressed to the LLDP multicast group.
    pub fn to_frame(&self, src_mac: [u8; 6]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(ETHERNET_HEADER_LEN + 64);
        frame.extend_from_slice(&LLDP_MULTICAST_ADDR);
        frame.extend_from_slice(&src_mac);
        frame.extend_from_slice(&ETHERTYPE_LLDP.to_be_bytes());
        frame.extend_from_slice(&self.encode());
        frame
    }

    /// Decodes a PDU from a full Ethernet frame.
    pub fn from_frame(frame: &[u8]) -> Result<Self, TlvError> {
        let header = frame
            .get(..ETHERNET_HEADER_LEN)
            .ok_or(TlvError::TruncatedHeader { remaining: frame.len() })?;
        let ethertype = match header {
            [.., hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0,
        };
        if ethertype != ETHERTYPE_LLDP {
            return Err(TlvError::NotLldp(ethertype));
        }
        Self::decode(frame.get(ETHERNET_HEADER_LEN..).unwrap_or_default())
    }

    /// Interprets the PDU as the description of a remote port.
    pub fn to_port(&self) -> Result<DecodedPdu, TlvError> {
        let mut iter = self.tlvs.iter();
        let mut port = Port::default();

        let chassis = expect_tlv(iter.next(), TlvType::ChassisId, "chassis ID")?;
        let (subtype, id) = split_subtype(chassis, "chassis ID")?;
        port.chassis.id_subtype = ChassisIdSubtype::from_u8(subtype)
            .map_err(|e| malformed("chassis ID", e.to_string()))?;
        port.chassis.id = id.to_vec();

        let port_id = expect_tlv(iter.next(), TlvType::PortId, "port ID")?;
        let (subtype, id) = split_subtype(port_id, "port ID")?;
        port.id_subtype =
            PortIdSubtype::from_u8(subtype).map_err(|e| malformed("port ID", e.to_string()))?;
        port.id = id.to_vec();

        let ttl = expect_tlv(iter.next(), TlvType::Ttl, "TTL")?;
        port.ttl = read_u16(ttl.value(), "TTL")?;

        let mut unrecognized = 0;
        for tlv in iter {
            let understood = match tlv.kind() {
                Some(TlvType::PortDescription) => {
                    port.description = Some(text(tlv.value()));
                    true
                }
                Some(TlvType::SystemName) => {
                    port.chassis.name = Some(text(tlv.value()));
                    true
                }
                Some(TlvType::SystemDescription) => {
                    port.chassis.description = Some(text(tlv.value()));
                    true
                }
                Some(TlvType::SystemCapabilities) => {
                    let value = tlv.value();
                    port.chassis.cap_available = SystemCapabilities::new(read_u16(value, "capabilities")?);
                    let enabled = value.get(2..).unwrap_or_default();
                    port.chassis.cap_enabled = SystemCapabilities::new(read_u16(enabled, "capabilities")?);
                    true
                }
                Some(TlvType::ManagementAddress) => match decode_mgmt(tlv.value())? {
                    Some(mgmt) => {
                        port.chassis.mgmt.push(mgmt);
                        true
                    }
                    None => false,
                },
                Some(TlvType::OrganizationallySpecific) => decode_org(tlv, &mut port)?,
                Some(TlvType::ChassisId | TlvType::PortId | TlvType::Ttl) => {
                    return Err(malformed("PDU", "duplicate mandatory TLV".to_string()));
                }
                Some(TlvType::End) | None => false,
            };
            if !understood {
                unrecognized += 1;
            }
        }

        if unrecognized > 0 {
            debug!(unrecognized, "Skipped unrecognized TLVs");
        }
        Ok(DecodedPdu { port, unrecognized })
    }
}

fn prefixed(prefix: u8, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + bytes.len());
    out.push(prefix);
    out.extend_from_slice(bytes);
    out
}

/// Prefixes `bytes` with their one-byte length.
fn length_prefixed(tlv: &'static str, bytes: &[u8]) -> Result<Vec<u8>, TlvError> {
    let len = u8::try_from(bytes.len())
        .map_err(|_| malformed(tlv, format!("{} bytes exceed the 255-byte field", bytes.len())))?;
    Ok(prefixed(len, bytes))
}

fn dot1_tlv(subtype: Dot1Subtype, payload: &[u8]) -> Result<Tlv, TlvError> {
    Tlv::org(oui::DOT1, subtype.value(), payload)
}

fn dot3_tlv(subtype: Dot3Subtype, payload: &[u8]) -> Result<Tlv, TlvError> {
    Tlv::org(oui::DOT3, subtype.value(), payload)
}

fn med_tlv(subtype: MedSubtype, payload: &[u8]) -> Result<Tlv, TlvError> {
    Tlv::org(oui::MED, subtype.value(), payload)
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn malformed(tlv: &'static str, reason: String) -> TlvError {
    TlvError::Malformed { tlv, reason }
}

fn read_u16(bytes: &[u8], tlv: &'static str) -> Result<u16, TlvError> {
    match bytes {
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(malformed(tlv, format!("expected 2 bytes, got {}", bytes.len()))),
    }
}

fn read_u32(bytes: &[u8], tlv: &'static str) -> Result<u32, TlvError> {
    match bytes {
        [a, b, c, d, ..] => Ok(u32::from_be_bytes([*a, *b, *c, *d])),
        _ => Err(malformed(tlv, format!("expected 4 bytes, got {}", bytes.len()))),
    }
}

fn expect_tlv<'a>(
    tlv: Option<&'a Tlv>,
    expected: TlvType,
    name: &'static str,
) -> Result<&'a Tlv, TlvError> {
    tlv.filter(|t| t.kind() == Some(expected))
        .ok_or(TlvError::MissingMandatory(name))
}

fn split_subtype<'a>(tlv: &'a Tlv, name: &'static str) -> Result<(u8, &'a [u8]), TlvError> {
    match tlv.value() {
        [subtype, id @ ..] if !id.is_empty() => Ok((*subtype, id)),
        _ => Err(malformed(name, "empty identifier".to_string())),
    }
}

fn encode_mgmt(mgmt: &MgmtAddress) -> Vec<u8> {
    let octets = mgmt.octets();
    // At most 16 octets plus the family byte
    let mut value = vec![octets.len() as u8 + 1, mgmt.family()];
    value.extend_from_slice(&octets);
    value.push(MGMT_IFACE_IFINDEX);
    value.extend_from_slice(&mgmt.iface.to_be_bytes());
    value.push(0); // no OID
    value
}

/// Returns `None` for address families other than IPv4/IPv6.
fn decode_mgmt(value: &[u8]) -> Result<Option<MgmtAddress>, TlvError> {
    let (len, rest) = value
        .split_first()
        .ok_or_else(|| malformed("management address", "empty".to_string()))?;
    let len = usize::from(*len);
    let addr_field = rest
        .get(..len)
        .ok_or_else(|| malformed("management address", "address overruns TLV".to_string()))?;
    let iface_field = rest.get(len..).unwrap_or_default();
    let iface = read_u32(iface_field.get(1..).unwrap_or_default(), "management address")?;

    let address = match addr_field {
        [1, a, b, c, d] => IpAddr::from([*a, *b, *c, *d]),
        [2, v6 @ ..] if v6.len() == 16 => match <[u8; 16]>::try_from(v6) {
            Ok(octets) => IpAddr::from(octets),
            Err(_) => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(MgmtAddress::new(address, iface)))
}

/// Packs a network policy: U(1) T(1) X(1) VID(12) L2 priority(3) DSCP(6).
fn encode_policy(policy: &MedPolicy) -> Vec<u8> {
    let bits: u32 = (u32::from(policy.unknown) << 23)
        | (u32::from(policy.tagged) << 22)
        | ((u32::from(policy.vid) & 0x0fff) << 9)
        | ((u32::from(policy.priority) & 0x07) << 6)
        | (u32::from(policy.dscp) & 0x3f);
    let [_, b1, b2, b3] = bits.to_be_bytes();
    vec![policy.app_type.value(), b1, b2, b3]
}

fn decode_policy(payload: &[u8]) -> Result<MedPolicy, TlvError> {
    let [app, b1, b2, b3] = <[u8; 4]>::try_from(payload)
        .map_err(|_| malformed("MED policy", format!("expected 4 bytes, got {}", payload.len())))?;
    let bits = u32::from_be_bytes([0, b1, b2, b3]);
    let app_type = MedAppType::from_u8(app).map_err(|e| malformed("MED policy", e.to_string()))?;
    Ok(MedPolicy {
        app_type,
        unknown: bits & (1 << 23) != 0,
        tagged: bits & (1 << 22) != 0,
        vid: ((bits >> 9) & 0x0fff) as u16,
        priority: ((bits >> 6) & 0x07) as u8,
        dscp: (bits & 0x3f) as u8,
    })
}

fn inventory_fields(inventory: &MedInventory) -> [(MedSubtype, &Option<String>); 7] {
    [
        (MedSubtype::HardwareRevision, &inventory.hardware_revision),
        (MedSubtype::FirmwareRevision, &inventory.firmware_revision),
        (MedSubtype::SoftwareRevision, &inventory.software_revision),
        (MedSubtype::SerialNumber, &inventory.serial_number),
        (MedSubtype::Manufacturer, &inventory.manufacturer),
        (MedSubtype::Model, &inventory.model),
        (MedSubtype::AssetId, &inventory.asset_id),
    ]
}

/// Applies one organizationally specific TLV to `port`.
///
/// Returns false when the OUI or subtype is not understood.
fn decode_org(tlv: &Tlv, port: &mut Port) -> Result<bool, TlvError> {
    let Some(org) = tlv.as_org()? else {
        return Ok(false);
    };
    let payload = org.payload;

    match org.oui {
        oui::DOT1 => match Dot1Subtype::from_u8(org.subtype) {
            Some(subtype) => decode_dot1(subtype, payload, port)?,
            None => return Ok(false),
        },
        oui::DOT3 => match Dot3Subtype::from_u8(org.subtype) {
            Some(subtype) => decode_dot3(subtype, payload, port)?,
            None => return Ok(false),
        },
        oui::MED => match MedSubtype::from_u8(org.subtype) {
            Some(subtype) => decode_med(subtype, payload, port)?,
            None => return Ok(false),
        },
        _ => return Ok(false),
    }
    Ok(true)
}

fn decode_dot1(subtype: Dot1Subtype, payload: &[u8], port: &mut Port) -> Result<(), TlvError> {
    match subtype {
        Dot1Subtype::Pvid => port.dot1.pvid = read_u16(payload, "PVID")?,
        Dot1Subtype::Ppvid => {
            let (flags, rest) = payload
                .split_first()
                .ok_or_else(|| malformed("PPVID", "empty".to_string()))?;
            port.dot1.ppvids.push(Ppvid {
                cap_status: *flags,
                ppvid: read_u16(rest, "PPVID")?,
            });
        }
        Dot1Subtype::VlanName => {
            let vid = read_u16(payload, "VLAN name")?;
            let rest = payload.get(2..).unwrap_or_default();
            let (len, name) = rest
                .split_first()
                .ok_or_else(|| malformed("VLAN name", "missing name length".to_string()))?;
            let name = name
                .get(..usize::from(*len))
                .ok_or_else(|| malformed("VLAN name", "name overruns TLV".to_string()))?;
            port.dot1.vlans.push(Vlan {
                vid,
                name: text(name),
            });
        }
        Dot1Subtype::ProtocolIdentity => {
            let (len, identity) = payload
                .split_first()
                .ok_or_else(|| malformed("protocol identity", "empty".to_string()))?;
            let identity = identity
                .get(..usize::from(*len))
                .ok_or_else(|| malformed("protocol identity", "identity overruns TLV".to_string()))?;
            port.dot1.pis.push(ProtocolIdentity {
                identity: identity.to_vec(),
            });
        }
    }
    Ok(())
}

fn decode_dot3(subtype: Dot3Subtype, payload: &[u8], port: &mut Port) -> Result<(), TlvError> {
    match subtype {
        Dot3Subtype::MacPhy => {
            let (flags, rest) = payload
                .split_first()
                .ok_or_else(|| malformed("MAC/PHY", "empty".to_string()))?;
            let macphy = &mut port.dot3.macphy;
            macphy.autoneg_support = flags & 0x01 != 0;
            macphy.autoneg_enabled = flags & 0x02 != 0;
            macphy.autoneg_advertised = read_u16(rest, "MAC/PHY")?;
            macphy.mau_type = read_u16(rest.get(2..).unwrap_or_default(), "MAC/PHY")?;
        }
        Dot3Subtype::Power => {
            let [flags, pairs, class, ..] = payload else {
                return Err(malformed("power", format!("expected 3 bytes, got {}", payload.len())));
            };
            let device_type = if flags & 0x01 != 0 {
                lldp_core::PowerDeviceType::Pse
            } else {
                lldp_core::PowerDeviceType::Pd
            };
            let pairs = lldp_core::PowerPairs::from_u8(*pairs)
                .map_err(|e| malformed("power", e.to_string()))?;
            port.dot3.power = Some(lldp_core::Dot3Power {
                device_type,
                supported: flags & 0x02 != 0,
                enabled: flags & 0x04 != 0,
                pair_control: flags & 0x08 != 0,
                pairs,
                class: class.saturating_sub(1),
                power_type: 0,
                source: 0,
                priority: 0,
                requested: 0,
                allocated: 0,
            });
        }
        Dot3Subtype::LinkAggregation => {
            let rest = payload.get(1..).unwrap_or_default();
            port.dot3.aggregation_id = read_u32(rest, "link aggregation")?;
        }
        Dot3Subtype::MaxFrameSize => port.dot3.mfs = read_u16(payload, "MFS")?,
    }
    Ok(())
}

fn decode_med(subtype: MedSubtype, payload: &[u8], port: &mut Port) -> Result<(), TlvError> {
    match subtype {
        MedSubtype::Capabilities => {
            port.chassis.med_capabilities = read_u16(payload, "MED capabilities")?;
            port.chassis.med_device_type = payload
                .get(2)
                .copied()
                .ok_or_else(|| malformed("MED capabilities", "missing device type".to_string()))?;
        }
        MedSubtype::Policy => port.med.set_policy(decode_policy(payload)?),
        MedSubtype::Location => {
            let (format, data) = payload
                .split_first()
                .ok_or_else(|| malformed("MED location", "empty".to_string()))?;
            let format = LocationFormat::from_u8(*format)
                .map_err(|e| malformed("MED location", e.to_string()))?;
            port.med.set_location(MedLocation::new(format, data.to_vec()));
        }
        MedSubtype::ExtendedPower => {
            let (packed, rest) = payload
                .split_first()
                .ok_or_else(|| malformed("MED power", "empty".to_string()))?;
            let power_type = MedPowerType::from_u8((packed >> 6) + 1)
                .map_err(|e| malformed("MED power", e.to_string()))?;
            let priority = MedPowerPriority::from_u8(packed & 0x0f)
                .map_err(|e| malformed("MED power", e.to_string()))?;
            port.med.power = Some(MedPower {
                power_type,
                source: (packed >> 4) & 0x03,
                priority,
                value: read_u16(rest, "MED power")?,
            });
        }
        MedSubtype::HardwareRevision
        | MedSubtype::FirmwareRevision
        | MedSubtype::SoftwareRevision
        | MedSubtype::SerialNumber
        | MedSubtype::Manufacturer
        | MedSubtype::Model
        | MedSubtype::AssetId => {
            let inventory = port.chassis.inventory.get_or_insert_with(MedInventory::default);
            let value = Some(text(payload));
            let field = match subtype {
                MedSubtype::HardwareRevision => &mut inventory.hardware_revision,
                MedSubtype::FirmwareRevision => &mut inventory.firmware_revision,
                MedSubtype::SoftwareRevision => &mut inventory.software_revision,
                MedSubtype::SerialNumber => &mut inventory.serial_number,
                MedSubtype::Manufacturer => &mut inventory.manufacturer,
                MedSubtype::Model => &mut inventory.model,
                _ => &mut inventory.asset_id,
            };
            *field = value;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::{CaElement, Chassis, Dot3Power};
    use std::net::Ipv4Addr;

    fn sample_port() -> Port {
        let mut port = Port::with_ifname("Gi0/1");
        port.ttl = 120;
        port.description = Some("uplink".to_string());
        port.chassis = Chassis {
            id_subtype: ChassisIdSubtype::MacAddress,
            id: vec![0x00, 0x16, 0x3e, 0x01, 0x02, 0x03],
            name: Some("switch01".to_string()),
            description: Some("Example switch".to_string()),
            cap_available: SystemCapabilities::new(SystemCapabilities::BRIDGE | SystemCapabilities::ROUTER),
            cap_enabled: SystemCapabilities::new(SystemCapabilities::BRIDGE),
            mgmt: vec![MgmtAddress::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)), 5)],
            med_capabilities: 0x0f,
            med_device_type: 4,
            inventory: Some(MedInventory {
                serial_number: Some("SN123".to_string()),
                ..Default::default()
            }),
        };
        port.dot1.pvid = 100;
        port.dot1.vlans.push(Vlan {
            vid: 100,
            name: "users".to_string(),
        });
        port.dot3.mfs = 1522;
        port.dot3.power = Some(Dot3Power::pse());
        let mut policy = MedPolicy::new(MedAppType::Voice);
        policy.tagged = true;
        policy.vid = 200;
        policy.priority = 5;
        policy.dscp = 46;
        port.med.policies.push(policy);
        port.med.locations.push(
            MedLocation::civic(2, "US", &[CaElement::new(1, "CA")]).unwrap(),
        );
        port.med.power = Some(MedPower {
            power_type: MedPowerType::Pd,
            source: 1,
            priority: MedPowerPriority::High,
            value: 130,
        });
        port
    }

    fn minimal_port() -> Port {
        let mut port = Port::with_ifname("eth0");
        port.chassis.id = b"host01".to_vec();
        port.ttl = 120;
        port
    }

    #[test]
    fn test_port_survives_pdu() {
        let port = sample_port();
        let bytes = Pdu::from_port(&port).unwrap().encode();
        let decoded = Pdu::decode(&bytes).unwrap().to_port().unwrap();

        assert_eq!(decoded.unrecognized, 0);
        assert_eq!(decoded.port, port);
    }

    #[test]
    fn test_mandatory_order_enforced() {
        let tlvs = vec![
            Tlv::standard(TlvType::PortId, vec![5, b'e']).unwrap(),
            Tlv::standard(TlvType::ChassisId, vec![7, b'x']).unwrap(),
            Tlv::standard(TlvType::Ttl, vec![0, 120]).unwrap(),
        ];
        let err = Pdu::from_tlvs(tlvs).to_port().unwrap_err();
        assert_eq!(err, TlvError::MissingMandatory("chassis ID"));
    }

    #[test]
    fn test_unknown_org_tlv_is_skipped() {
        let mut tlvs = Pdu::from_port(&minimal_port()).unwrap().tlvs().to_vec();
        tlvs.push(Tlv::org([0x00, 0x00, 0x5e], 1, b"vendor").unwrap());
        tlvs.push(Tlv::new(42, b"reserved".to_vec()).unwrap());

        let decoded = Pdu::from_tlvs(tlvs).to_port().unwrap();
        assert_eq!(decoded.unrecognized, 2);
        assert_eq!(decoded.port.display_id(), "eth0");
    }

    #[test]
    fn test_frame_wrapping() {
        let pdu = Pdu::from_port(&sample_port()).unwrap();
        let frame = pdu.to_frame([0x02, 0, 0, 0, 0, 1]);
        assert_eq!(&frame[..6], &LLDP_MULTICAST_ADDR);
        assert_eq!(&frame[12..14], &[0x88, 0xcc]);
        assert_eq!(Pdu::from_frame(&frame).unwrap(), pdu);

        let mut ipv4 = frame.clone();
        ipv4[12] = 0x08;
        ipv4[13] = 0x00;
        assert_eq!(Pdu::from_frame(&ipv4), Err(TlvError::NotLldp(0x0800)));
    }

    #[test]
    fn test_truncated_policy_is_malformed() {
        let mut tlvs = Pdu::from_port(&minimal_port()).unwrap().tlvs().to_vec();
        tlvs.push(med_tlv(MedSubtype::Policy, &[1, 0]).unwrap());
        assert!(matches!(
            Pdu::from_tlvs(tlvs).to_port(),
            Err(TlvError::Malformed { tlv: "MED policy", .. })
        ));
    }

    #[test]
    fn test_overlong_length_prefixed_fields_rejected() {
        let mut port = minimal_port();
        port.dot1.vlans.push(Vlan {
            vid: 10,
            name: "v".repeat(300),
        });
        assert!(matches!(
            Pdu::from_port(&port),
            Err(TlvError::Malformed { tlv: "VLAN name", .. })
        ));

        let mut port = minimal_port();
        port.dot1.pis.push(ProtocolIdentity {
            identity: vec![0x88; 256],
        });
        assert!(matches!(
            Pdu::from_port(&port),
            Err(TlvError::Malformed { tlv: "protocol identity", .. })
        ));
    }

    #[test]
    fn test_longest_vlan_name_survives() {
        let mut port = minimal_port();
        port.dot1.vlans.push(Vlan {
            vid: 10,
            name: "v".repeat(255),
        });
        let bytes = Pdu::from_port(&port).unwrap().encode();
        let decoded = Pdu::decode(&bytes).unwrap().to_port().unwrap();
        assert_eq!(decoded.port, port);
    }
}
