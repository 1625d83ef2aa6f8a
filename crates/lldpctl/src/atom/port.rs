//! Port atoms and the records hanging directly off a port.
//!
//! A local port (from a get-port exchange) carries the hardware it belongs
//! to, which gives access to counters and neighbors, and accepts setters
//! that stage changes for a later set-port exchange. Remote ports are
//! read-only views on one neighbor.

use std::any::Any;
use std::sync::Arc;

use chrono::Utc;
use lldp_core::{
    Dot3Power, Hardware, MedPower, MedPowerPriority, MedPowerType, MgmtAddress, Port,
    PortSettings, PowerDeviceType, PowerPairs,
};

use super::med::{MedLocationAtom, MedPolicyAtom};
use super::{
    bounded, flag, missing, narrow, read_only, unsupported, Atom, AtomArgs, AtomKey, AtomKind,
    AtomOps, ListSource,
};
use crate::error::{CtlError, Result};

const REMOTE_KEYS: &[AtomKey] = &[
    AtomKey::PortProtocol,
    AtomKey::PortAge,
    AtomKey::PortIdSubtype,
    AtomKey::PortId,
    AtomKey::PortDescription,
    AtomKey::PortTtl,
    AtomKey::ChassisIdSubtype,
    AtomKey::ChassisId,
    AtomKey::ChassisName,
    AtomKey::ChassisDescription,
    AtomKey::ChassisCapAvailable,
    AtomKey::ChassisCapEnabled,
    AtomKey::ChassisMgmt,
    AtomKey::ChassisMedType,
    AtomKey::ChassisMedCapabilities,
    AtomKey::MedInventoryHardware,
    AtomKey::MedInventoryFirmware,
    AtomKey::MedInventorySoftware,
    AtomKey::MedInventorySerial,
    AtomKey::MedInventoryManufacturer,
    AtomKey::MedInventoryModel,
    AtomKey::MedInventoryAsset,
    AtomKey::PortMfs,
    AtomKey::PortAggregationId,
    AtomKey::PortAutonegSupport,
    AtomKey::PortAutonegEnabled,
    AtomKey::PortAutonegAdvertised,
    AtomKey::PortMauType,
    AtomKey::PortDot3Power,
    AtomKey::PortPvid,
    AtomKey::PortVlans,
    AtomKey::PortPpvids,
    AtomKey::PortPis,
    AtomKey::PortMedPolicies,
    AtomKey::PortMedLocations,
    AtomKey::PortMedPower,
];

const LOCAL_KEYS: &[AtomKey] = &[
    AtomKey::PortProtocol,
    AtomKey::PortAge,
    AtomKey::PortIdSubtype,
    AtomKey::PortId,
    AtomKey::PortDescription,
    AtomKey::PortTtl,
    AtomKey::TxCount,
    AtomKey::RxCount,
    AtomKey::RxDiscardedCount,
    AtomKey::RxUnrecognizedCount,
    AtomKey::AgeoutCount,
    AtomKey::InsertCount,
    AtomKey::DeleteCount,
    AtomKey::ChassisIdSubtype,
    AtomKey::ChassisId,
    AtomKey::ChassisName,
    AtomKey::ChassisDescription,
    AtomKey::ChassisCapAvailable,
    AtomKey::ChassisCapEnabled,
    AtomKey::ChassisMgmt,
    AtomKey::ChassisMedType,
    AtomKey::ChassisMedCapabilities,
    AtomKey::PortMfs,
    AtomKey::PortAggregationId,
    AtomKey::PortAutonegSupport,
    AtomKey::PortAutonegEnabled,
    AtomKey::PortAutonegAdvertised,
    AtomKey::PortMauType,
    AtomKey::PortDot3Power,
    AtomKey::PortPvid,
    AtomKey::PortVlans,
    AtomKey::PortPpvids,
    AtomKey::PortPis,
    AtomKey::PortMedPolicies,
    AtomKey::PortMedLocations,
    AtomKey::PortMedPower,
    AtomKey::PortNeighbors,
];

// ============================================================================
// Port
// ============================================================================

#[derive(Debug)]
pub(crate) struct PortAtom {
    /// Present for local ports only
    hardware: Option<Arc<Hardware>>,
    port: Arc<Port>,
    /// Changes made through setters, sent by set-port
    staged: PortSettings,
}

impl PortAtom {
    pub(crate) fn local(hardware: Hardware) -> Self {
        Self {
            port: Arc::new(hardware.local.clone()),
            staged: PortSettings::new(hardware.name.clone()),
            hardware: Some(Arc::new(hardware)),
        }
    }

    pub(crate) fn remote(port: Port) -> Self {
        Self {
            hardware: None,
            port: Arc::new(port),
            staged: PortSettings::default(),
        }
    }

    pub(crate) fn port(&self) -> Arc<Port> {
        Arc::clone(&self.port)
    }

    pub(crate) fn is_local(&self) -> bool {
        self.hardware.is_some()
    }

    /// Settings to push with a set-port exchange; local ports only.
    pub(crate) fn settings(&self) -> Option<&PortSettings> {
        self.hardware.as_ref().map(|_| &self.staged)
    }

    pub(super) fn neighbors_source(&self, this: &Atom) -> Result<ListSource> {
        self.hardware
            .as_ref()
            .map(|hw| ListSource::Neighbors(Arc::clone(hw)))
            .ok_or_else(|| unsupported(this, AtomKey::PortNeighbors))
    }

    /// Current 802.3 power settings. A local port without any gets a
    /// disabled PSE record to start from.
    pub(super) fn dot3_power(&self) -> Result<Dot3Power> {
        match (&self.port.dot3.power, self.is_local()) {
            (Some(power), _) => Ok(power.clone()),
            (None, true) => Ok(Dot3Power {
                supported: false,
                enabled: false,
                ..Dot3Power::pse()
            }),
            (None, false) => Err(missing(AtomKey::PortDot3Power)),
        }
    }

    pub(super) fn med_power(&self) -> Result<MedPower> {
        match (&self.port.med.power, self.is_local()) {
            (Some(power), _) => Ok(power.clone()),
            (None, true) => Ok(MedPower {
                power_type: MedPowerType::Pse,
                source: 0,
                priority: MedPowerPriority::Low,
                value: 0,
            }),
            (None, false) => Err(missing(AtomKey::PortMedPower)),
        }
    }

    fn hardware(&self, this: &Atom, key: AtomKey) -> Result<&Hardware> {
        self.hardware
            .as_deref()
            .ok_or_else(|| unsupported(this, key))
    }

    fn inventory(&self, key: AtomKey) -> Result<String> {
        let inventory = self
            .port
            .chassis
            .inventory
            .as_ref()
            .ok_or_else(|| missing(key))?;
        let value = match key {
            AtomKey::MedInventoryHardware => &inventory.hardware_revision,
            AtomKey::MedInventoryFirmware => &inventory.firmware_revision,
            AtomKey::MedInventorySoftware => &inventory.software_revision,
            AtomKey::MedInventorySerial => &inventory.serial_number,
            AtomKey::MedInventoryManufacturer => &inventory.manufacturer,
            AtomKey::MedInventoryModel => &inventory.model,
            _ => &inventory.asset_id,
        };
        value.clone().ok_or_else(|| missing(key))
    }
}

fn expected(kind: AtomKind, value: &Atom) -> CtlError {
    CtlError::incorrect_atom_type(format!("expected a {kind} atom, got {}", value.kind()))
}

impl AtomOps for PortAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        if self.is_local() {
            LOCAL_KEYS
        } else {
            REMOTE_KEYS
        }
    }

    fn get(&self, this: &Atom, key: AtomKey) -> Result<Atom> {
        let port = this.clone();
        let args = match key {
            AtomKey::PortNeighbors => AtomArgs::PortsList { port },
            AtomKey::ChassisMgmt => AtomArgs::MgmtsList { port },
            AtomKey::PortDot3Power => AtomArgs::Dot3Power { port },
            AtomKey::PortVlans => AtomArgs::VlansList { port },
            AtomKey::PortPpvids => AtomArgs::PpvidsList { port },
            AtomKey::PortPis => AtomArgs::PisList { port },
            AtomKey::PortMedPolicies => AtomArgs::MedPoliciesList { port },
            AtomKey::PortMedLocations => AtomArgs::MedLocationsList { port },
            AtomKey::PortMedPower => AtomArgs::MedPower { port },
            _ => return Err(unsupported(this, key)),
        };
        Atom::new(args)
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        let port = &self.port;
        let chassis = &port.chassis;
        match key {
            AtomKey::PortProtocol => Ok(port.protocol.name().to_string()),
            AtomKey::PortIdSubtype => Ok(port.id_subtype.name().to_string()),
            AtomKey::PortId => Ok(port.display_id()),
            AtomKey::PortDescription => port.description.clone().ok_or_else(|| missing(key)),
            AtomKey::ChassisIdSubtype => Ok(chassis.id_subtype.name().to_string()),
            AtomKey::ChassisId => Ok(chassis.display_id()),
            AtomKey::ChassisName => chassis.name.clone().ok_or_else(|| missing(key)),
            AtomKey::ChassisDescription => chassis.description.clone().ok_or_else(|| missing(key)),
            AtomKey::ChassisCapAvailable => Ok(chassis.cap_available.to_string()),
            AtomKey::ChassisCapEnabled => Ok(chassis.cap_enabled.to_string()),
            AtomKey::MedInventoryHardware
            | AtomKey::MedInventoryFirmware
            | AtomKey::MedInventorySoftware
            | AtomKey::MedInventorySerial
            | AtomKey::MedInventoryManufacturer
            | AtomKey::MedInventoryModel
            | AtomKey::MedInventoryAsset => self.inventory(key),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_buffer(&self, this: &Atom, key: AtomKey) -> Result<Vec<u8>> {
        match key {
            AtomKey::PortId => Ok(self.port.id.clone()),
            AtomKey::ChassisId => Ok(self.port.chassis.id.clone()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        let port = &self.port;
        let chassis = &port.chassis;
        let macphy = &port.dot3.macphy;
        let value = match key {
            AtomKey::PortProtocol => i64::from(port.protocol.value()),
            AtomKey::PortAge => port.age_seconds(Utc::now()),
            AtomKey::PortIdSubtype => i64::from(port.id_subtype.value()),
            AtomKey::PortTtl => i64::from(port.ttl),
            AtomKey::TxCount
            | AtomKey::RxCount
            | AtomKey::RxDiscardedCount
            | AtomKey::RxUnrecognizedCount
            | AtomKey::AgeoutCount
            | AtomKey::InsertCount
            | AtomKey::DeleteCount => {
                let counters = &self.hardware(this, key)?.counters;
                let count = match key {
                    AtomKey::TxCount => counters.tx,
                    AtomKey::RxCount => counters.rx,
                    AtomKey::RxDiscardedCount => counters.rx_discarded,
                    AtomKey::RxUnrecognizedCount => counters.rx_unrecognized,
                    AtomKey::AgeoutCount => counters.ageout,
                    AtomKey::InsertCount => counters.insert,
                    _ => counters.delete,
                };
                i64::try_from(count).unwrap_or(i64::MAX)
            }
            AtomKey::ChassisIdSubtype => i64::from(chassis.id_subtype.value()),
            AtomKey::ChassisCapAvailable => i64::from(chassis.cap_available.bits()),
            AtomKey::ChassisCapEnabled => i64::from(chassis.cap_enabled.bits()),
            AtomKey::ChassisMedType => i64::from(chassis.med_device_type),
            AtomKey::ChassisMedCapabilities => i64::from(chassis.med_capabilities),
            AtomKey::PortMfs => i64::from(port.dot3.mfs),
            AtomKey::PortAggregationId => i64::from(port.dot3.aggregation_id),
            AtomKey::PortAutonegSupport => flag(macphy.autoneg_support),
            AtomKey::PortAutonegEnabled => flag(macphy.autoneg_enabled),
            AtomKey::PortAutonegAdvertised => i64::from(macphy.autoneg_advertised),
            AtomKey::PortMauType => i64::from(macphy.mau_type),
            AtomKey::PortPvid => i64::from(port.dot1.pvid),
            _ => return Err(unsupported(this, key)),
        };
        Ok(value)
    }

    fn set(&self, this: &Atom, key: AtomKey, value: &Atom) -> Result<Atom> {
        if !self.is_local() {
            return Err(read_only(this, key));
        }
        let mut port = Port::clone(&self.port);
        let mut staged = self.staged.clone();
        match key {
            AtomKey::PortDot3Power => {
                let power = value
                    .downcast::<Dot3PowerAtom>()
                    .ok_or_else(|| expected(AtomKind::Dot3Power, value))?
                    .power
                    .clone();
                port.dot3.power = Some(power.clone());
                staged.dot3_power = Some(power);
            }
            AtomKey::PortMedPolicies => {
                let policy = value
                    .downcast::<MedPolicyAtom>()
                    .ok_or_else(|| expected(AtomKind::MedPolicy, value))?
                    .policy()
                    .clone();
                policy.validate()?;
                port.med.set_policy(policy.clone());
                staged.med_policy = Some(policy);
            }
            AtomKey::PortMedLocations => {
                let location = value
                    .downcast::<MedLocationAtom>()
                    .ok_or_else(|| expected(AtomKind::MedLocation, value))?
                    .location()
                    .clone();
                location.validate()?;
                port.med.set_location(location.clone());
                staged.med_location = Some(location);
            }
            AtomKey::PortMedPower => {
                let power = value
                    .downcast::<MedPowerAtom>()
                    .ok_or_else(|| expected(AtomKind::MedPower, value))?
                    .power
                    .clone();
                port.med.power = Some(power.clone());
                staged.med_power = Some(power);
            }
            _ => return Err(read_only(this, key)),
        }
        Ok(this.with_ops(PortAtom {
            hardware: self.hardware.clone(),
            port: Arc::new(port),
            staged,
        }))
    }
}

// ============================================================================
// Management Address
// ============================================================================

#[derive(Debug)]
pub(super) struct MgmtAtom {
    address: MgmtAddress,
}

impl MgmtAtom {
    pub(super) fn new(address: MgmtAddress) -> Self {
        Self { address }
    }
}

impl AtomOps for MgmtAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[AtomKey::MgmtIp, AtomKey::MgmtInterfaceIndex]
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::MgmtIp => Ok(self.address.address.to_string()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::MgmtInterfaceIndex => Ok(i64::from(self.address.iface)),
            _ => Err(unsupported(this, key)),
        }
    }
}

// ============================================================================
// 802.3 Power
// ============================================================================

const DOT3_POWER_KEYS: &[AtomKey] = &[
    AtomKey::Dot3PowerDeviceType,
    AtomKey::Dot3PowerSupported,
    AtomKey::Dot3PowerEnabled,
    AtomKey::Dot3PowerPairControl,
    AtomKey::Dot3PowerPairs,
    AtomKey::Dot3PowerClass,
    AtomKey::Dot3PowerType,
    AtomKey::Dot3PowerSource,
    AtomKey::Dot3PowerPriority,
    AtomKey::Dot3PowerRequested,
    AtomKey::Dot3PowerAllocated,
];

#[derive(Debug)]
pub(super) struct Dot3PowerAtom {
    power: Dot3Power,
}

impl Dot3PowerAtom {
    pub(super) fn new(power: Dot3Power) -> Self {
        Self { power }
    }
}

impl AtomOps for Dot3PowerAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        DOT3_POWER_KEYS
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::Dot3PowerDeviceType => Ok(self.power.device_type.name().to_string()),
            AtomKey::Dot3PowerPairs => Ok(self.power.pairs.name().to_string()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        let p = &self.power;
        let value = match key {
            AtomKey::Dot3PowerDeviceType => i64::from(p.device_type.value()),
            AtomKey::Dot3PowerSupported => flag(p.supported),
            AtomKey::Dot3PowerEnabled => flag(p.enabled),
            AtomKey::Dot3PowerPairControl => flag(p.pair_control),
            AtomKey::Dot3PowerPairs => i64::from(p.pairs.value()),
            AtomKey::Dot3PowerClass => i64::from(p.class),
            AtomKey::Dot3PowerType => i64::from(p.power_type),
            AtomKey::Dot3PowerSource => i64::from(p.source),
            AtomKey::Dot3PowerPriority => i64::from(p.priority),
            AtomKey::Dot3PowerRequested => i64::from(p.requested),
            AtomKey::Dot3PowerAllocated => i64::from(p.allocated),
            _ => return Err(unsupported(this, key)),
        };
        Ok(value)
    }

    fn set_int(&self, this: &Atom, key: AtomKey, value: i64) -> Result<Atom> {
        let mut power = self.power.clone();
        match key {
            AtomKey::Dot3PowerDeviceType => {
                power.device_type = PowerDeviceType::from_u8(narrow(key, value)?)?
            }
            AtomKey::Dot3PowerSupported => power.supported = value != 0,
            AtomKey::Dot3PowerEnabled => power.enabled = value != 0,
            AtomKey::Dot3PowerPairControl => power.pair_control = value != 0,
            AtomKey::Dot3PowerPairs => power.pairs = PowerPairs::from_u8(narrow(key, value)?)?,
            AtomKey::Dot3PowerClass => power.class = bounded(key, value, Dot3Power::MAX_CLASS)?,
            AtomKey::Dot3PowerType => {
                power.power_type = bounded(key, value, Dot3Power::MAX_POWER_TYPE)?
            }
            AtomKey::Dot3PowerSource => power.source = bounded(key, value, 3u8)?,
            AtomKey::Dot3PowerPriority => {
                power.priority = bounded(key, value, Dot3Power::MAX_PRIORITY)?
            }
            AtomKey::Dot3PowerRequested => power.requested = narrow(key, value)?,
            AtomKey::Dot3PowerAllocated => power.allocated = narrow(key, value)?,
            _ => return Err(read_only(this, key)),
        }
        Ok(this.with_ops(Dot3PowerAtom { power }))
    }

    fn set_str(&self, this: &Atom, key: AtomKey, value: &str) -> Result<Atom> {
        let mut power = self.power.clone();
        match key {
            AtomKey::Dot3PowerDeviceType => {
                power.device_type = [PowerDeviceType::Pse, PowerDeviceType::Pd]
                    .into_iter()
                    .find(|t| t.name().eq_ignore_ascii_case(value))
                    .ok_or_else(|| CtlError::bad_value(format!("unknown device type {value:?}")))?
            }
            AtomKey::Dot3PowerPairs => {
                power.pairs = [PowerPairs::Signal, PowerPairs::Spare]
                    .into_iter()
                    .find(|p| p.name().eq_ignore_ascii_case(value))
                    .ok_or_else(|| CtlError::bad_value(format!("unknown power pairs {value:?}")))?
            }
            _ => return Err(read_only(this, key)),
        }
        Ok(this.with_ops(Dot3PowerAtom { power }))
    }
}

// ============================================================================
// MED Power
// ============================================================================

/// Largest MED power value, in units of 0.1 W.
const MAX_MED_POWER: u16 = 1023;

#[derive(Debug)]
pub(super) struct MedPowerAtom {
    power: MedPower,
}

impl MedPowerAtom {
    pub(super) fn new(power: MedPower) -> Self {
        Self { power }
    }
}

impl AtomOps for MedPowerAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[
            AtomKey::MedPowerType,
            AtomKey::MedPowerSource,
            AtomKey::MedPowerPriority,
            AtomKey::MedPowerValue,
        ]
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::MedPowerType => Ok(self.power.power_type.name().to_string()),
            AtomKey::MedPowerPriority => Ok(self.power.priority.name().to_string()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::MedPowerType => Ok(i64::from(self.power.power_type.value())),
            AtomKey::MedPowerSource => Ok(i64::from(self.power.source)),
            AtomKey::MedPowerPriority => Ok(i64::from(self.power.priority.value())),
            AtomKey::MedPowerValue => Ok(i64::from(self.power.value)),
            _ => Err(unsupported(this, key)),
        }
    }

    fn set_int(&self, this: &Atom, key: AtomKey, value: i64) -> Result<Atom> {
        let mut power = self.power.clone();
        match key {
            AtomKey::MedPowerType => power.power_type = MedPowerType::from_u8(narrow(key, value)?)?,
            AtomKey::MedPowerSource => power.source = bounded(key, value, 3u8)?,
            AtomKey::MedPowerPriority => {
                power.priority = MedPowerPriority::from_u8(narrow(key, value)?)?
            }
            AtomKey::MedPowerValue => power.value = bounded(key, value, MAX_MED_POWER)?,
            _ => return Err(read_only(this, key)),
        }
        Ok(this.with_ops(MedPowerAtom { power }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionId;
    use crate::error::ErrorCode;
    use lldp_core::{
        Chassis, LocationFormat, MedAppType, MedInventory, MedLocation, MedPolicy, MgmtAddress,
        PortCounters,
    };
    use std::net::{IpAddr, Ipv4Addr};

    fn hardware() -> Hardware {
        let mut hw = Hardware::new("eth1", 3);
        hw.counters = PortCounters {
            tx: 12,
            rx: 9,
            ..Default::default()
        };
        hw.local.description = Some("uplink".to_string());
        hw.local.dot3.mfs = 1518;
        let mut neighbor = Port::with_ifname("Gi0/2");
        neighbor.chassis = Chassis {
            name: Some("sw".to_string()),
            mgmt: vec![MgmtAddress::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 5)],
            inventory: Some(MedInventory {
                model: Some("X100".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        hw.neighbors.push(neighbor);
        hw
    }

    fn local() -> Atom {
        Atom::new(AtomArgs::Port {
            conn: Some(ConnectionId::next()),
            hardware: hardware(),
        })
        .unwrap()
    }

    fn remote() -> Atom {
        local()
            .get(AtomKey::PortNeighbors)
            .unwrap()
            .children()
            .unwrap()
            .next()
            .unwrap()
    }

    #[test]
    fn test_local_port_getters() {
        let port = local();
        assert_eq!(port.get_str(AtomKey::PortId).unwrap(), "eth1");
        assert_eq!(port.get_buffer(AtomKey::PortId).unwrap(), b"eth1");
        assert_eq!(port.get_str(AtomKey::PortDescription).unwrap(), "uplink");
        assert_eq!(port.get_int(AtomKey::PortMfs).unwrap(), 1518);
        assert_eq!(port.get_int(AtomKey::TxCount).unwrap(), 12);
        assert_eq!(port.get_str(AtomKey::PortProtocol).unwrap(), "LLDP");
        assert_eq!(port.get_int(AtomKey::PortAge).unwrap(), 0);
    }

    #[test]
    fn test_remote_port_getters() {
        let port = remote();
        assert_eq!(port.get_str(AtomKey::ChassisName).unwrap(), "sw");
        assert_eq!(port.get_str(AtomKey::MedInventoryModel).unwrap(), "X100");
        assert_eq!(
            port.get_str(AtomKey::MedInventorySerial).unwrap_err().code(),
            ErrorCode::NotExist
        );
        assert_eq!(
            port.get_int(AtomKey::TxCount).unwrap_err().code(),
            ErrorCode::IncorrectAtomType
        );
        assert_eq!(
            port.get(AtomKey::PortNeighbors).unwrap_err().code(),
            ErrorCode::IncorrectAtomType
        );

        let mgmt = port.get(AtomKey::ChassisMgmt).unwrap();
        let addr = mgmt.children().unwrap().next().unwrap();
        assert_eq!(addr.get_str(AtomKey::MgmtIp).unwrap(), "192.0.2.1");
        assert_eq!(addr.get_int(AtomKey::MgmtInterfaceIndex).unwrap(), 5);
    }

    #[test]
    fn test_missing_description() {
        let err = remote().get_str(AtomKey::PortDescription).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotExist);
    }

    #[test]
    fn test_stage_med_policy() {
        let port = local();
        let policies = port.get(AtomKey::PortMedPolicies).unwrap();
        let policy = policies
            .create()
            .unwrap()
            .set_int(AtomKey::MedPolicyVid, 100)
            .unwrap();

        let updated = port.set(AtomKey::PortMedPolicies, &policy).unwrap();
        assert!(!updated.ptr_eq(&port));

        let staged = updated.downcast::<PortAtom>().unwrap().settings().unwrap();
        assert_eq!(staged.interface, "eth1");
        let mut expected = MedPolicy::new(MedAppType::Voice);
        expected.vid = 100;
        assert_eq!(staged.med_policy, Some(expected));

        // The change is visible through the new atom only
        assert_eq!(updated.get(AtomKey::PortMedPolicies).unwrap().count().unwrap(), 1);
        assert_eq!(port.get(AtomKey::PortMedPolicies).unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_stage_dot3_power() {
        let port = local();
        let power = port
            .get(AtomKey::PortDot3Power)
            .unwrap()
            .set_int(AtomKey::Dot3PowerEnabled, 1)
            .unwrap()
            .set_str(AtomKey::Dot3PowerPairs, "spare")
            .unwrap();
        assert_eq!(power.get_int(AtomKey::Dot3PowerPairs).unwrap(), 2);

        let updated = port.set(AtomKey::PortDot3Power, &power).unwrap();
        let staged = updated.downcast::<PortAtom>().unwrap().settings().unwrap();
        let staged_power = staged.dot3_power.as_ref().unwrap();
        assert!(staged_power.enabled);
        assert_eq!(staged_power.pairs, PowerPairs::Spare);
    }

    #[test]
    fn test_dot3_power_range_checks() {
        let power = local().get(AtomKey::PortDot3Power).unwrap();
        let err = power.set_int(AtomKey::Dot3PowerClass, 9).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadValue);
        let err = power.set_int(AtomKey::Dot3PowerPairs, 7).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadValue);
    }

    #[test]
    fn test_remote_port_is_read_only() {
        let port = remote();
        let policy = Atom::new(AtomArgs::MedPolicy {
            port: None,
            policy: MedPolicy::new(MedAppType::Voice),
        })
        .unwrap();
        let err = port.set(AtomKey::PortMedPolicies, &policy).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);
    }

    #[test]
    fn test_oversized_location_not_staged() {
        let port = local();
        let location = Atom::new(AtomArgs::MedLocation {
            port: None,
            location: MedLocation::new(
                LocationFormat::Coordinates,
                vec![0; MedLocation::MAX_DATA_LEN + 1],
            ),
        })
        .unwrap();
        let err = port.set(AtomKey::PortMedLocations, &location).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadValue);
    }

    #[test]
    fn test_set_rejects_wrong_value_kind() {
        let port = local();
        let vlans = port.get(AtomKey::PortVlans).unwrap();
        let err = port.set(AtomKey::PortMedPower, &vlans).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);
    }

    #[test]
    fn test_med_power_setters() {
        let power = local()
            .get(AtomKey::PortMedPower)
            .unwrap()
            .set_int(AtomKey::MedPowerValue, 150)
            .unwrap()
            .set_int(AtomKey::MedPowerPriority, 2)
            .unwrap();
        assert_eq!(power.get_str(AtomKey::MedPowerPriority).unwrap(), "high");
        assert_eq!(power.get_int(AtomKey::MedPowerValue).unwrap(), 150);
        assert!(power.set_int(AtomKey::MedPowerValue, 5000).is_err());
    }
}
