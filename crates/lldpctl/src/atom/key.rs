//! Attribute keys understood by atoms.

use std::fmt;

/// How the value behind a key is best read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Text, through `get_str`
    Text,
    /// Number, through `get_int`
    Integer,
    /// Enumeration: `get_int` gives the wire value, `get_str` its name
    Enum,
    /// Raw bytes, through `get_buffer`
    Bytes,
    /// Child atom, through `get`
    Atom,
}

macro_rules! atom_keys {
    (
        $( $(#[$meta:meta])* $variant:ident => $name:literal : $ty:ident ),+ $(,)?
    ) => {
        /// Closed set of attribute keys.
        ///
        /// Each atom kind accepts a subset of these; any other key fails
        /// with `ErrorCode::IncorrectAtomType`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AtomKey {
            $( $(#[$meta])* $variant ),+
        }

        impl AtomKey {
            pub const ALL: &'static [AtomKey] = &[$( Self::$variant ),+];

            /// Dotted name of the key, as printed by the dump utility.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name ),+
                }
            }

            pub const fn value_type(self) -> ValueType {
                match self {
                    $( Self::$variant => ValueType::$ty ),+
                }
            }
        }
    };
}

atom_keys! {
    InterfaceName => "interface.name": Text,

    PortProtocol => "port.protocol": Enum,
    PortAge => "port.age": Integer,
    PortIdSubtype => "port.id_subtype": Enum,
    PortId => "port.id": Text,
    PortDescription => "port.description": Text,
    PortTtl => "port.ttl": Integer,
    PortNeighbors => "port.neighbors": Atom,

    /// Local port counters
    TxCount => "port.counters.tx": Integer,
    RxCount => "port.counters.rx": Integer,
    RxDiscardedCount => "port.counters.rx_discarded": Integer,
    RxUnrecognizedCount => "port.counters.rx_unrecognized": Integer,
    AgeoutCount => "port.counters.ageout": Integer,
    InsertCount => "port.counters.insert": Integer,
    DeleteCount => "port.counters.delete": Integer,

    ChassisIdSubtype => "chassis.id_subtype": Enum,
    ChassisId => "chassis.id": Text,
    ChassisName => "chassis.name": Text,
    ChassisDescription => "chassis.description": Text,
    ChassisCapAvailable => "chassis.cap_available": Integer,
    ChassisCapEnabled => "chassis.cap_enabled": Integer,
    ChassisMgmt => "chassis.mgmt": Atom,
    ChassisMedType => "chassis.med.type": Integer,
    ChassisMedCapabilities => "chassis.med.capabilities": Integer,
    MedInventoryHardware => "chassis.med.inventory.hardware": Text,
    MedInventoryFirmware => "chassis.med.inventory.firmware": Text,
    MedInventorySoftware => "chassis.med.inventory.software": Text,
    MedInventorySerial => "chassis.med.inventory.serial": Text,
    MedInventoryManufacturer => "chassis.med.inventory.manufacturer": Text,
    MedInventoryModel => "chassis.med.inventory.model": Text,
    MedInventoryAsset => "chassis.med.inventory.asset": Text,

    MgmtIp => "mgmt.ip": Text,
    MgmtInterfaceIndex => "mgmt.iface_index": Integer,

    PortMfs => "port.dot3.mfs": Integer,
    PortAggregationId => "port.dot3.aggregation_id": Integer,
    PortAutonegSupport => "port.dot3.autoneg.support": Integer,
    PortAutonegEnabled => "port.dot3.autoneg.enabled": Integer,
    PortAutonegAdvertised => "port.dot3.autoneg.advertised": Integer,
    PortMauType => "port.dot3.mau_type": Integer,
    PortDot3Power => "port.dot3.power": Atom,

    Dot3PowerDeviceType => "dot3.power.device_type": Enum,
    Dot3PowerSupported => "dot3.power.supported": Integer,
    Dot3PowerEnabled => "dot3.power.enabled": Integer,
    Dot3PowerPairControl => "dot3.power.pair_control": Integer,
    Dot3PowerPairs => "dot3.power.pairs": Enum,
    Dot3PowerClass => "dot3.power.class": Integer,
    Dot3PowerType => "dot3.power.type": Integer,
    Dot3PowerSource => "dot3.power.source": Integer,
    Dot3PowerPriority => "dot3.power.priority": Integer,
    Dot3PowerRequested => "dot3.power.requested": Integer,
    Dot3PowerAllocated => "dot3.power.allocated": Integer,

    PortPvid => "port.dot1.pvid": Integer,
    PortVlans => "port.dot1.vlans": Atom,
    PortPpvids => "port.dot1.ppvids": Atom,
    PortPis => "port.dot1.pis": Atom,
    VlanId => "vlan.id": Integer,
    VlanName => "vlan.name": Text,
    PpvidStatus => "ppvid.status": Integer,
    PpvidId => "ppvid.id": Integer,
    PiId => "pi.id": Bytes,

    PortMedPolicies => "port.med.policies": Atom,
    PortMedLocations => "port.med.locations": Atom,
    PortMedPower => "port.med.power": Atom,

    MedPolicyType => "med.policy.type": Enum,
    MedPolicyUnknown => "med.policy.unknown": Integer,
    MedPolicyTagged => "med.policy.tagged": Integer,
    MedPolicyVid => "med.policy.vid": Integer,
    MedPolicyPriority => "med.policy.priority": Integer,
    MedPolicyDscp => "med.policy.dscp": Integer,

    MedLocationFormat => "med.location.format": Enum,
    MedLocationData => "med.location.data": Bytes,
    MedLocationCountry => "med.location.country": Text,
    MedLocationElin => "med.location.elin": Text,
    MedLocationCaElements => "med.location.ca_elements": Atom,

    MedCivicType => "med.civic.type": Integer,
    MedCivicValue => "med.civic.value": Text,

    MedPowerType => "med.power.type": Enum,
    MedPowerSource => "med.power.source": Integer,
    MedPowerPriority => "med.power.priority": Enum,
    MedPowerValue => "med.power.value": Integer,
}

impl fmt::Display for AtomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
