//! IEEE 802.3 organizationally specific records.

use serde::{Deserialize, Serialize};

use crate::values::wire_enum;

wire_enum! {
    /// Power-over-Ethernet device type.
    pub enum PowerDeviceType: "power device type" {
        Pse = 1 => "PSE",
        Pd = 2 => "PD",
    }
}

wire_enum! {
    /// Pairs used to deliver power.
    pub enum PowerPairs: "power pairs" {
        Signal = 1 => "signal",
        Spare = 2 => "spare",
    }
}

/// MAC/PHY configuration and status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacPhy {
    #[serde(default)]
    pub autoneg_support: bool,
    #[serde(default)]
    pub autoneg_enabled: bool,
    /// Advertised capabilities bitmap (RFC 3636 ifMauAutoNegCapAdvertisedBits)
    #[serde(default)]
    pub autoneg_advertised: u16,
    /// Operational MAU type
    #[serde(default)]
    pub mau_type: u16,
}

/// Power-over-Ethernet (802.3at) information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot3Power {
    pub device_type: PowerDeviceType,
    #[serde(default)]
    pub supported: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub pair_control: bool,
    pub pairs: PowerPairs,
    /// Power class 0-4
    #[serde(default)]
    pub class: u8,
    /// 0 = not 802.3at, 1 = type 1, 2 = type 2
    #[serde(default)]
    pub power_type: u8,
    #[serde(default)]
    pub source: u8,
    #[serde(default)]
    pub priority: u8,
    /// Requested power in units of 0.1 W
    #[serde(default)]
    pub requested: u16,
    /// Allocated power in units of 0.1 W
    #[serde(default)]
    pub allocated: u16,
}

impl Dot3Power {
    pub const MAX_CLASS: u8 = 4;
    pub const MAX_POWER_TYPE: u8 = 2;
    pub const MAX_PRIORITY: u8 = 3;

    /// A PSE offering power on the signal pairs.
    pub fn pse() -> Self {
        Self {
            device_type: PowerDeviceType::Pse,
            supported: true,
            enabled: true,
            pair_control: false,
            pairs: PowerPairs::Signal,
            class: 0,
            power_type: 0,
            source: 0,
            priority: 0,
            requested: 0,
            allocated: 0,
        }
    }
}

/// All 802.3 information attached to a port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dot3 {
    #[serde(default)]
    pub macphy: MacPhy,
    /// Aggregated port identifier, 0 when not aggregated
    #[serde(default)]
    pub aggregation_id: u32,
    /// Maximum frame size
    #[serde(default)]
    pub mfs: u16,
    #[serde(default)]
    pub power: Option<Dot3Power>,
}
