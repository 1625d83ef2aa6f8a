//! Local interfaces and the hardware ports behind them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Port, PortSettings};

/// A local network interface the daemon knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Frame counters kept per hardware port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortCounters {
    #[serde(default)]
    pub tx: u64,
    #[serde(default)]
    pub rx: u64,
    #[serde(default)]
    pub rx_discarded: u64,
    #[serde(default)]
    pub rx_unrecognized: u64,
    #[serde(default)]
    pub ageout: u64,
    #[serde(default)]
    pub insert: u64,
    #[serde(default)]
    pub delete: u64,
}

/// A hardware port: the local port description plus every neighbor
/// learned on it, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardware {
    pub name: String,
    #[serde(default)]
    pub ifindex: u32,
    #[serde(default)]
    pub counters: PortCounters,
    pub local: Port,
    #[serde(default)]
    pub neighbors: Vec<Port>,
}

impl Hardware {
    /// Creates a hardware port whose local port is identified by its name.
    pub fn new(name: impl Into<String>, ifindex: u32) -> Self {
        let name = name.into();
        let local = Port::with_ifname(&name);
        Self {
            name,
            ifindex,
            counters: PortCounters::default(),
            local,
            neighbors: Vec::new(),
        }
    }

    pub fn interface(&self) -> Interface {
        Interface::new(self.name.clone())
    }

    /// Applies the changes of a set-port request to the local port.
    ///
    /// Policies and locations replace the entry with the same application
    /// type or format; power records replace the previous one.
    pub fn apply(&mut self, settings: &PortSettings) {
        let local = &mut self.local;
        if let Some(policy) = &settings.med_policy {
            local.med.set_policy(policy.clone());
        }
        if let Some(location) = &settings.med_location {
            local.med.set_location(location.clone());
        }
        if let Some(power) = &settings.med_power {
            local.med.power = Some(power.clone());
        }
        if let Some(power) = &settings.dot3_power {
            local.dot3.power = Some(power.clone());
        }
    }
}
