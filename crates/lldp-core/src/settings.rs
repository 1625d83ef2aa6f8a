//! Body of a set-port request.

use serde::{Deserialize, Serialize};

use crate::{Dot3Power, MedLocation, MedPolicy, MedPower};

/// Changes to push to one local port.
///
/// Only the fields that are `Some` are applied by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortSettings {
    /// Name of the interface owning the port
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_policy: Option<MedPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_location: Option<MedLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_power: Option<MedPower>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot3_power: Option<Dot3Power>,
}

impl PortSettings {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            ..Default::default()
        }
    }

    /// Returns true when no change is staged.
    pub fn is_empty(&self) -> bool {
        self.med_policy.is_none()
            && self.med_location.is_none()
            && self.med_power.is_none()
            && self.dot3_power.is_none()
    }
}
