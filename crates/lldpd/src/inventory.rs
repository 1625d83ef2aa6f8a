//! The daemon's view of its hardware ports.
//!
//! `Inventory` is plain synchronous state. The registry actor owns one and
//! serializes access to it; in-process tests drive one directly through
//! [`crate::handle_frame`].

use chrono::Utc;
use tracing::{debug, info};

use lldp_core::{Hardware, Interface, PortSettings};
use lldp_protocol::{Request, Response};

use crate::registry::RegistryError;

/// Hardware ports indexed by interface name, kept in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    hardware: Vec<Hardware>,
}

impl Inventory {
    pub fn new(hardware: Vec<Hardware>) -> Self {
        Self { hardware }
    }

    pub fn len(&self) -> usize {
        self.hardware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hardware.is_empty()
    }

    /// Interfaces in the order they were configured.
    pub fn interfaces(&self) -> Vec<Interface> {
        self.hardware.iter().map(Hardware::interface).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Hardware> {
        self.hardware.iter().find(|hw| hw.name == name)
    }

    /// Returns a copy of the hardware port behind `name`.
    pub fn port(&self, name: &str) -> Result<Hardware, RegistryError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RegistryError::InterfaceNotFound(name.to_string()))
    }

    /// Applies `settings` to the local port of the named interface.
    ///
    /// Settings with nothing staged are accepted and leave the port as is.
    pub fn set_port(&mut self, settings: &PortSettings) -> Result<(), RegistryError> {
        let hw = self
            .hardware
            .iter_mut()
            .find(|hw| hw.name == settings.interface)
            .ok_or_else(|| RegistryError::InterfaceNotFound(settings.interface.clone()))?;

        if settings.is_empty() {
            debug!(interface = %settings.interface, "Empty set-port request");
            return Ok(());
        }

        hw.apply(settings);
        hw.local.last_change = Some(Utc::now());
        info!(
            interface = %settings.interface,
            policy = settings.med_policy.is_some(),
            location = settings.med_location.is_some(),
            med_power = settings.med_power.is_some(),
            dot3_power = settings.dot3_power.is_some(),
            "Local port updated"
        );
        Ok(())
    }

    /// Answers one decoded request.
    ///
    /// Lookup failures become a failure reply carrying the reason.
    pub fn answer(&mut self, request: Request) -> Response {
        let result = match request {
            Request::ListInterfaces => Ok(Response::Interfaces(self.interfaces())),
            Request::GetPort { name } => self.port(&name).map(|hw| Response::Port(Box::new(hw))),
            Request::SetPort(settings) => self.set_port(&settings).map(|()| Response::PortSet),
        };
        result.unwrap_or_else(|e| Response::failure(e.to_string()))
    }
}

impl From<Vec<Hardware>> for Inventory {
    fn from(hardware: Vec<Hardware>) -> Self {
        Self::new(hardware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::{MedAppType, MedPolicy, Port};

    fn inventory() -> Inventory {
        let mut eth0 = Hardware::new("eth0", 2);
        eth0.neighbors.push(Port::with_ifname("swp1"));
        Inventory::new(vec![eth0, Hardware::new("eth1", 3)])
    }

    #[test]
    fn test_interfaces_keep_order() {
        let names: Vec<String> = inventory().interfaces().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["eth0", "eth1"]);
    }

    #[test]
    fn test_port_lookup() {
        let inv = inventory();
        assert_eq!(inv.port("eth0").unwrap().neighbors.len(), 1);
        assert_eq!(
            inv.port("eth9"),
            Err(RegistryError::InterfaceNotFound("eth9".to_string()))
        );
    }

    #[test]
    fn test_set_port_applies_policy() {
        let mut inv = inventory();
        let mut settings = PortSettings::new("eth1");
        settings.med_policy = Some(MedPolicy::new(MedAppType::Voice));

        inv.set_port(&settings).unwrap();

        let local = &inv.get("eth1").unwrap().local;
        assert_eq!(local.med.policies.len(), 1);
        assert!(local.last_change.is_some());
    }

    #[test]
    fn test_empty_settings_leave_port_untouched() {
        let mut inv = inventory();
        let before = inv.clone();
        inv.set_port(&PortSettings::new("eth0")).unwrap();
        assert_eq!(inv, before);
    }

    #[test]
    fn test_answer_failure_reason() {
        let mut inv = inventory();
        let response = inv.answer(Request::get_port("eth7"));
        assert_eq!(response, Response::failure("interface not found: eth7"));
        assert_eq!(
            inv.answer(Request::SetPort(PortSettings::new("eth1"))),
            Response::PortSet
        );
    }
}
