//! LLDP-MED (ANSI/TIA-1057) records: network policies, locations,
//! extended power and inventory.

use serde::{Deserialize, Serialize};

use crate::values::wire_enum;
use crate::{DomainError, DomainResult};

wire_enum! {
    /// Network policy application type.
    pub enum MedAppType: "med application type" {
        Voice = 1 => "Voice",
        VoiceSignaling = 2 => "Voice Signaling",
        GuestVoice = 3 => "Guest Voice",
        GuestVoiceSignaling = 4 => "Guest Voice Signaling",
        SoftphoneVoice = 5 => "Softphone Voice",
        VideoConferencing = 6 => "Video Conferencing",
        StreamingVideo = 7 => "Streaming Video",
        VideoSignaling = 8 => "Video Signaling",
    }
}

wire_enum! {
    /// Location data format.
    pub enum LocationFormat: "location format" {
        Coordinates = 1 => "Coordinates",
        CivicAddress = 2 => "Civic address",
        Elin = 3 => "ELIN",
    }
}

wire_enum! {
    /// Extended power-via-MDI device type.
    pub enum MedPowerType: "med power type" {
        Pse = 1 => "PSE device",
        Pd = 2 => "PD device",
    }
}

wire_enum! {
    /// Extended power-via-MDI priority.
    pub enum MedPowerPriority: "med power priority" {
        Critical = 1 => "critical",
        High = 2 => "high",
        Low = 3 => "low",
    }
}

/// MED capability bits.
pub mod capability {
    pub const CAPABILITIES: u16 = 0x01;
    pub const POLICY: u16 = 0x02;
    pub const LOCATION: u16 = 0x04;
    pub const MDI_PSE: u16 = 0x08;
    pub const MDI_PD: u16 = 0x10;
    pub const INVENTORY: u16 = 0x20;
}

/// Network policy for one application type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedPolicy {
    pub app_type: MedAppType,
    /// Policy is required by the device but currently unknown
    #[serde(default)]
    pub unknown: bool,
    #[serde(default)]
    pub tagged: bool,
    #[serde(default)]
    pub vid: u16,
    /// 802.1p priority
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub dscp: u8,
}

impl MedPolicy {
    pub const MAX_VID: u16 = 4094;
    pub const MAX_PRIORITY: u8 = 7;
    pub const MAX_DSCP: u8 = 63;

    /// Creates an untagged policy with every value at zero.
    pub fn new(app_type: MedAppType) -> Self {
        Self {
            app_type,
            unknown: false,
            tagged: false,
            vid: 0,
            priority: 0,
            dscp: 0,
        }
    }

    /// Checks every field is within its wire range.
    pub fn validate(&self) -> DomainResult<()> {
        if self.vid > Self::MAX_VID {
            return Err(DomainError::invalid("vid", self.vid, "0-4094"));
        }
        if self.priority > Self::MAX_PRIORITY {
            return Err(DomainError::invalid("priority", self.priority, "0-7"));
        }
        if self.dscp > Self::MAX_DSCP {
            return Err(DomainError::invalid("dscp", self.dscp, "0-63"));
        }
        Ok(())
    }
}

/// One civic address element (RFC 4776 CAtype + value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaElement {
    pub ca_type: u8,
    pub value: String,
}

impl CaElement {
    pub fn new(ca_type: u8, value: impl Into<String>) -> Self {
        Self {
            ca_type,
            value: value.into(),
        }
    }
}

/// Location identification in one of the three MED formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedLocation {
    pub format: LocationFormat,
    #[serde(default)]
    pub data: Vec<u8>,
}

/// Civic header: LCI length, "what" and the two-letter country code.
const CIVIC_HEADER_LEN: usize = 4;

impl MedLocation {
    /// Largest location data an LLDP-MED location TLV can carry: the
    /// 511-byte TLV value minus OUI, subtype and format byte.
    pub const MAX_DATA_LEN: usize = 506;

    pub fn new(format: LocationFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Checks the data fits in one location TLV.
    pub fn validate(&self) -> DomainResult<()> {
        if self.data.len() > Self::MAX_DATA_LEN {
            return Err(DomainError::invalid(
                "location data",
                format!("{} bytes", self.data.len()),
                "at most 506 bytes",
            ));
        }
        Ok(())
    }

    /// Builds a civic address location.
    ///
    /// `what` describes which location the address refers to (0 = DHCP
    /// server, 1 = network element, 2 = client).
    pub fn civic(what: u8, country: &str, elements: &[CaElement]) -> DomainResult<Self> {
        if country.len() != 2 || !country.is_ascii() {
            return Err(DomainError::invalid("country", country, "two ASCII letters"));
        }
        let mut data = vec![0u8, what];
        data.extend_from_slice(country.as_bytes());
        for element in elements {
            let len = u8::try_from(element.value.len())
                .map_err(|_| DomainError::invalid("ca value", &element.value, "at most 255 bytes"))?;
            data.push(element.ca_type);
            data.push(len);
            data.extend_from_slice(element.value.as_bytes());
        }
        let lci_len = u8::try_from(data.len() - 1)
            .map_err(|_| DomainError::invalid("civic address", data.len(), "at most 256 bytes"))?;
        if let Some(first) = data.first_mut() {
            *first = lci_len;
        }
        Ok(Self::new(LocationFormat::CivicAddress, data))
    }

    fn civic_body(&self) -> DomainResult<&[u8]> {
        if self.format != LocationFormat::CivicAddress {
            return Err(DomainError::invalid("location format", self.format, "civic address"));
        }
        let (lci_len, rest) = self
            .data
            .split_first()
            .ok_or_else(|| parse_error("missing LCI length"))?;
        if usize::from(*lci_len) != rest.len() || rest.len() < CIVIC_HEADER_LEN - 1 {
            return Err(parse_error("LCI length does not match data"));
        }
        Ok(rest)
    }

    /// Two-letter country code of a civic address.
    pub fn civic_country(&self) -> DomainResult<String> {
        let body = self.civic_body()?;
        body.get(1..3)
            .map(|cc| String::from_utf8_lossy(cc).into_owned())
            .ok_or_else(|| parse_error("missing country code"))
    }

    /// Splits a civic address into its elements, in wire order.
    pub fn civic_elements(&self) -> DomainResult<Vec<CaElement>> {
        let body = self.civic_body()?;
        let mut rest = body.get(CIVIC_HEADER_LEN - 1..).unwrap_or_default();
        let mut elements = Vec::new();
        while let [ca_type, len, tail @ ..] = rest {
            let len = usize::from(*len);
            let value = tail
                .get(..len)
                .ok_or_else(|| parse_error("civic element overruns LCI"))?;
            elements.push(CaElement::new(
                *ca_type,
                String::from_utf8_lossy(value).into_owned(),
            ));
            rest = tail.get(len..).unwrap_or_default();
        }
        if !rest.is_empty() {
            return Err(parse_error("trailing byte after civic elements"));
        }
        Ok(elements)
    }
}

fn parse_error(reason: &str) -> DomainError {
    DomainError::ParseError {
        field: "civic address".to_string(),
        reason: reason.to_string(),
    }
}

/// Extended power-via-MDI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedPower {
    pub power_type: MedPowerType,
    /// Power source (meaning depends on `power_type`)
    #[serde(default)]
    pub source: u8,
    pub priority: MedPowerPriority,
    /// Power value in units of 0.1 W
    #[serde(default)]
    pub value: u16,
}

/// Inventory strings advertised by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MedInventory {
    #[serde(default)]
    pub hardware_revision: Option<String>,
    #[serde(default)]
    pub firmware_revision: Option<String>,
    #[serde(default)]
    pub software_revision: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
}

/// All LLDP-MED information attached to a port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MedPort {
    #[serde(default)]
    pub policies: Vec<MedPolicy>,
    #[serde(default)]
    pub locations: Vec<MedLocation>,
    #[serde(default)]
    pub power: Option<MedPower>,
}

impl MedPort {
    /// Installs a policy, replacing any existing one for the same application.
    pub fn set_policy(&mut self, policy: MedPolicy) {
        match self
            .policies
            .iter_mut()
            .find(|p| p.app_type == policy.app_type)
        {
            Some(existing) => *existing = policy,
            None => self.policies.push(policy),
        }
    }

    /// Installs a location, replacing any existing one with the same format.
    pub fn set_location(&mut self, location: MedLocation) {
        match self
            .locations
            .iter_mut()
            .find(|l| l.format == location.format)
        {
            Some(existing) => *existing = location,
            None => self.locations.push(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_validation() {
        let mut policy = MedPolicy::new(MedAppType::Voice);
        policy.vid = 100;
        policy.priority = 5;
        policy.dscp = 46;
        assert!(policy.validate().is_ok());

        policy.vid = 4095;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_civic_address() {
        let location = MedLocation::civic(
            2,
            "FR",
            &[CaElement::new(3, "Paris"), CaElement::new(6, "Rue de la Paix")],
        )
        .unwrap();

        assert_eq!(location.format, LocationFormat::CivicAddress);
        assert_eq!(usize::from(location.data[0]), location.data.len() - 1);
        assert_eq!(location.civic_country().unwrap(), "FR");

        let elements = location.civic_elements().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0], CaElement::new(3, "Paris"));
        assert_eq!(elements[1].value, "Rue de la Paix");
    }

    #[test]
    fn test_location_data_limit() {
        let fits = MedLocation::new(LocationFormat::Coordinates, vec![0; MedLocation::MAX_DATA_LEN]);
        assert!(fits.validate().is_ok());

        let too_long =
            MedLocation::new(LocationFormat::Coordinates, vec![0; MedLocation::MAX_DATA_LEN + 1]);
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_civic_rejects_bad_country() {
        assert!(MedLocation::civic(0, "FRA", &[]).is_err());
    }

    #[test]
    fn test_civic_overrun_detected() {
        // LCI claims one element of length 9 but only 2 bytes follow
        let location = MedLocation::new(
            LocationFormat::CivicAddress,
            vec![7, 0, b'U', b'S', 3, 9, b'a', b'b'],
        );
        assert!(location.civic_elements().is_err());
    }

    #[test]
    fn test_elements_on_non_civic() {
        let location = MedLocation::new(LocationFormat::Elin, b"911".to_vec());
        assert!(location.civic_elements().is_err());
    }

    #[test]
    fn test_set_policy_replaces_same_app() {
        let mut med = MedPort::default();
        med.set_policy(MedPolicy::new(MedAppType::Voice));
        let mut updated = MedPolicy::new(MedAppType::Voice);
        updated.vid = 42;
        med.set_policy(updated);
        med.set_policy(MedPolicy::new(MedAppType::StreamingVideo));

        assert_eq!(med.policies.len(), 2);
        assert_eq!(med.policies[0].vid, 42);
    }
}
