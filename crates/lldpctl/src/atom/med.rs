//! LLDP-MED atoms: network policies, locations and civic address elements.

use std::any::Any;

use lldp_core::{CaElement, LocationFormat, MedAppType, MedLocation, MedPolicy};

use super::{
    bounded, flag, missing, narrow, read_only, unsupported, Atom, AtomArgs, AtomKey, AtomKind,
    AtomOps,
};
use crate::error::{CtlError, Result};

/// Civic addresses created from scratch describe the client's location.
const DEFAULT_CIVIC_WHAT: u8 = 2;

/// Longest civic address element value.
const MAX_CA_VALUE_LEN: usize = 250;

/// ELIN numbers are 10 to 25 digits.
const ELIN_LEN: std::ops::RangeInclusive<usize> = 10..=25;

// ============================================================================
// Network Policy
// ============================================================================

const POLICY_KEYS: &[AtomKey] = &[
    AtomKey::MedPolicyType,
    AtomKey::MedPolicyUnknown,
    AtomKey::MedPolicyTagged,
    AtomKey::MedPolicyVid,
    AtomKey::MedPolicyPriority,
    AtomKey::MedPolicyDscp,
];

#[derive(Debug)]
pub(super) struct MedPolicyAtom {
    policy: MedPolicy,
}

impl MedPolicyAtom {
    pub(super) fn new(policy: MedPolicy) -> Self {
        Self { policy }
    }

    pub(super) fn policy(&self) -> &MedPolicy {
        &self.policy
    }
}

fn app_type_by_name(name: &str) -> Option<MedAppType> {
    (1..=8u8)
        .filter_map(|v| MedAppType::from_u8(v).ok())
        .find(|t| t.name().eq_ignore_ascii_case(name))
}

impl AtomOps for MedPolicyAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        POLICY_KEYS
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::MedPolicyType => Ok(self.policy.app_type.name().to_string()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        let p = &self.policy;
        let value = match key {
            AtomKey::MedPolicyType => i64::from(p.app_type.value()),
            AtomKey::MedPolicyUnknown => flag(p.unknown),
            AtomKey::MedPolicyTagged => flag(p.tagged),
            AtomKey::MedPolicyVid => i64::from(p.vid),
            AtomKey::MedPolicyPriority => i64::from(p.priority),
            AtomKey::MedPolicyDscp => i64::from(p.dscp),
            _ => return Err(unsupported(this, key)),
        };
        Ok(value)
    }

    fn set_int(&self, this: &Atom, key: AtomKey, value: i64) -> Result<Atom> {
        let mut policy = self.policy.clone();
        match key {
            AtomKey::MedPolicyType => policy.app_type = MedAppType::from_u8(narrow(key, value)?)?,
            AtomKey::MedPolicyUnknown => policy.unknown = value != 0,
            AtomKey::MedPolicyTagged => policy.tagged = value != 0,
            AtomKey::MedPolicyVid => policy.vid = bounded(key, value, MedPolicy::MAX_VID)?,
            AtomKey::MedPolicyPriority => {
                policy.priority = bounded(key, value, MedPolicy::MAX_PRIORITY)?
            }
            AtomKey::MedPolicyDscp => policy.dscp = bounded(key, value, MedPolicy::MAX_DSCP)?,
            _ => return Err(read_only(this, key)),
        }
        Ok(this.with_ops(MedPolicyAtom { policy }))
    }

    fn set_str(&self, this: &Atom, key: AtomKey, value: &str) -> Result<Atom> {
        match key {
            AtomKey::MedPolicyType => {
                let mut policy = self.policy.clone();
                policy.app_type = app_type_by_name(value).ok_or_else(|| {
                    CtlError::bad_value(format!("unknown application type {value:?}"))
                })?;
                Ok(this.with_ops(MedPolicyAtom { policy }))
            }
            _ => Err(read_only(this, key)),
        }
    }
}

// ============================================================================
// Location
// ============================================================================

const LOCATION_KEYS: &[AtomKey] = &[
    AtomKey::MedLocationFormat,
    AtomKey::MedLocationData,
    AtomKey::MedLocationCountry,
    AtomKey::MedLocationElin,
    AtomKey::MedLocationCaElements,
];

#[derive(Debug)]
pub(super) struct MedLocationAtom {
    location: MedLocation,
}

impl MedLocationAtom {
    pub(super) fn new(location: MedLocation) -> Self {
        Self { location }
    }

    pub(super) fn location(&self) -> &MedLocation {
        &self.location
    }

    fn is_civic(&self) -> bool {
        self.location.format == LocationFormat::CivicAddress
    }

    /// Elements of a civic address; an empty civic address has none.
    pub(super) fn ca_elements(&self) -> Result<Vec<CaElement>> {
        if !self.is_civic() {
            return Err(CtlError::incorrect_atom_type(format!(
                "{} location has no civic address elements",
                self.location.format
            )));
        }
        if self.location.data.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.location.civic_elements()?)
    }

    /// Rebuilds the civic address with a new country or element list.
    fn rebuild_civic(&self, country: Option<&str>, elements: &[CaElement]) -> Result<MedLocation> {
        let what = self
            .location
            .data
            .get(1)
            .copied()
            .unwrap_or(DEFAULT_CIVIC_WHAT);
        let country = match country {
            Some(country) => country.to_string(),
            None if self.location.data.is_empty() => {
                return Err(CtlError::bad_value(
                    "set the country before adding civic address elements",
                ))
            }
            None => self.location.civic_country()?,
        };
        Ok(MedLocation::civic(what, &country, elements)?)
    }
}

impl AtomOps for MedLocationAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        LOCATION_KEYS
    }

    fn get(&self, this: &Atom, key: AtomKey) -> Result<Atom> {
        match key {
            AtomKey::MedLocationCaElements => Atom::new(AtomArgs::MedCaElementsList {
                location: this.clone(),
            }),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::MedLocationFormat => Ok(self.location.format.name().to_string()),
            AtomKey::MedLocationCountry => {
                if !self.is_civic() || self.location.data.is_empty() {
                    return Err(missing(key));
                }
                Ok(self.location.civic_country()?)
            }
            AtomKey::MedLocationElin => {
                if self.location.format != LocationFormat::Elin {
                    return Err(missing(key));
                }
                Ok(String::from_utf8_lossy(&self.location.data).into_owned())
            }
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::MedLocationFormat => Ok(i64::from(self.location.format.value())),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_buffer(&self, this: &Atom, key: AtomKey) -> Result<Vec<u8>> {
        match key {
            AtomKey::MedLocationData => Ok(self.location.data.clone()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn set_int(&self, this: &Atom, key: AtomKey, value: i64) -> Result<Atom> {
        match key {
            AtomKey::MedLocationFormat => {
                let format = LocationFormat::from_u8(narrow(key, value)?)?;
                // Data of one format is meaningless in another
                let data = if format == self.location.format {
                    self.location.data.clone()
                } else {
                    Vec::new()
                };
                Ok(this.with_ops(MedLocationAtom::new(MedLocation::new(format, data))))
            }
            _ => Err(read_only(this, key)),
        }
    }

    fn set_str(&self, this: &Atom, key: AtomKey, value: &str) -> Result<Atom> {
        let location = match key {
            AtomKey::MedLocationCountry => {
                if !self.is_civic() {
                    return Err(CtlError::bad_value("country is only valid for a civic address"));
                }
                let elements = self.ca_elements()?;
                self.rebuild_civic(Some(value), &elements)?
            }
            AtomKey::MedLocationElin => {
                if !ELIN_LEN.contains(&value.len()) || !value.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CtlError::bad_value(format!(
                        "ELIN must be 10 to 25 digits, got {value:?}"
                    )));
                }
                MedLocation::new(LocationFormat::Elin, value.as_bytes().to_vec())
            }
            _ => return Err(read_only(this, key)),
        };
        Ok(this.with_ops(MedLocationAtom::new(location)))
    }

    fn set_buffer(&self, this: &Atom, key: AtomKey, value: &[u8]) -> Result<Atom> {
        match key {
            AtomKey::MedLocationData => {
                let location = MedLocation::new(self.location.format, value.to_vec());
                location.validate()?;
                Ok(this.with_ops(MedLocationAtom::new(location)))
            }
            _ => Err(read_only(this, key)),
        }
    }

    /// Appends a civic address element.
    fn set(&self, this: &Atom, key: AtomKey, value: &Atom) -> Result<Atom> {
        if key != AtomKey::MedLocationCaElements {
            return Err(read_only(this, key));
        }
        let element = value
            .downcast::<CaElementAtom>()
            .ok_or_else(|| {
                CtlError::incorrect_atom_type(format!(
                    "expected a {} atom, got {}",
                    AtomKind::MedCaElement,
                    value.kind()
                ))
            })?
            .element
            .clone();
        let mut elements = self.ca_elements()?;
        elements.push(element);
        let location = self.rebuild_civic(None, &elements)?;
        Ok(this.with_ops(MedLocationAtom::new(location)))
    }
}

// ============================================================================
// Civic Address Element
// ============================================================================

#[derive(Debug)]
pub(super) struct CaElementAtom {
    element: CaElement,
}

impl CaElementAtom {
    pub(super) fn new(element: CaElement) -> Self {
        Self { element }
    }
}

impl AtomOps for CaElementAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[AtomKey::MedCivicType, AtomKey::MedCivicValue]
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::MedCivicValue => Ok(self.element.value.clone()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::MedCivicType => Ok(i64::from(self.element.ca_type)),
            _ => Err(unsupported(this, key)),
        }
    }

    fn set_int(&self, this: &Atom, key: AtomKey, value: i64) -> Result<Atom> {
        match key {
            AtomKey::MedCivicType => Ok(this.with_ops(CaElementAtom::new(CaElement::new(
                narrow(key, value)?,
                self.element.value.clone(),
            )))),
            _ => Err(read_only(this, key)),
        }
    }

    fn set_str(&self, this: &Atom, key: AtomKey, value: &str) -> Result<Atom> {
        match key {
            AtomKey::MedCivicValue => {
                if value.len() > MAX_CA_VALUE_LEN {
                    return Err(CtlError::bad_value(format!(
                        "civic address element longer than {MAX_CA_VALUE_LEN} bytes"
                    )));
                }
                Ok(this.with_ops(CaElementAtom::new(CaElement::new(
                    self.element.ca_type,
                    value,
                ))))
            }
            _ => Err(read_only(this, key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn location(location: MedLocation) -> Atom {
        Atom::new(AtomArgs::MedLocation {
            port: None,
            location,
        })
        .unwrap()
    }

    fn element(ca_type: i64, value: &str) -> Atom {
        Atom::new(AtomArgs::MedCaElement {
            location: None,
            element: CaElement::new(0, String::new()),
        })
        .unwrap()
        .set_int(AtomKey::MedCivicType, ca_type)
        .unwrap()
        .set_str(AtomKey::MedCivicValue, value)
        .unwrap()
    }

    #[test]
    fn test_policy_setters() {
        let policy = Atom::new(AtomArgs::MedPolicy {
            port: None,
            policy: MedPolicy::new(MedAppType::Voice),
        })
        .unwrap()
        .set_str(AtomKey::MedPolicyType, "video signaling")
        .unwrap()
        .set_int(AtomKey::MedPolicyTagged, 1)
        .unwrap()
        .set_int(AtomKey::MedPolicyDscp, 46)
        .unwrap();

        assert_eq!(policy.get_int(AtomKey::MedPolicyType).unwrap(), 8);
        assert_eq!(policy.get_int(AtomKey::MedPolicyTagged).unwrap(), 1);
        assert_eq!(policy.get_int(AtomKey::MedPolicyDscp).unwrap(), 46);
    }

    #[test]
    fn test_policy_range_checks() {
        let policy = Atom::new(AtomArgs::MedPolicy {
            port: None,
            policy: MedPolicy::new(MedAppType::Voice),
        })
        .unwrap();
        for (key, value) in [
            (AtomKey::MedPolicyVid, 4095),
            (AtomKey::MedPolicyPriority, 8),
            (AtomKey::MedPolicyDscp, 64),
            (AtomKey::MedPolicyType, 9),
            (AtomKey::MedPolicyVid, -1),
        ] {
            let err = policy.set_int(key, value).unwrap_err();
            assert_eq!(err.code(), ErrorCode::BadValue, "{key} = {value}");
        }
    }

    #[test]
    fn test_civic_location_built_through_setters() {
        let loc = location(MedLocation::new(LocationFormat::CivicAddress, Vec::new()))
            .set_str(AtomKey::MedLocationCountry, "FR")
            .unwrap();
        let loc = loc
            .set(AtomKey::MedLocationCaElements, &element(3, "Paris"))
            .unwrap()
            .set(AtomKey::MedLocationCaElements, &element(6, "Rue du Bac"))
            .unwrap();

        assert_eq!(loc.get_str(AtomKey::MedLocationCountry).unwrap(), "FR");
        let elements = loc.get(AtomKey::MedLocationCaElements).unwrap();
        let values: Vec<String> = elements
            .children()
            .unwrap()
            .map(|e| e.get_str(AtomKey::MedCivicValue).unwrap())
            .collect();
        assert_eq!(values, ["Paris", "Rue du Bac"]);
        assert!(elements.parent().unwrap().ptr_eq(&loc));
    }

    #[test]
    fn test_ca_element_needs_country() {
        let loc = location(MedLocation::new(LocationFormat::CivicAddress, Vec::new()));
        let err = loc
            .set(AtomKey::MedLocationCaElements, &element(3, "Paris"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadValue);
    }

    #[test]
    fn test_country_replaced_keeps_elements() {
        let civic = MedLocation::civic(1, "US", &[CaElement::new(1, "CA")]).unwrap();
        let loc = location(civic)
            .set_str(AtomKey::MedLocationCountry, "CA")
            .unwrap();
        assert_eq!(loc.get_str(AtomKey::MedLocationCountry).unwrap(), "CA");
        let data = loc.get_buffer(AtomKey::MedLocationData).unwrap();
        assert_eq!(data.get(1), Some(&1), "what byte preserved");
        assert_eq!(loc.get(AtomKey::MedLocationCaElements).unwrap().count().unwrap(), 1);
    }

    #[test]
    fn test_elin() {
        let loc = location(MedLocation::new(LocationFormat::Coordinates, Vec::new()));
        assert!(loc.set_str(AtomKey::MedLocationElin, "12ab").is_err());
        let loc = loc.set_str(AtomKey::MedLocationElin, "1234567890").unwrap();
        assert_eq!(loc.get_str(AtomKey::MedLocationFormat).unwrap(), "ELIN");
        assert_eq!(loc.get_str(AtomKey::MedLocationElin).unwrap(), "1234567890");
    }

    #[test]
    fn test_format_change_clears_data() {
        let civic = MedLocation::civic(2, "DE", &[]).unwrap();
        let loc = location(civic)
            .set_int(AtomKey::MedLocationFormat, 1)
            .unwrap();
        assert!(loc.get_buffer(AtomKey::MedLocationData).unwrap().is_empty());
        assert_eq!(
            loc.get(AtomKey::MedLocationCaElements).unwrap_err().code(),
            ErrorCode::IncorrectAtomType
        );
    }

    #[test]
    fn test_ca_value_length_limit() {
        let long = "x".repeat(MAX_CA_VALUE_LEN + 1);
        let atom = element(3, "ok");
        assert_eq!(
            atom.set_str(AtomKey::MedCivicValue, &long).unwrap_err().code(),
            ErrorCode::BadValue
        );
    }

    #[test]
    fn test_location_data_must_fit_tlv() {
        let loc = location(MedLocation::new(LocationFormat::Coordinates, Vec::new()));
        let err = loc
            .set_buffer(AtomKey::MedLocationData, &[0; MedLocation::MAX_DATA_LEN + 1])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadValue);

        let loc = loc
            .set_buffer(AtomKey::MedLocationData, &[0; MedLocation::MAX_DATA_LEN])
            .unwrap();
        assert_eq!(
            loc.get_buffer(AtomKey::MedLocationData).unwrap().len(),
            MedLocation::MAX_DATA_LEN
        );
    }
}
