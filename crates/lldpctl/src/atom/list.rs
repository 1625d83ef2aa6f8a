//! The list shape shared by every list kind.
//!
//! A list is a view over a collection owned by its source: the answer of a
//! list-interfaces exchange, the neighbors of a local port, one of the
//! collections of a port, or the elements of a civic address. Elements
//! are built on demand and share the list's parent.

use std::any::Any;
use std::sync::Arc;

use lldp_core::{
    CaElement, Hardware, Interface, LocationFormat, MedAppType, MedLocation, MedPolicy, Port,
};

use super::dot1::{PiAtom, PpvidAtom, VlanAtom};
use super::interface::InterfaceAtom;
use super::med::{CaElementAtom, MedLocationAtom, MedPolicyAtom};
use super::port::{MgmtAtom, PortAtom};
use super::{cannot_create, Atom, AtomKind, AtomOps};
use crate::error::{CtlError, Result};

/// Collection behind a list atom.
#[derive(Debug)]
pub(crate) enum ListSource {
    Interfaces(Vec<Interface>),
    Neighbors(Arc<Hardware>),
    Mgmts(Arc<Port>),
    Vlans(Arc<Port>),
    Ppvids(Arc<Port>),
    Pis(Arc<Port>),
    MedPolicies(Arc<Port>),
    MedLocations(Arc<Port>),
    CaElements(Vec<CaElement>),
}

impl ListSource {
    fn len(&self) -> usize {
        match self {
            Self::Interfaces(interfaces) => interfaces.len(),
            Self::Neighbors(hardware) => hardware.neighbors.len(),
            Self::Mgmts(port) => port.chassis.mgmt.len(),
            Self::Vlans(port) => port.dot1.vlans.len(),
            Self::Ppvids(port) => port.dot1.ppvids.len(),
            Self::Pis(port) => port.dot1.pis.len(),
            Self::MedPolicies(port) => port.med.policies.len(),
            Self::MedLocations(port) => port.med.locations.len(),
            Self::CaElements(elements) => elements.len(),
        }
    }

    fn element_kind(&self) -> AtomKind {
        match self {
            Self::Interfaces(_) => AtomKind::Interface,
            Self::Neighbors(_) => AtomKind::Port,
            Self::Mgmts(_) => AtomKind::Mgmt,
            Self::Vlans(_) => AtomKind::Vlan,
            Self::Ppvids(_) => AtomKind::Ppvid,
            Self::Pis(_) => AtomKind::Pi,
            Self::MedPolicies(_) => AtomKind::MedPolicy,
            Self::MedLocations(_) => AtomKind::MedLocation,
            Self::CaElements(_) => AtomKind::MedCaElement,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ListAtom {
    source: ListSource,
}

impl ListAtom {
    pub(crate) fn new(source: ListSource) -> Self {
        Self { source }
    }
}

impl AtomOps for ListAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> Option<usize> {
        Some(self.source.len())
    }

    fn value(&self, this: &Atom, index: usize) -> Result<Atom> {
        let kind = self.source.element_kind();
        let element = match &self.source {
            ListSource::Interfaces(interfaces) => interfaces
                .get(index)
                .map(|i| this.sibling(kind, InterfaceAtom::new(i.name.clone()))),
            ListSource::Neighbors(hardware) => hardware
                .neighbors
                .get(index)
                .map(|p| this.sibling(kind, PortAtom::remote(p.clone()))),
            ListSource::Mgmts(port) => port
                .chassis
                .mgmt
                .get(index)
                .map(|m| this.sibling(kind, MgmtAtom::new(m.clone()))),
            ListSource::Vlans(port) => port
                .dot1
                .vlans
                .get(index)
                .map(|v| this.sibling(kind, VlanAtom::new(v.clone()))),
            ListSource::Ppvids(port) => port
                .dot1
                .ppvids
                .get(index)
                .map(|p| this.sibling(kind, PpvidAtom::new(p.clone()))),
            ListSource::Pis(port) => port
                .dot1
                .pis
                .get(index)
                .map(|p| this.sibling(kind, PiAtom::new(p.clone()))),
            ListSource::MedPolicies(port) => port
                .med
                .policies
                .get(index)
                .map(|p| this.sibling(kind, MedPolicyAtom::new(p.clone()))),
            ListSource::MedLocations(port) => port
                .med
                .locations
                .get(index)
                .map(|l| this.sibling(kind, MedLocationAtom::new(l.clone()))),
            ListSource::CaElements(elements) => elements
                .get(index)
                .map(|e| this.sibling(kind, CaElementAtom::new(e.clone()))),
        };
        element.ok_or_else(|| {
            CtlError::not_exist(format!("{} has no element {index}", this.kind()))
        })
    }

    fn create(&self, this: &Atom) -> Result<Atom> {
        let kind = self.source.element_kind();
        match &self.source {
            ListSource::MedPolicies(_) => Ok(this.sibling(
                kind,
                MedPolicyAtom::new(MedPolicy::new(MedAppType::Voice)),
            )),
            ListSource::MedLocations(_) => Ok(this.sibling(
                kind,
                MedLocationAtom::new(MedLocation::new(LocationFormat::Coordinates, Vec::new())),
            )),
            ListSource::CaElements(_) => Ok(this.sibling(
                kind,
                CaElementAtom::new(CaElement::new(0, String::new())),
            )),
            _ => Err(cannot_create(this)),
        }
    }
}
