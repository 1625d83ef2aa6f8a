//! Atom object model.
//!
//! An [`Atom`] is a reference-counted handle on one entity reported by the
//! daemon (an interface, a port, a VLAN, a MED policy, ...) or on a list of
//! such entities. Every kind is reached through the same handle type and
//! the same operations: typed getters and setters keyed by [`AtomKey`],
//! cursor-based iteration over lists, and creation of new list elements.
//!
//! The behavior of an atom is provided by a per-kind implementation of
//! [`AtomOps`] installed when the atom is built and never replaced
//! afterwards. Operations a kind does not support fail with
//! `ErrorCode::IncorrectAtomType` (or `CannotIterate` / `CannotCreate`).
//!
//! # Ownership
//!
//! - `retain` clones the handle, `release` drops it; the atom is destroyed
//!   when its last handle goes away.
//! - Getters return owned values, so nothing they hand out can outlive
//!   the data it was read from.
//! - Atoms are immutable. Setters return a new atom carrying the change;
//!   the atom they were called on is left as it was.
//! - Child atoms keep a weak link to their parent, used for lookups only.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

mod dot1;
mod interface;
mod key;
mod list;
mod med;
mod port;

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use lldp_core::{CaElement, Hardware, Interface, MedLocation, MedPolicy};

use crate::connection::ConnectionId;
use crate::error::{CtlError, ErrorCode, Result};

pub use key::{AtomKey, ValueType};

use list::{ListAtom, ListSource};
pub(crate) use port::PortAtom;

use interface::InterfaceAtom;
use med::{CaElementAtom, MedLocationAtom, MedPolicyAtom};
use port::{Dot3PowerAtom, MedPowerAtom};

// ============================================================================
// Atom Kinds
// ============================================================================

/// Kind of an atom, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    InterfacesList,
    Interface,
    PortsList,
    Port,
    MgmtsList,
    Mgmt,
    Dot3Power,
    VlansList,
    Vlan,
    PpvidsList,
    Ppvid,
    PisList,
    Pi,
    MedPoliciesList,
    MedPolicy,
    MedLocationsList,
    MedLocation,
    MedCaElementsList,
    MedCaElement,
    MedPower,
}

impl AtomKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::InterfacesList => "interfaces list",
            Self::Interface => "interface",
            Self::PortsList => "ports list",
            Self::Port => "port",
            Self::MgmtsList => "management addresses list",
            Self::Mgmt => "management address",
            Self::Dot3Power => "dot3 power",
            Self::VlansList => "vlans list",
            Self::Vlan => "vlan",
            Self::PpvidsList => "ppvids list",
            Self::Ppvid => "ppvid",
            Self::PisList => "protocol identities list",
            Self::Pi => "protocol identity",
            Self::MedPoliciesList => "med policies list",
            Self::MedPolicy => "med policy",
            Self::MedLocationsList => "med locations list",
            Self::MedLocation => "med location",
            Self::MedCaElementsList => "civic address elements list",
            Self::MedCaElement => "civic address element",
            Self::MedPower => "med power",
        }
    }

    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::InterfacesList
                | Self::PortsList
                | Self::MgmtsList
                | Self::VlansList
                | Self::PpvidsList
                | Self::PisList
                | Self::MedPoliciesList
                | Self::MedLocationsList
                | Self::MedCaElementsList
        )
    }

    /// Kinds that only exist as answers from a daemon.
    pub const fn requires_connection(self) -> bool {
        matches!(self, Self::InterfacesList | Self::Interface | Self::Port)
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Construction Arguments
// ============================================================================

/// Backing data for [`Atom::new`], one payload per kind.
///
/// Port-scoped kinds are built from a port atom; the resulting atom shares
/// the port's connection and keeps a weak link to it.
#[derive(Debug, Clone)]
pub enum AtomArgs {
    InterfacesList {
        conn: Option<ConnectionId>,
        interfaces: Vec<Interface>,
    },
    Interface {
        conn: Option<ConnectionId>,
        name: String,
    },
    /// A local port, as returned by a get-port exchange
    Port {
        conn: Option<ConnectionId>,
        hardware: Hardware,
    },
    /// Neighbors seen on a local port
    PortsList { port: Atom },
    MgmtsList { port: Atom },
    Dot3Power { port: Atom },
    VlansList { port: Atom },
    PpvidsList { port: Atom },
    PisList { port: Atom },
    MedPoliciesList { port: Atom },
    MedLocationsList { port: Atom },
    MedPower { port: Atom },
    MedCaElementsList { location: Atom },
    MedPolicy {
        port: Option<Atom>,
        policy: MedPolicy,
    },
    MedLocation {
        port: Option<Atom>,
        location: MedLocation,
    },
    MedCaElement {
        location: Option<Atom>,
        element: CaElement,
    },
}

impl AtomArgs {
    pub fn kind(&self) -> AtomKind {
        match self {
            Self::InterfacesList { .. } => AtomKind::InterfacesList,
            Self::Interface { .. } => AtomKind::Interface,
            Self::Port { .. } => AtomKind::Port,
            Self::PortsList { .. } => AtomKind::PortsList,
            Self::MgmtsList { .. } => AtomKind::MgmtsList,
            Self::Dot3Power { .. } => AtomKind::Dot3Power,
            Self::VlansList { .. } => AtomKind::VlansList,
            Self::PpvidsList { .. } => AtomKind::PpvidsList,
            Self::PisList { .. } => AtomKind::PisList,
            Self::MedPoliciesList { .. } => AtomKind::MedPoliciesList,
            Self::MedLocationsList { .. } => AtomKind::MedLocationsList,
            Self::MedPower { .. } => AtomKind::MedPower,
            Self::MedCaElementsList { .. } => AtomKind::MedCaElementsList,
            Self::MedPolicy { .. } => AtomKind::MedPolicy,
            Self::MedLocation { .. } => AtomKind::MedLocation,
            Self::MedCaElement { .. } => AtomKind::MedCaElement,
        }
    }
}

// ============================================================================
// Dispatch Table
// ============================================================================

/// Position in a list atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(usize);

impl Cursor {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-kind behavior of an atom.
///
/// Every method has a default that rejects the operation, so a kind only
/// implements what it supports. `this` is the handle the call came
/// through, used to build child atoms and error messages.
pub(crate) trait AtomOps: fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Keys this kind answers to.
    fn keys(&self) -> &'static [AtomKey] {
        &[]
    }

    /// Number of elements, for list kinds.
    fn len(&self) -> Option<usize> {
        None
    }

    fn value(&self, this: &Atom, _index: usize) -> Result<Atom> {
        Err(CtlError::new(
            ErrorCode::CannotIterate,
            format!("{} atom is not a list", this.kind()),
        ))
    }

    fn get(&self, this: &Atom, key: AtomKey) -> Result<Atom> {
        Err(unsupported(this, key))
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        Err(unsupported(this, key))
    }

    fn get_buffer(&self, this: &Atom, key: AtomKey) -> Result<Vec<u8>> {
        Err(unsupported(this, key))
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        Err(unsupported(this, key))
    }

    fn set(&self, this: &Atom, key: AtomKey, _value: &Atom) -> Result<Atom> {
        Err(read_only(this, key))
    }

    fn set_str(&self, this: &Atom, key: AtomKey, _value: &str) -> Result<Atom> {
        Err(read_only(this, key))
    }

    fn set_buffer(&self, this: &Atom, key: AtomKey, _value: &[u8]) -> Result<Atom> {
        Err(read_only(this, key))
    }

    fn set_int(&self, this: &Atom, key: AtomKey, _value: i64) -> Result<Atom> {
        Err(read_only(this, key))
    }

    fn create(&self, this: &Atom) -> Result<Atom> {
        Err(cannot_create(this))
    }
}

pub(crate) fn cannot_create(this: &Atom) -> CtlError {
    CtlError::new(
        ErrorCode::CannotCreate,
        format!("{} atom cannot create elements", this.kind()),
    )
}

pub(crate) fn unsupported(this: &Atom, key: AtomKey) -> CtlError {
    CtlError::incorrect_atom_type(format!("{} atom has no {key} attribute", this.kind()))
}

pub(crate) fn read_only(this: &Atom, key: AtomKey) -> CtlError {
    CtlError::incorrect_atom_type(format!("{key} cannot be set on {} atom", this.kind()))
}

/// Error for an optional attribute that is not present.
pub(crate) fn missing(key: AtomKey) -> CtlError {
    CtlError::not_exist(format!("{key} is not available"))
}

/// Converts an integer passed to a setter into the field's type.
pub(crate) fn narrow<T: TryFrom<i64>>(key: AtomKey, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| CtlError::bad_value(format!("{value} is out of range for {key}")))
}

/// Accepts an integer in `0..=max`.
pub(crate) fn bounded<T: TryFrom<i64> + PartialOrd + fmt::Display>(
    key: AtomKey,
    value: i64,
    max: T,
) -> Result<T> {
    let value: T = narrow(key, value)?;
    if value > max {
        return Err(CtlError::bad_value(format!(
            "{value} is out of range for {key} (max {max})"
        )));
    }
    Ok(value)
}

pub(crate) fn flag(value: bool) -> i64 {
    i64::from(value)
}

// ============================================================================
// Atom Handle
// ============================================================================

struct AtomInner {
    kind: AtomKind,
    conn: Option<ConnectionId>,
    parent: Option<Weak<AtomInner>>,
    ops: Box<dyn AtomOps>,
}

/// Reference-counted handle on a daemon entity or list of entities.
#[derive(Clone)]
pub struct Atom {
    inner: Arc<AtomInner>,
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("kind", &self.inner.kind)
            .field("conn", &self.inner.conn)
            .field("ops", &self.inner.ops)
            .finish()
    }
}

impl Atom {
    /// Builds an atom from its backing data.
    ///
    /// Fails with `CannotCreate` when a kind that only comes from a daemon
    /// has no connection, and with `IncorrectAtomType` when a parent atom
    /// is of the wrong kind.
    pub fn new(args: AtomArgs) -> Result<Atom> {
        let kind = args.kind();
        match args {
            AtomArgs::InterfacesList { conn, interfaces } => {
                let conn = require_connection(kind, conn)?;
                Ok(Self::assemble(
                    kind,
                    Some(conn),
                    None,
                    ListAtom::new(ListSource::Interfaces(interfaces)),
                ))
            }
            AtomArgs::Interface { conn, name } => {
                let conn = require_connection(kind, conn)?;
                Ok(Self::assemble(kind, Some(conn), None, InterfaceAtom::new(name)))
            }
            AtomArgs::Port { conn, hardware } => {
                let conn = require_connection(kind, conn)?;
                Ok(Self::assemble(kind, Some(conn), None, PortAtom::local(hardware)))
            }
            AtomArgs::PortsList { port } => {
                let source = port_of(&port)?.neighbors_source(&port)?;
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::MgmtsList { port } => {
                let source = ListSource::Mgmts(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::VlansList { port } => {
                let source = ListSource::Vlans(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::PpvidsList { port } => {
                let source = ListSource::Ppvids(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::PisList { port } => {
                let source = ListSource::Pis(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::MedPoliciesList { port } => {
                let source = ListSource::MedPolicies(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::MedLocationsList { port } => {
                let source = ListSource::MedLocations(port_of(&port)?.port());
                Ok(port.child(kind, ListAtom::new(source)))
            }
            AtomArgs::Dot3Power { port } => {
                let power = port_of(&port)?.dot3_power()?;
                Ok(port.child(kind, Dot3PowerAtom::new(power)))
            }
            AtomArgs::MedPower { port } => {
                let power = port_of(&port)?.med_power()?;
                Ok(port.child(kind, MedPowerAtom::new(power)))
            }
            AtomArgs::MedCaElementsList { location } => {
                let elements = location
                    .downcast::<MedLocationAtom>()
                    .ok_or_else(|| wrong_parent(kind, &location))?
                    .ca_elements()?;
                Ok(location.child(kind, ListAtom::new(ListSource::CaElements(elements))))
            }
            AtomArgs::MedPolicy { port, policy } => {
                if let Some(parent) = &port {
                    port_of(parent)?;
                }
                Ok(Self::detached(kind, port.as_ref(), MedPolicyAtom::new(policy)))
            }
            AtomArgs::MedLocation { port, location } => {
                if let Some(parent) = &port {
                    port_of(parent)?;
                }
                Ok(Self::detached(kind, port.as_ref(), MedLocationAtom::new(location)))
            }
            AtomArgs::MedCaElement { location, element } => {
                if let Some(parent) = &location {
                    if parent.kind() != AtomKind::MedLocation {
                        return Err(wrong_parent(kind, parent));
                    }
                }
                Ok(Self::detached(kind, location.as_ref(), CaElementAtom::new(element)))
            }
        }
    }

    fn assemble(
        kind: AtomKind,
        conn: Option<ConnectionId>,
        parent: Option<Weak<AtomInner>>,
        ops: impl AtomOps,
    ) -> Atom {
        Atom {
            inner: Arc::new(AtomInner {
                kind,
                conn,
                parent,
                ops: Box::new(ops),
            }),
        }
    }

    /// Builds an atom whose parent is `self`.
    pub(crate) fn child(&self, kind: AtomKind, ops: impl AtomOps) -> Atom {
        Self::assemble(
            kind,
            self.inner.conn,
            Some(Arc::downgrade(&self.inner)),
            ops,
        )
    }

    /// Builds an atom that shares `self`'s parent (a list element, or the
    /// result of a setter).
    pub(crate) fn sibling(&self, kind: AtomKind, ops: impl AtomOps) -> Atom {
        Self::assemble(kind, self.inner.conn, self.inner.parent.clone(), ops)
    }

    /// Replacement for `self` after a setter.
    pub(crate) fn with_ops(&self, ops: impl AtomOps) -> Atom {
        self.sibling(self.inner.kind, ops)
    }

    fn detached(kind: AtomKind, parent: Option<&Atom>, ops: impl AtomOps) -> Atom {
        match parent {
            Some(parent) => parent.child(kind, ops),
            None => Self::assemble(kind, None, None, ops),
        }
    }

    pub(crate) fn downcast<T: 'static>(&self) -> Option<&T> {
        self.inner.ops.as_any().downcast_ref::<T>()
    }

    pub fn kind(&self) -> AtomKind {
        self.inner.kind
    }

    /// Connection this atom was obtained from, if any.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.inner.conn
    }

    /// Parent atom, while it is still alive.
    pub fn parent(&self) -> Option<Atom> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Atom { inner })
    }

    /// Takes one more reference on the atom.
    #[must_use]
    pub fn retain(&self) -> Atom {
        self.clone()
    }

    /// Gives a reference back; the atom is destroyed with its last one.
    pub fn release(self) {}

    /// Number of live handles on this atom.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// True when both handles refer to the same atom.
    pub fn ptr_eq(&self, other: &Atom) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Keys valid for this atom's kind.
    pub fn keys(&self) -> &'static [AtomKey] {
        self.inner.ops.keys()
    }

    // ------------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------------

    fn list_len(&self) -> Result<usize> {
        self.inner.ops.len().ok_or_else(|| {
            CtlError::new(
                ErrorCode::CannotIterate,
                format!("{} atom is not a list", self.kind()),
            )
        })
    }

    /// Number of elements of a list atom.
    pub fn count(&self) -> Result<usize> {
        self.list_len()
    }

    /// Cursor on the first element, or `None` for an empty list.
    pub fn iter(&self) -> Result<Option<Cursor>> {
        Ok((self.list_len()? > 0).then_some(Cursor(0)))
    }

    /// Advances `cursor`; `None` once past the last element.
    pub fn next(&self, cursor: Cursor) -> Option<Cursor> {
        let len = self.inner.ops.len()?;
        let next = cursor.0.checked_add(1)?;
        (next < len).then_some(Cursor(next))
    }

    /// Element under `cursor`. The caller owns the returned handle.
    pub fn value(&self, cursor: Cursor) -> Result<Atom> {
        self.list_len()?;
        self.inner.ops.value(self, cursor.0)
    }

    /// Iterates over the elements of a list atom.
    pub fn children(&self) -> Result<Children<'_>> {
        Ok(Children {
            atom: self,
            cursor: self.iter()?,
        })
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    pub fn get(&self, key: AtomKey) -> Result<Atom> {
        self.inner.ops.get(self, key)
    }

    pub fn get_str(&self, key: AtomKey) -> Result<String> {
        self.inner.ops.get_str(self, key)
    }

    pub fn get_buffer(&self, key: AtomKey) -> Result<Vec<u8>> {
        self.inner.ops.get_buffer(self, key)
    }

    pub fn get_int(&self, key: AtomKey) -> Result<i64> {
        self.inner.ops.get_int(self, key)
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    /// Returns a copy of this atom with `key` set to `value`.
    pub fn set(&self, key: AtomKey, value: &Atom) -> Result<Atom> {
        self.inner.ops.set(self, key, value)
    }

    pub fn set_str(&self, key: AtomKey, value: &str) -> Result<Atom> {
        self.inner.ops.set_str(self, key, value)
    }

    pub fn set_buffer(&self, key: AtomKey, value: &[u8]) -> Result<Atom> {
        self.inner.ops.set_buffer(self, key, value)
    }

    pub fn set_int(&self, key: AtomKey, value: i64) -> Result<Atom> {
        self.inner.ops.set_int(self, key, value)
    }

    /// Creates a new, detached element suitable for this list.
    pub fn create(&self) -> Result<Atom> {
        self.inner.ops.create(self)
    }
}

fn require_connection(kind: AtomKind, conn: Option<ConnectionId>) -> Result<ConnectionId> {
    conn.ok_or_else(|| {
        CtlError::new(
            ErrorCode::CannotCreate,
            format!("{kind} atom requires a connection"),
        )
    })
}

fn wrong_parent(kind: AtomKind, parent: &Atom) -> CtlError {
    CtlError::incorrect_atom_type(format!(
        "{kind} atom cannot be attached to {} atom",
        parent.kind()
    ))
}

fn port_of(atom: &Atom) -> Result<&PortAtom> {
    atom.downcast::<PortAtom>().ok_or_else(|| {
        CtlError::incorrect_atom_type(format!("expected a port atom, got {}", atom.kind()))
    })
}

/// Iterator over the elements of a list atom.
#[derive(Debug)]
pub struct Children<'a> {
    atom: &'a Atom,
    cursor: Option<Cursor>,
}

impl Iterator for Children<'_> {
    type Item = Atom;

    fn next(&mut self) -> Option<Atom> {
        let cursor = self.cursor?;
        self.cursor = self.atom.next(cursor);
        // Cursors come from the list's own length, so `value` cannot fail here
        self.atom.value(cursor).ok()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::{Port, Vlan};

    fn conn() -> Option<ConnectionId> {
        Some(ConnectionId::next())
    }

    fn local_port() -> Atom {
        let mut hw = Hardware::new("eth0", 2);
        hw.local.dot1.vlans = vec![
            Vlan {
                vid: 10,
                name: "voice".to_string(),
            },
            Vlan {
                vid: 20,
                name: "data".to_string(),
            },
        ];
        let mut neighbor = Port::with_ifname("Gi0/1");
        neighbor.chassis.name = Some("switch01".to_string());
        hw.neighbors.push(neighbor);
        Atom::new(AtomArgs::Port {
            conn: conn(),
            hardware: hw,
        })
        .unwrap()
    }

    #[test]
    fn test_retain_release_counts() {
        let atom = Atom::new(AtomArgs::Interface {
            conn: conn(),
            name: "eth0".to_string(),
        })
        .unwrap();
        let retained: Vec<Atom> = (0..3).map(|_| atom.retain()).collect();
        assert_eq!(atom.ref_count(), 4);

        for handle in retained {
            handle.release();
        }
        assert_eq!(atom.ref_count(), 1);
    }

    #[test]
    fn test_destroyed_after_last_release() {
        let port = local_port();
        let vlans = port.get(AtomKey::PortVlans).unwrap();
        let extra = port.retain();
        assert!(vlans.parent().is_some());

        port.release();
        assert!(vlans.parent().is_some());
        extra.release();
        assert!(vlans.parent().is_none());

        // The list keeps working without its parent
        assert_eq!(vlans.count().unwrap(), 2);
    }

    #[test]
    fn test_remote_kinds_need_connection() {
        let err = Atom::new(AtomArgs::Interface {
            conn: None,
            name: "eth0".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotCreate);

        let err = Atom::new(AtomArgs::Port {
            conn: None,
            hardware: Hardware::new("eth0", 1),
        })
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotCreate);
    }

    #[test]
    fn test_parent_kind_checked() {
        let iface = Atom::new(AtomArgs::Interface {
            conn: conn(),
            name: "eth0".to_string(),
        })
        .unwrap();
        let err = Atom::new(AtomArgs::VlansList { port: iface.clone() }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);

        let err = Atom::new(AtomArgs::MedCaElementsList { location: iface }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);
    }

    #[test]
    fn test_iteration_contract() {
        let port = local_port();
        let vlans = port.get(AtomKey::PortVlans).unwrap();

        let first = vlans.iter().unwrap().unwrap();
        let second = vlans.next(first).unwrap();
        assert_eq!(vlans.next(second), None);

        assert_eq!(vlans.value(first).unwrap().get_int(AtomKey::VlanId).unwrap(), 10);
        assert_eq!(
            vlans.value(second).unwrap().get_str(AtomKey::VlanName).unwrap(),
            "data"
        );
    }

    #[test]
    fn test_empty_list_has_no_cursor() {
        let port = local_port();
        let ppvids = port.get(AtomKey::PortPpvids).unwrap();
        assert_eq!(ppvids.iter().unwrap(), None);
        assert_eq!(ppvids.children().unwrap().count(), 0);
    }

    #[test]
    fn test_non_list_cannot_iterate() {
        let port = local_port();
        assert_eq!(port.iter().unwrap_err().code(), ErrorCode::CannotIterate);
        assert_eq!(
            port.value(Cursor(0)).unwrap_err().code(),
            ErrorCode::CannotIterate
        );
    }

    #[test]
    fn test_unsupported_key() {
        let port = local_port();
        let err = port.get_str(AtomKey::VlanName).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);
    }

    #[test]
    fn test_lists_are_read_only() {
        let port = local_port();
        let vlans = port.get(AtomKey::PortVlans).unwrap();
        let err = vlans.set_int(AtomKey::VlanId, 3).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IncorrectAtomType);
        assert_eq!(vlans.create().unwrap_err().code(), ErrorCode::CannotCreate);
    }

    #[test]
    fn test_children_share_connection() {
        let port = local_port();
        let neighbors = port.get(AtomKey::PortNeighbors).unwrap();
        let remote = neighbors.children().unwrap().next().unwrap();
        assert_eq!(remote.connection(), port.connection());
        assert!(remote.parent().unwrap().ptr_eq(&port));
    }
}
