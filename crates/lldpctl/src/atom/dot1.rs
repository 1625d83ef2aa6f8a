//! 802.1 atoms: VLANs, port-and-protocol VLAN IDs, protocol identities.

use std::any::Any;

use lldp_core::{Ppvid, ProtocolIdentity, Vlan};

use super::{unsupported, Atom, AtomKey, AtomOps};
use crate::error::Result;

#[derive(Debug)]
pub(super) struct VlanAtom {
    vlan: Vlan,
}

impl VlanAtom {
    pub(super) fn new(vlan: Vlan) -> Self {
        Self { vlan }
    }
}

impl AtomOps for VlanAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[AtomKey::VlanId, AtomKey::VlanName]
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::VlanName => Ok(self.vlan.name.clone()),
            _ => Err(unsupported(this, key)),
        }
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::VlanId => Ok(i64::from(self.vlan.vid)),
            _ => Err(unsupported(this, key)),
        }
    }
}

#[derive(Debug)]
pub(super) struct PpvidAtom {
    ppvid: Ppvid,
}

impl PpvidAtom {
    pub(super) fn new(ppvid: Ppvid) -> Self {
        Self { ppvid }
    }
}

impl AtomOps for PpvidAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[AtomKey::PpvidStatus, AtomKey::PpvidId]
    }

    fn get_int(&self, this: &Atom, key: AtomKey) -> Result<i64> {
        match key {
            AtomKey::PpvidStatus => Ok(i64::from(self.ppvid.cap_status)),
            AtomKey::PpvidId => Ok(i64::from(self.ppvid.ppvid)),
            _ => Err(unsupported(this, key)),
        }
    }
}

#[derive(Debug)]
pub(super) struct PiAtom {
    pi: ProtocolIdentity,
}

impl PiAtom {
    pub(super) fn new(pi: ProtocolIdentity) -> Self {
        Self { pi }
    }
}

impl AtomOps for PiAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        &[AtomKey::PiId]
    }

    fn get_buffer(&self, this: &Atom, key: AtomKey) -> Result<Vec<u8>> {
        match key {
            AtomKey::PiId => Ok(self.pi.identity.clone()),
            _ => Err(unsupported(this, key)),
        }
    }
}
