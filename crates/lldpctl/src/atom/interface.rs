use std::any::Any;

use super::{Atom, AtomKey, AtomOps};
use crate::error::Result;

const KEYS: &[AtomKey] = &[AtomKey::InterfaceName];

/// A local interface, as listed by the daemon.
#[derive(Debug)]
pub(super) struct InterfaceAtom {
    name: String,
}

impl InterfaceAtom {
    pub(super) fn new(name: String) -> Self {
        Self { name }
    }
}

impl AtomOps for InterfaceAtom {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn keys(&self) -> &'static [AtomKey] {
        KEYS
    }

    fn get_str(&self, this: &Atom, key: AtomKey) -> Result<String> {
        match key {
            AtomKey::InterfaceName => Ok(self.name.clone()),
            _ => Err(super::unsupported(this, key)),
        }
    }
}
