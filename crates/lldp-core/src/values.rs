//! Small value types and rendering helpers shared by every record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a fieldless enum that maps one-to-one onto a wire byte.
///
/// Generates `value()`, `from_u8()` and `name()` plus a `Display` impl
/// printing the name.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Returns the on-wire value.
            pub const fn value(self) -> u8 {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            /// Parses the on-wire value.
            pub fn from_u8(value: u8) -> $crate::DomainResult<Self> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err($crate::DomainError::UnknownValue {
                        field: $field,
                        value: u32::from(other),
                    }),
                }
            }

            /// Returns a human-readable name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use wire_enum;

/// System capability bitmap (802.1AB, section 8.5.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemCapabilities(u16);

impl SystemCapabilities {
    pub const OTHER: u16 = 0x01;
    pub const REPEATER: u16 = 0x02;
    pub const BRIDGE: u16 = 0x04;
    pub const WLAN: u16 = 0x08;
    pub const ROUTER: u16 = 0x10;
    pub const TELEPHONE: u16 = 0x20;
    pub const DOCSIS: u16 = 0x40;
    pub const STATION: u16 = 0x80;

    const NAMES: [(u16, &'static str); 8] = [
        (Self::OTHER, "Other"),
        (Self::REPEATER, "Repeater"),
        (Self::BRIDGE, "Bridge"),
        (Self::WLAN, "Wlan"),
        (Self::ROUTER, "Router"),
        (Self::TELEPHONE, "Tel"),
        (Self::DOCSIS, "Docsis"),
        (Self::STATION, "Station"),
    ];

    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, bit: u16) -> bool {
        self.0 & bit == bit
    }

    /// Names of every capability set in this bitmap, lowest bit first.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for SystemCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}

/// Renders bytes as lowercase hex pairs joined by `sep`.
///
/// ```
/// assert_eq!(lldp_core::format_hex(&[0x00, 0x1b, 0xff], ':'), "00:1b:ff");
/// ```
pub fn format_hex(bytes: &[u8], sep: char) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
