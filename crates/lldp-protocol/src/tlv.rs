//! TLV vocabulary and record codec.
//!
//! Every LLDP attribute is a TLV with a 16-bit header: the upper 7 bits
//! carry the type, the lower 9 bits the value length (so a value is at
//! most 511 bytes). Type 127 is organizationally specific: its value
//! starts with a 3-byte OUI and a subtype byte.
//!
//! ```text
//! ┌────────────┬──────────────┬──────────────────────┐
//! │ type (7 b) │ length (9 b) │ value (length bytes) │
//! └────────────┴──────────────┴──────────────────────┘
//! ```

use thiserror::Error;

/// EtherType of LLDP frames.
pub const ETHERTYPE_LLDP: u16 = 0x88cc;

/// Nearest-bridge multicast destination for LLDP frames.
pub const LLDP_MULTICAST_ADDR: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e];

/// Size of the type/length header.
pub const TLV_HEADER_LEN: usize = 2;

/// Largest value a 9-bit length can describe.
pub const MAX_TLV_VALUE_LEN: usize = 511;

/// Largest type a 7-bit field can describe.
const MAX_TLV_TYPE: u8 = 127;

/// OUI + subtype prefix of an organizationally specific value.
const ORG_PREFIX_LEN: usize = 4;

/// Organizationally unique identifiers of the supported extensions.
pub mod oui {
    pub const DOT1: [u8; 3] = [0x00, 0x80, 0xc2];
    pub const DOT3: [u8; 3] = [0x00, 0x12, 0x0f];
    pub const MED: [u8; 3] = [0x00, 0x12, 0xbb];
}

/// Standard TLV types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlvType {
    End,
    ChassisId,
    PortId,
    Ttl,
    PortDescription,
    SystemName,
    SystemDescription,
    SystemCapabilities,
    ManagementAddress,
    OrganizationallySpecific,
}

impl TlvType {
    /// Wire value of the type.
    pub const fn value(self) -> u8 {
        match self {
            Self::End => 0,
            Self::ChassisId => 1,
            Self::PortId => 2,
            Self::Ttl => 3,
            Self::PortDescription => 4,
            Self::SystemName => 5,
            Self::SystemDescription => 6,
            Self::SystemCapabilities => 7,
            Self::ManagementAddress => 8,
            Self::OrganizationallySpecific => 127,
        }
    }

    /// Parses a wire type; `None` for reserved values (9-126).
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::End),
            1 => Some(Self::ChassisId),
            2 => Some(Self::PortId),
            3 => Some(Self::Ttl),
            4 => Some(Self::PortDescription),
            5 => Some(Self::SystemName),
            6 => Some(Self::SystemDescription),
            7 => Some(Self::SystemCapabilities),
            8 => Some(Self::ManagementAddress),
            127 => Some(Self::OrganizationallySpecific),
            _ => None,
        }
    }
}

/// Declares an organizationally specific subtype set with its wire values.
macro_rules! org_subtypes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Wire value of the subtype.
            pub const fn value(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Parses a wire subtype; `None` for subtypes not understood.
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

org_subtypes! {
    /// 802.1 subtypes (OUI 00-80-C2).
    Dot1Subtype {
        Pvid = 1,
        Ppvid = 2,
        VlanName = 3,
        ProtocolIdentity = 4,
    }
}

org_subtypes! {
    /// 802.3 subtypes (OUI 00-12-0F).
    Dot3Subtype {
        MacPhy = 1,
        Power = 2,
        LinkAggregation = 3,
        MaxFrameSize = 4,
    }
}

org_subtypes! {
    /// LLDP-MED subtypes (OUI 00-12-BB).
    MedSubtype {
        Capabilities = 1,
        Policy = 2,
        Location = 3,
        ExtendedPower = 4,
        HardwareRevision = 5,
        FirmwareRevision = 6,
        SoftwareRevision = 7,
        SerialNumber = 8,
        Manufacturer = 9,
        Model = 10,
        AssetId = 11,
    }
}

/// Errors raised while building or reading TLVs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    #[error("TLV header truncated: {remaining} byte(s) left")]
    TruncatedHeader { remaining: usize },

    #[error("TLV type {tlv_type} declares {declared} byte(s) but only {remaining} remain")]
    LengthOverrun {
        tlv_type: u8,
        declared: usize,
        remaining: usize,
    },

    #[error("TLV value of {len} byte(s) exceeds the 511-byte limit")]
    ValueTooLong { len: usize },

    #[error("TLV type {0} does not fit in 7 bits")]
    InvalidType(u8),

    #[error("TLV sequence is not terminated by an end-of-PDU marker")]
    MissingEnd,

    #[error("End-of-PDU marker carries {0} byte(s) of value")]
    NonEmptyEnd(usize),

    #[error("Organizationally specific TLV too short: {0} byte(s)")]
    OrgTooShort(usize),

    #[error("Malformed {tlv} TLV: {reason}")]
    Malformed { tlv: &'static str, reason: String },

    #[error("Mandatory {0} TLV missing or out of order")]
    MissingMandatory(&'static str),

    #[error("Not an LLDP frame (EtherType {0:#06x})")]
    NotLldp(u16),
}

/// One TLV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tlv_type: u8,
    value: Vec<u8>,
}

impl Tlv {
    /// Creates a TLV, checking type and length fit their bit fields.
    pub fn new(tlv_type: u8, value: Vec<u8>) -> Result<Self, TlvError> {
        if tlv_type > MAX_TLV_TYPE {
            return Err(TlvError::InvalidType(tlv_type));
        }
        if value.len() > MAX_TLV_VALUE_LEN {
            return Err(TlvError::ValueTooLong { len: value.len() });
        }
        Ok(Self { tlv_type, value })
    }

    /// Creates a standard TLV.
    pub fn standard(tlv_type: TlvType, value: Vec<u8>) -> Result<Self, TlvError> {
        Self::new(tlv_type.value(), value)
    }

    /// Creates an organizationally specific TLV.
    pub fn org(oui: [u8; 3], subtype: u8, payload: &[u8]) -> Result<Self, TlvError> {
        let mut value = Vec::with_capacity(ORG_PREFIX_LEN + payload.len());
        value.extend_from_slice(&oui);
        value.push(subtype);
        value.extend_from_slice(payload);
        Self::new(TlvType::OrganizationallySpecific.value(), value)
    }

    /// The end-of-PDU marker.
    pub fn end() -> Self {
        Self {
            tlv_type: TlvType::End.value(),
            value: Vec::new(),
        }
    }

    pub fn tlv_type(&self) -> u8 {
        self.tlv_type
    }

    /// Standard type, if this TLV uses one.
    pub fn kind(&self) -> Option<TlvType> {
        TlvType::from_u8(self.tlv_type)
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Length of the value in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Appends header and value to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        // Both fields were range-checked at construction.
        let header = (u16::from(self.tlv_type) << 9) | (self.value.len() as u16 & 0x01ff);
        out.extend_from_slice(&header.to_be_bytes());
        out.extend_from_slice(&self.value);
    }

    /// Reads one TLV from the front of `buf`, returning it with the rest.
    ///
    /// Never reads past the end of `buf`: a declared length larger than
    /// what remains is an error.
    pub fn decode(buf: &[u8]) -> Result<(Self, &[u8]), TlvError> {
        let (header, rest) = match buf {
            [hi, lo, rest @ ..] => (u16::from_be_bytes([*hi, *lo]), rest),
            _ => return Err(TlvError::TruncatedHeader { remaining: buf.len() }),
        };
        let tlv_type = (header >> 9) as u8;
        let declared = usize::from(header & 0x01ff);
        let value = rest.get(..declared).ok_or(TlvError::LengthOverrun {
            tlv_type,
            declared,
            remaining: rest.len(),
        })?;
        let tail = rest.get(declared..).unwrap_or_default();
        Ok((
            Self {
                tlv_type,
                value: value.to_vec(),
            },
            tail,
        ))
    }

    /// Reads a TLV sequence up to its end-of-PDU marker.
    ///
    /// The marker is not included in the result. Bytes after it (frame
    /// padding) are ignored.
    pub fn decode_all(mut buf: &[u8]) -> Result<Vec<Self>, TlvError> {
        let mut tlvs = Vec::new();
        loop {
            if buf.is_empty() {
                return Err(TlvError::MissingEnd);
            }
            let (tlv, rest) = Self::decode(buf)?;
            if tlv.tlv_type == TlvType::End.value() {
                if !tlv.value.is_empty() {
                    return Err(TlvError::NonEmptyEnd(tlv.value.len()));
                }
                return Ok(tlvs);
            }
            tlvs.push(tlv);
            buf = rest;
        }
    }

    /// Encodes a sequence followed by the end-of-PDU marker.
    pub fn encode_all(tlvs: &[Self]) -> Vec<u8> {
        let mut out = Vec::new();
        for tlv in tlvs {
            tlv.encode(&mut out);
        }
        Self::end().encode(&mut out);
        out
    }

    /// Views this TLV as organizationally specific.
    ///
    /// Returns `Ok(None)` for any other type.
    pub fn as_org(&self) -> Result<Option<OrgTlv<'_>>, TlvError> {
        if self.tlv_type != TlvType::OrganizationallySpecific.value() {
            return Ok(None);
        }
        match self.value.as_slice() {
            [a, b, c, subtype, payload @ ..] => Ok(Some(OrgTlv {
                oui: [*a, *b, *c],
                subtype: *subtype,
                payload,
            })),
            short => Err(TlvError::OrgTooShort(short.len())),
        }
    }
}

/// Borrowed view of an organizationally specific TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgTlv<'a> {
    pub oui: [u8; 3],
    pub subtype: u8,
    pub payload: &'a [u8],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlv_roundtrip() {
        let tlv = Tlv::standard(TlvType::SystemName, b"switch01".to_vec()).unwrap();
        let mut buf = Vec::new();
        tlv.encode(&mut buf);
        assert_eq!(buf.len(), TLV_HEADER_LEN + 8);

        let (decoded, rest) = Tlv::decode(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded.tlv_type(), 5);
        assert_eq!(decoded.len(), 8);
        assert_eq!(decoded.value(), b"switch01");
        assert_eq!(decoded.kind(), Some(TlvType::SystemName));
    }

    #[test]
    fn test_max_length_value() {
        let tlv = Tlv::new(6, vec![b'x'; MAX_TLV_VALUE_LEN]).unwrap();
        let mut buf = Vec::new();
        tlv.encode(&mut buf);
        let (decoded, _) = Tlv::decode(&buf).unwrap();
        assert_eq!(decoded.len(), MAX_TLV_VALUE_LEN);
    }

    #[test]
    fn test_rejects_oversize_and_bad_type() {
        assert_eq!(
            Tlv::new(6, vec![0; 512]),
            Err(TlvError::ValueTooLong { len: 512 })
        );
        assert_eq!(Tlv::new(128, Vec::new()), Err(TlvError::InvalidType(128)));
    }

    #[test]
    fn test_length_overrun_rejected() {
        // Type 4 declares 10 bytes, only 4 follow
        let header: u16 = (4 << 9) | 10;
        let mut buf = header.to_be_bytes().to_vec();
        buf.extend_from_slice(&[1, 2, 3, 4]);

        let err = Tlv::decode(&buf).unwrap_err();
        assert_eq!(
            err,
            TlvError::LengthOverrun {
                tlv_type: 4,
                declared: 10,
                remaining: 4
            }
        );
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(
            Tlv::decode(&[0x02]),
            Err(TlvError::TruncatedHeader { remaining: 1 })
        );
    }

    #[test]
    fn test_decode_all_requires_end() {
        let tlv = Tlv::standard(TlvType::Ttl, vec![0, 120]).unwrap();
        let mut buf = Vec::new();
        tlv.encode(&mut buf);
        assert_eq!(Tlv::decode_all(&buf), Err(TlvError::MissingEnd));

        let terminated = Tlv::encode_all(&[tlv.clone()]);
        assert_eq!(Tlv::decode_all(&terminated).unwrap(), vec![tlv]);
    }

    #[test]
    fn test_decode_all_ignores_padding() {
        let mut buf = Tlv::encode_all(&[]);
        buf.extend_from_slice(&[0xaa; 10]);
        assert!(Tlv::decode_all(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_org_view() {
        let tlv = Tlv::org(oui::DOT1, Dot1Subtype::Pvid.value(), &[0x00, 0x64]).unwrap();
        let org = tlv.as_org().unwrap().unwrap();
        assert_eq!(org.oui, oui::DOT1);
        assert_eq!(Dot1Subtype::from_u8(org.subtype), Some(Dot1Subtype::Pvid));
        assert_eq!(org.payload, &[0x00, 0x64]);

        let short = Tlv::new(127, vec![0x00, 0x80]).unwrap();
        assert_eq!(short.as_org(), Err(TlvError::OrgTooShort(2)));

        let plain = Tlv::standard(TlvType::PortDescription, Vec::new()).unwrap();
        assert_eq!(plain.as_org(), Ok(None));
    }

    #[test]
    fn test_type_registry() {
        assert_eq!(TlvType::from_u8(127), Some(TlvType::OrganizationallySpecific));
        assert_eq!(TlvType::from_u8(9), None);
        assert_eq!(TlvType::ManagementAddress.value(), 8);
        assert_eq!(ETHERTYPE_LLDP, 0x88cc);
    }

    #[test]
    fn test_subtype_registry() {
        assert_eq!(Dot1Subtype::from_u8(3), Some(Dot1Subtype::VlanName));
        assert_eq!(Dot1Subtype::from_u8(5), None);
        assert_eq!(Dot3Subtype::MaxFrameSize.value(), 4);
        assert_eq!(Dot3Subtype::from_u8(0), None);
        assert_eq!(MedSubtype::from_u8(11), Some(MedSubtype::AssetId));
        assert_eq!(MedSubtype::from_u8(12), None);
    }
}
