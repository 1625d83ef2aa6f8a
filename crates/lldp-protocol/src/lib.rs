//! LLDP Protocol - Wire formats for discovery and daemon control
//!
//! This crate provides two vocabularies:
//! - `tlv` and `pdu`: the Type-Length-Value records LLDP puts on the
//!   wire, and an LLDPDU builder/parser over them
//! - `message` and `marshal`: the typed request/response pairs exchanged
//!   between the control client and the daemon, and their framing

pub mod marshal;
pub mod message;
pub mod pdu;
pub mod tlv;
pub mod version;

pub use marshal::{
    decode_request, decode_response, encode_request, encode_response, frame_len, FrameHeader,
    MarshalError, HEADER_LEN, MAX_PAYLOAD_LEN,
};
pub use message::{MessageType, Request, Response};
pub use pdu::{DecodedPdu, Pdu};
pub use tlv::{Dot1Subtype, Dot3Subtype, MedSubtype, OrgTlv, Tlv, TlvError, TlvType};
pub use version::ProtocolVersion;
