//! Marshaling between typed messages and flat byte frames.
//!
//! On-wire layout:
//!
//! ```text
//! [type:u8][major:u8][minor:u8][reserved:u8][payload_len:u32 BE][payload...]
//! ```
//!
//! The payload of each message type has a fixed shape: empty for
//! list-interfaces requests and set-port acknowledgements, JSON of the
//! typed structure for everything else. Decoding checks the declared
//! length against the bytes actually present and against that shape.

use lldp_core::{Hardware, Interface, PortSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::message::{MessageType, Request, Response};
use crate::version::ProtocolVersion;

/// Size of the frame header.
pub const HEADER_LEN: usize = 8;

/// Maximum payload size (1 MB)
pub const MAX_PAYLOAD_LEN: usize = 1_048_576;

/// Errors raised while encoding or decoding frames.
#[derive(Error, Debug)]
pub enum MarshalError {
    #[error("Frame header truncated: {0} byte(s)")]
    ShortHeader(usize),

    #[error("Unknown message type {0}")]
    UnknownType(u8),

    #[error("Unexpected {got} message in {context}")]
    UnexpectedType {
        got: MessageType,
        context: &'static str,
    },

    #[error("Incompatible protocol version {0} (expected {major}.x)", major = ProtocolVersion::CURRENT.major)]
    IncompatibleVersion(ProtocolVersion),

    #[error("Payload of {0} byte(s) exceeds the maximum message size")]
    PayloadTooLarge(usize),

    #[error("Frame declares {declared} payload byte(s) but {actual} are present")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{0} message carries an unexpected {1}-byte payload")]
    UnexpectedPayload(MessageType, usize),

    #[error("{0} message is missing its payload")]
    MissingPayload(MessageType),

    #[error("Failed to encode or decode payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub message_type: MessageType,
    pub version: ProtocolVersion,
    pub payload_len: usize,
}

impl FrameHeader {
    pub fn new(message_type: MessageType, payload_len: usize) -> Self {
        Self {
            message_type,
            version: ProtocolVersion::CURRENT,
            payload_len,
        }
    }

    /// Encodes the header.
    pub fn encode(&self) -> Result<[u8; HEADER_LEN], MarshalError> {
        let len = u32::try_from(self.payload_len)
            .ok()
            .filter(|_| self.payload_len <= MAX_PAYLOAD_LEN)
            .ok_or(MarshalError::PayloadTooLarge(self.payload_len))?;
        let [l0, l1, l2, l3] = len.to_be_bytes();
        Ok([
            self.message_type.to_u8(),
            self.version.major,
            self.version.minor,
            0,
            l0,
            l1,
            l2,
            l3,
        ])
    }

    /// Parses a header from the front of `buf`.
    ///
    /// Returns `Ok(None)` while fewer than `HEADER_LEN` bytes are
    /// available.
    pub fn parse(buf: &[u8]) -> Result<Option<Self>, MarshalError> {
        let Some(&[kind, major, minor, _reserved, l0, l1, l2, l3]) = buf.first_chunk::<HEADER_LEN>()
        else {
            return Ok(None);
        };
        let message_type = MessageType::from_u8(kind).ok_or(MarshalError::UnknownType(kind))?;
        let version = ProtocolVersion::new(major, minor);
        if !version.is_compatible_with(&ProtocolVersion::CURRENT) {
            return Err(MarshalError::IncompatibleVersion(version));
        }
        let payload_len = u32::from_be_bytes([l0, l1, l2, l3]) as usize;
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(MarshalError::PayloadTooLarge(payload_len));
        }
        Ok(Some(Self {
            message_type,
            version,
            payload_len,
        }))
    }
}

/// Total length of the frame starting at `buf`, once its header is in.
///
/// Lets incremental readers know how many bytes to wait for.
pub fn frame_len(buf: &[u8]) -> Result<Option<usize>, MarshalError> {
    Ok(FrameHeader::parse(buf)?.map(|h| HEADER_LEN + h.payload_len))
}

fn encode_frame(message_type: MessageType, payload: Vec<u8>) -> Result<Vec<u8>, MarshalError> {
    let header = FrameHeader::new(message_type, payload.len()).encode()?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Splits a complete frame into type and payload.
///
/// `buf` must hold exactly one frame: fewer bytes than declared is an
/// under-run, more is an over-run.
fn decode_frame(buf: &[u8]) -> Result<(MessageType, &[u8]), MarshalError> {
    let header = FrameHeader::parse(buf)?.ok_or(MarshalError::ShortHeader(buf.len()))?;
    let payload = buf.get(HEADER_LEN..).unwrap_or_default();
    if payload.len() != header.payload_len {
        return Err(MarshalError::LengthMismatch {
            declared: header.payload_len,
            actual: payload.len(),
        });
    }
    Ok((header.message_type, payload))
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MarshalError> {
    Ok(serde_json::to_vec(value)?)
}

fn from_json<T: DeserializeOwned>(kind: MessageType, payload: &[u8]) -> Result<T, MarshalError> {
    if payload.is_empty() {
        return Err(MarshalError::MissingPayload(kind));
    }
    Ok(serde_json::from_slice(payload)?)
}

fn expect_empty(kind: MessageType, payload: &[u8]) -> Result<(), MarshalError> {
    if payload.is_empty() {
        Ok(())
    } else {
        Err(MarshalError::UnexpectedPayload(kind, payload.len()))
    }
}

/// Encodes a client request into a frame.
pub fn encode_request(request: &Request) -> Result<Vec<u8>, MarshalError> {
    let payload = match request {
        Request::ListInterfaces => Vec::new(),
        Request::GetPort { name } => json(name)?,
        Request::SetPort(settings) => json(settings)?,
    };
    encode_frame(request.message_type(), payload)
}

/// Decodes a client request from a complete frame.
pub fn decode_request(buf: &[u8]) -> Result<Request, MarshalError> {
    let (kind, payload) = decode_frame(buf)?;
    match kind {
        MessageType::GetInterfaces => {
            expect_empty(kind, payload)?;
            Ok(Request::ListInterfaces)
        }
        MessageType::GetInterface => Ok(Request::GetPort {
            name: from_json(kind, payload)?,
        }),
        MessageType::SetPort => Ok(Request::SetPort(from_json::<PortSettings>(kind, payload)?)),
        MessageType::None => Err(MarshalError::UnexpectedType {
            got: kind,
            context: "request",
        }),
    }
}

/// Encodes a daemon response into a frame.
pub fn encode_response(response: &Response) -> Result<Vec<u8>, MarshalError> {
    let payload = match response {
        Response::Interfaces(interfaces) => json(interfaces)?,
        Response::Port(hardware) => json(hardware)?,
        Response::PortSet => Vec::new(),
        Response::Failure { reason } => json(reason)?,
    };
    encode_frame(response.message_type(), payload)
}

/// Decodes a daemon response from a complete frame.
pub fn decode_response(buf: &[u8]) -> Result<Response, MarshalError> {
    let (kind, payload) = decode_frame(buf)?;
    match kind {
        MessageType::GetInterfaces => Ok(Response::Interfaces(from_json::<Vec<Interface>>(
            kind, payload,
        )?)),
        MessageType::GetInterface => Ok(Response::Port(Box::new(from_json::<Hardware>(
            kind, payload,
        )?))),
        MessageType::SetPort => {
            expect_empty(kind, payload)?;
            Ok(Response::PortSet)
        }
        MessageType::None => Ok(Response::Failure {
            reason: from_json(kind, payload)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::{MedAppType, MedPolicy, Port};

    fn sample_hardware() -> Hardware {
        let mut hw = Hardware::new("eth0", 2);
        let mut neighbor = Port::with_ifname("Gi0/1");
        neighbor.chassis.name = Some("switch01".to_string());
        neighbor.ttl = 120;
        hw.neighbors.push(neighbor);
        hw
    }

    #[test]
    fn test_request_roundtrip() {
        let mut settings = PortSettings::new("eth0");
        settings.med_policy = Some(MedPolicy::new(MedAppType::Voice));

        for request in [
            Request::ListInterfaces,
            Request::get_port("eth0"),
            Request::SetPort(settings),
        ] {
            let frame = encode_request(&request).unwrap();
            assert_eq!(frame.first(), Some(&request.message_type().to_u8()));
            assert_eq!(decode_request(&frame).unwrap(), request);
        }
    }

    #[test]
    fn test_response_roundtrip() {
        for response in [
            Response::Interfaces(vec![Interface::new("eth0"), Interface::new("eth1")]),
            Response::Port(Box::new(sample_hardware())),
            Response::PortSet,
            Response::failure("no such interface"),
        ] {
            let frame = encode_response(&response).unwrap();
            assert_eq!(decode_response(&frame).unwrap(), response);
        }
    }

    #[test]
    fn test_list_interfaces_has_empty_payload() {
        let frame = encode_request(&Request::ListInterfaces).unwrap();
        assert_eq!(frame.len(), HEADER_LEN);
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let frame = encode_request(&Request::get_port("eth0")).unwrap();
        let err = decode_request(&frame[..frame.len() - 1]).unwrap_err();
        assert!(matches!(err, MarshalError::LengthMismatch { .. }));

        let err = decode_request(&frame[..3]).unwrap_err();
        assert!(matches!(err, MarshalError::ShortHeader(3)));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut frame = encode_response(&Response::PortSet).unwrap();
        frame.push(0);
        let err = decode_response(&frame).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::LengthMismatch {
                declared: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut frame = encode_request(&Request::ListInterfaces).unwrap();
        frame[0] = 42;
        assert!(matches!(
            decode_request(&frame),
            Err(MarshalError::UnknownType(42))
        ));
    }

    #[test]
    fn test_incompatible_version_rejected() {
        let mut frame = encode_request(&Request::ListInterfaces).unwrap();
        frame[1] = 2;
        assert!(matches!(
            decode_request(&frame),
            Err(MarshalError::IncompatibleVersion(_))
        ));
    }

    #[test]
    fn test_payload_shape_enforced() {
        // A set-port acknowledgement must not carry data
        let frame = encode_frame(MessageType::SetPort, b"{}".to_vec()).unwrap();
        assert!(matches!(
            decode_response(&frame),
            Err(MarshalError::UnexpectedPayload(MessageType::SetPort, 2))
        ));

        // A get-interface reply must
        let frame = encode_frame(MessageType::GetInterface, Vec::new()).unwrap();
        assert!(matches!(
            decode_response(&frame),
            Err(MarshalError::MissingPayload(MessageType::GetInterface))
        ));

        // And it must be a hardware record, not something else
        let frame = encode_frame(MessageType::GetInterface, b"[1,2]".to_vec()).unwrap();
        assert!(matches!(decode_response(&frame), Err(MarshalError::Payload(_))));
    }

    #[test]
    fn test_failure_is_not_a_request() {
        let frame = encode_response(&Response::failure("x")).unwrap();
        assert!(matches!(
            decode_request(&frame),
            Err(MarshalError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn test_frame_len_incremental() {
        let frame = encode_request(&Request::get_port("eth1")).unwrap();
        assert_eq!(frame_len(&frame[..4]).unwrap(), None);
        assert_eq!(frame_len(&frame[..HEADER_LEN]).unwrap(), Some(frame.len()));
    }

    #[test]
    fn test_oversized_declared_length() {
        let mut header = FrameHeader::new(MessageType::GetInterfaces, 0).encode().unwrap();
        header[4..].copy_from_slice(&((MAX_PAYLOAD_LEN as u32) + 1).to_be_bytes());
        assert!(matches!(
            FrameHeader::parse(&header),
            Err(MarshalError::PayloadTooLarge(_))
        ));
    }
}
