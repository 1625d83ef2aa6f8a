//! Request/response pairs of the control protocol.
//!
//! Each pair shares one message-type discriminant: the client sends a
//! request tagged with it, the daemon answers with the same tag, or with
//! `MessageType::None` when the request failed.

use std::fmt;

use lldp_core::{Hardware, Interface, PortSettings};

/// Message-type discriminant carried in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Failure reply
    None,
    /// List local interfaces
    GetInterfaces,
    /// Get one interface's port and neighbors
    GetInterface,
    /// Change local port settings
    SetPort,
}

impl MessageType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::GetInterfaces => 1,
            Self::GetInterface => 2,
            Self::SetPort => 3,
        }
    }

    /// Parses a wire discriminant; `None` for unknown types.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::GetInterfaces),
            2 => Some(Self::GetInterface),
            3 => Some(Self::SetPort),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "NONE",
            Self::GetInterfaces => "GET_INTERFACES",
            Self::GetInterface => "GET_INTERFACE",
            Self::SetPort => "SET_PORT",
        };
        f.write_str(label)
    }
}

/// Requests sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListInterfaces,
    GetPort { name: String },
    SetPort(PortSettings),
}

impl Request {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::ListInterfaces => MessageType::GetInterfaces,
            Self::GetPort { .. } => MessageType::GetInterface,
            Self::SetPort(_) => MessageType::SetPort,
        }
    }

    pub fn get_port(name: impl Into<String>) -> Self {
        Self::GetPort { name: name.into() }
    }
}

/// Responses sent by the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Interfaces(Vec<Interface>),
    Port(Box<Hardware>),
    /// Set-port acknowledgement; the resulting port state is not returned
    PortSet,
    Failure { reason: String },
}

impl Response {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Interfaces(_) => MessageType::GetInterfaces,
            Self::Port(_) => MessageType::GetInterface,
            Self::PortSet => MessageType::SetPort,
            Self::Failure { .. } => MessageType::None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants() {
        for t in [
            MessageType::None,
            MessageType::GetInterfaces,
            MessageType::GetInterface,
            MessageType::SetPort,
        ] {
            assert_eq!(MessageType::from_u8(t.to_u8()), Some(t));
        }
        assert_eq!(MessageType::from_u8(9), None);
    }

    #[test]
    fn test_request_response_pairing() {
        assert_eq!(
            Request::get_port("eth0").message_type(),
            Response::Port(Box::new(Hardware::new("eth0", 1))).message_type()
        );
        assert_eq!(
            Request::SetPort(PortSettings::new("eth0")).message_type(),
            Response::PortSet.message_type()
        );
        assert_eq!(Response::failure("nope").message_type(), MessageType::None);
    }

    #[test]
    fn test_message_type_display() {
        assert_eq!(MessageType::GetInterface.to_string(), "GET_INTERFACE");
    }
}
