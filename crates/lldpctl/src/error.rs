//! Error types for the LLDP control client.
//!
//! Every failure carries an [`ErrorCode`] from a closed, numbered set so
//! that callers can branch on the kind of failure, plus a message
//! describing what went wrong. Connections additionally remember the
//! code of their last failure (see `Connection::last_error`).
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::fmt;
use std::io;

use lldp_core::DomainError;
use lldp_protocol::MarshalError;
use thiserror::Error;

// ============================================================================
// Error Codes
// ============================================================================

/// Numbered error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    #[default]
    NoError,
    /// The transport cannot make progress right now
    WouldBlock,
    /// The daemon closed the connection
    Eof,
    /// The requested entity does not exist
    NotExist,
    /// Unable to reach the daemon
    CannotConnect,
    /// The atom does not support the requested operation or key
    IncorrectAtomType,
    /// Malformed or unexpected message
    Serialization,
    /// Call not allowed in the current connection state
    InvalidState,
    /// The atom cannot be iterated
    CannotIterate,
    /// The value is out of range or of the wrong shape
    BadValue,
    /// The atom cannot create children
    CannotCreate,
    Fatal,
    NoMem,
    /// A transport callback failed
    CallbackFailure,
}

impl ErrorCode {
    /// Numeric value of the code.
    pub const fn code(self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::WouldBlock => -501,
            Self::Eof => -502,
            Self::NotExist => -503,
            Self::CannotConnect => -504,
            Self::IncorrectAtomType => -505,
            Self::Serialization => -506,
            Self::InvalidState => -507,
            Self::CannotIterate => -508,
            Self::BadValue => -509,
            Self::CannotCreate => -510,
            Self::Fatal => -900,
            Self::NoMem => -901,
            Self::CallbackFailure => -902,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::NoError,
            -501 => Self::WouldBlock,
            -502 => Self::Eof,
            -503 => Self::NotExist,
            -504 => Self::CannotConnect,
            -505 => Self::IncorrectAtomType,
            -506 => Self::Serialization,
            -507 => Self::InvalidState,
            -508 => Self::CannotIterate,
            -509 => Self::BadValue,
            -510 => Self::CannotCreate,
            -900 => Self::Fatal,
            -901 => Self::NoMem,
            -902 => Self::CallbackFailure,
            _ => return None,
        })
    }

    /// Human-readable description of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoError => "No error",
            Self::WouldBlock => "Requested operation would block",
            Self::Eof => "End of file reached",
            Self::NotExist => "The requested information does not exist",
            Self::CannotConnect => "Unable to connect to lldpd daemon",
            Self::IncorrectAtomType => "Provided atom is of incorrect type",
            Self::Serialization => "Error while serializing or unserializing data",
            Self::InvalidState => "Other input/output operation already in progress",
            Self::CannotIterate => "Cannot iterate on this atom",
            Self::BadValue => "Provided value is invalid",
            Self::CannotCreate => "Cannot create a new element for this atom",
            Self::Fatal => "Unexpected fatal error",
            Self::NoMem => "Not enough memory available",
            Self::CallbackFailure => "A failure occurred during callback processing",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Client Error Type
// ============================================================================

/// Error returned by client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct CtlError {
    code: ErrorCode,
    message: String,
}

impl CtlError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn incorrect_atom_type(what: impl fmt::Display) -> Self {
        Self::new(ErrorCode::IncorrectAtomType, what.to_string())
    }

    pub(crate) fn bad_value(what: impl fmt::Display) -> Self {
        Self::new(ErrorCode::BadValue, what.to_string())
    }

    pub(crate) fn not_exist(what: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NotExist, what.to_string())
    }
}

impl From<MarshalError> for CtlError {
    fn from(err: MarshalError) -> Self {
        Self::new(ErrorCode::Serialization, err.to_string())
    }
}

impl From<DomainError> for CtlError {
    fn from(err: DomainError) -> Self {
        Self::new(ErrorCode::BadValue, err.to_string())
    }
}

/// Transport failures other than would-block.
impl From<io::Error> for CtlError {
    fn from(err: io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::WouldBlock => ErrorCode::WouldBlock,
            io::ErrorKind::UnexpectedEof => ErrorCode::Eof,
            io::ErrorKind::NotFound
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::PermissionDenied => ErrorCode::CannotConnect,
            _ => ErrorCode::CallbackFailure,
        };
        Self::new(code, err.to_string())
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Convenience Result type alias for client operations.
pub type Result<T> = std::result::Result<T, CtlError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 14] = [
        ErrorCode::NoError,
        ErrorCode::WouldBlock,
        ErrorCode::Eof,
        ErrorCode::NotExist,
        ErrorCode::CannotConnect,
        ErrorCode::IncorrectAtomType,
        ErrorCode::Serialization,
        ErrorCode::InvalidState,
        ErrorCode::CannotIterate,
        ErrorCode::BadValue,
        ErrorCode::CannotCreate,
        ErrorCode::Fatal,
        ErrorCode::NoMem,
        ErrorCode::CallbackFailure,
    ];

    #[test]
    fn test_code_values_roundtrip() {
        for code in ALL {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code(-1), None);
        assert_eq!(ErrorCode::InvalidState.code(), -507);
        assert_eq!(ErrorCode::CallbackFailure.code(), -902);
    }

    #[test]
    fn test_ctl_error_display() {
        let error = CtlError::new(ErrorCode::NotExist, "no interface eth9");
        let display = format!("{error}");
        assert!(display.contains("does not exist"));
        assert!(display.contains("eth9"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CtlError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(err.code(), ErrorCode::CallbackFailure);

        let err: CtlError = io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into();
        assert_eq!(err.code(), ErrorCode::CannotConnect);
    }

    #[test]
    fn test_marshal_error_conversion() {
        let err: CtlError = MarshalError::UnknownType(9).into();
        assert_eq!(err.code(), ErrorCode::Serialization);
        assert!(err.message().contains('9'));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: CtlError = DomainError::invalid("vid", 5000, "0-4094").into();
        assert_eq!(err.code(), ErrorCode::BadValue);
    }
}
