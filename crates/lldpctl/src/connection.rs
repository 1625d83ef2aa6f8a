//! Client connection state machine.
//!
//! A [`Connection`] drives one request/response exchange at a time over a
//! byte-stream [`Transport`]. Each exchange goes through a send state
//! (the marshaled request is written out) and a receive state (bytes are
//! read until a complete frame is buffered), then returns to idle.
//!
//! With a non-blocking transport, an operation that cannot make progress
//! returns [`Progress::WouldBlock`]; the caller re-invokes the same
//! operation with the same argument once the transport is ready again.
//! Invoking any other operation while an exchange is pending fails with
//! `ErrorCode::InvalidState` and leaves the pending exchange untouched.
//!
//! Transport and marshaling failures end the exchange: the connection
//! records the error, returns to idle and can be used again.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use lldp_core::PortSettings;
use lldp_protocol::{decode_response, encode_request, frame_len, Request, Response};
use tracing::{debug, warn};

use crate::atom::{Atom, AtomArgs, AtomKey, AtomKind, PortAtom};
use crate::config::ClientConfig;
use crate::error::{CtlError, ErrorCode, Result};

// ============================================================================
// Transport
// ============================================================================

/// Byte-stream transport used by a connection.
///
/// Both methods follow `std::io` conventions: `Err` with
/// `ErrorKind::WouldBlock` means no progress is possible right now,
/// `recv` returning `Ok(0)` means the peer closed the stream, any other
/// error is a hard failure.
pub trait Transport {
    fn send(&mut self, data: &[u8]) -> io::Result<usize>;
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).send(data)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }
}

// ============================================================================
// State
// ============================================================================

/// Identity of a connection, recorded in the atoms it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Kinds of exchange a connection performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    ListInterfaces,
    GetPort,
    SetPort,
}

impl Exchange {
    fn of(request: &Request) -> Self {
        match request {
            Request::ListInterfaces => Self::ListInterfaces,
            Request::GetPort { .. } => Self::GetPort,
            Request::SetPort(_) => Self::SetPort,
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    /// Writing the request of an exchange
    Send(Exchange),
    /// Waiting for the response of an exchange
    Recv(Exchange),
}

/// Outcome of an operation that may not complete in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<T> {
    Complete(T),
    /// The transport would block; call again with the same argument
    WouldBlock,
}

impl<T> Progress<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Progress<U> {
        match self {
            Self::Complete(value) => Progress::Complete(f(value)),
            Self::WouldBlock => Progress::WouldBlock,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }

    pub fn complete(self) -> Option<T> {
        match self {
            Self::Complete(value) => Some(value),
            Self::WouldBlock => None,
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Client session with a daemon.
pub struct Connection<T> {
    id: ConnectionId,
    transport: T,
    recv_chunk_size: usize,
    max_message_size: usize,

    output: Vec<u8>,
    sent: usize,
    input: Vec<u8>,

    state: State,
    /// Request of the exchange in progress, compared against re-entrant calls
    pending: Option<Request>,
    last_error: ErrorCode,
}

impl<T> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &ClientConfig::default())
    }

    pub fn with_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            id: ConnectionId::next(),
            transport,
            recv_chunk_size: config.recv_chunk_size.max(1),
            max_message_size: config.max_message_size,
            output: Vec::new(),
            sent: 0,
            input: Vec::new(),
            state: State::Idle,
            pending: None,
            last_error: ErrorCode::NoError,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Code of the last failed operation, `NoError` after a success.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Abandons any exchange in progress.
    ///
    /// Bytes of a half-received response are discarded; the daemon may
    /// still send the rest, so the transport should be replaced too unless
    /// the exchange was still in its send state with nothing written.
    pub fn reset(&mut self) {
        if self.state != State::Idle {
            debug!(conn = %self.id, state = ?self.state, "Resetting connection");
        }
        self.clear();
        self.last_error = ErrorCode::NoError;
    }

    // ------------------------------------------------------------------------
    // Exchanges
    // ------------------------------------------------------------------------

    /// Lists the daemon's interfaces as an interfaces-list atom.
    pub fn get_interfaces(&mut self) -> Result<Progress<Atom>> {
        let progress = self.exchange(Request::ListInterfaces)?;
        let id = self.id;
        self.finish(progress, |response| match response {
            Response::Interfaces(interfaces) => Atom::new(AtomArgs::InterfacesList {
                conn: Some(id),
                interfaces,
            }),
            other => Err(unexpected(Exchange::ListInterfaces, &other)),
        })
    }

    /// Retrieves the local port and neighbors of an interface atom.
    pub fn get_port(&mut self, interface: &Atom) -> Result<Progress<Atom>> {
        self.last_error = ErrorCode::NoError;
        if interface.kind() != AtomKind::Interface {
            return Err(self.reject(CtlError::incorrect_atom_type(format!(
                "get-port needs an interface atom, got {}",
                interface.kind()
            ))));
        }
        let name = interface
            .get_str(AtomKey::InterfaceName)
            .map_err(|e| self.reject(e))?;
        let progress = self.exchange(Request::GetPort { name })?;
        let id = self.id;
        self.finish(progress, |response| match response {
            Response::Port(hardware) => Atom::new(AtomArgs::Port {
                conn: Some(id),
                hardware: *hardware,
            }),
            other => Err(unexpected(Exchange::GetPort, &other)),
        })
    }

    /// Pushes the changes staged on a local port atom to the daemon.
    ///
    /// Only an acknowledgement comes back; fetch the port again to see
    /// the daemon's view of it.
    pub fn set_port(&mut self, port: &Atom) -> Result<Progress<()>> {
        self.last_error = ErrorCode::NoError;
        let settings = match port.downcast::<PortAtom>().and_then(PortAtom::settings) {
            Some(settings) => settings.clone(),
            None => {
                return Err(self.reject(CtlError::incorrect_atom_type(format!(
                    "set-port needs a local port atom, got {}",
                    port.kind()
                ))))
            }
        };
        self.set_port_settings(settings)
    }

    /// Sends a set-port request built by hand.
    pub fn set_port_settings(&mut self, settings: PortSettings) -> Result<Progress<()>> {
        let progress = self.exchange(Request::SetPort(settings))?;
        self.finish(progress, |response| match response {
            Response::PortSet => Ok(()),
            other => Err(unexpected(Exchange::SetPort, &other)),
        })
    }

    fn finish<R>(
        &mut self,
        progress: Progress<Response>,
        convert: impl FnOnce(Response) -> Result<R>,
    ) -> Result<Progress<R>> {
        match progress {
            Progress::WouldBlock => Ok(Progress::WouldBlock),
            Progress::Complete(response) => convert(response)
                .map(Progress::Complete)
                .map_err(|e| self.reject(e)),
        }
    }

    // ------------------------------------------------------------------------
    // State Machine
    // ------------------------------------------------------------------------

    /// Runs `request` through send and receive until it completes, fails
    /// or the transport would block.
    fn exchange(&mut self, request: Request) -> Result<Progress<Response>> {
        self.last_error = ErrorCode::NoError;
        let kind = Exchange::of(&request);

        match self.state {
            State::Idle => {
                let frame = encode_request(&request).map_err(|e| self.fail(e.into()))?;
                debug!(conn = %self.id, exchange = ?kind, len = frame.len(), "Starting exchange");
                self.output = frame;
                self.sent = 0;
                self.input.clear();
                self.state = State::Send(kind);
                self.pending = Some(request);
            }
            State::Send(current) | State::Recv(current) => {
                if current != kind || self.pending.as_ref() != Some(&request) {
                    return Err(self.reject(CtlError::new(
                        ErrorCode::InvalidState,
                        format!("{current:?} exchange already in progress"),
                    )));
                }
            }
        }

        loop {
            match self.state {
                State::Send(kind) => {
                    if self.flush()? == Progress::WouldBlock {
                        return Ok(self.would_block());
                    }
                    self.state = State::Recv(kind);
                }
                State::Recv(_) => {
                    return match self.fill()? {
                        Progress::Complete(response) => {
                            self.clear();
                            match response {
                                Response::Failure { reason } => {
                                    Err(self.reject(CtlError::not_exist(reason)))
                                }
                                response => Ok(Progress::Complete(response)),
                            }
                        }
                        Progress::WouldBlock => Ok(self.would_block()),
                    };
                }
                State::Idle => {
                    return Err(self.fail(CtlError::new(
                        ErrorCode::InvalidState,
                        "exchange ended without a response",
                    )))
                }
            }
        }
    }

    /// Writes the rest of the request.
    fn flush(&mut self) -> Result<Progress<()>> {
        while let Some(rest) = self.output.get(self.sent..).filter(|r| !r.is_empty()) {
            match self.transport.send(rest) {
                Ok(0) => {
                    return Err(self.fail(CtlError::new(
                        ErrorCode::CallbackFailure,
                        "transport accepted no data",
                    )))
                }
                Ok(n) => self.sent += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(Progress::WouldBlock)
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.fail(transport_error("send", e))),
            }
        }
        Ok(Progress::Complete(()))
    }

    /// Reads until a complete response frame is buffered, then decodes it.
    fn fill(&mut self) -> Result<Progress<Response>> {
        loop {
            if let Some(total) = frame_len(&self.input).map_err(|e| self.fail(e.into()))? {
                if total > self.max_message_size {
                    return Err(self.fail(CtlError::new(
                        ErrorCode::Serialization,
                        format!("response of {total} bytes exceeds the size limit"),
                    )));
                }
                if let Some(frame) = self.input.get(..total) {
                    let response = decode_response(frame).map_err(|e| self.fail(e.into()))?;
                    if self.input.len() > total {
                        warn!(
                            conn = %self.id,
                            extra = self.input.len() - total,
                            "Discarding bytes received after the response"
                        );
                    }
                    return Ok(Progress::Complete(response));
                }
            }

            let mut chunk = vec![0u8; self.recv_chunk_size];
            match self.transport.recv(&mut chunk) {
                Ok(0) => {
                    return Err(self.fail(CtlError::new(
                        ErrorCode::Eof,
                        "daemon closed the connection",
                    )))
                }
                Ok(n) => self
                    .input
                    .extend_from_slice(chunk.get(..n).unwrap_or_default()),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(Progress::WouldBlock)
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.fail(transport_error("recv", e))),
            }
        }
    }

    fn would_block<R>(&mut self) -> Progress<R> {
        self.last_error = ErrorCode::WouldBlock;
        Progress::WouldBlock
    }

    fn clear(&mut self) {
        self.state = State::Idle;
        self.pending = None;
        self.output.clear();
        self.sent = 0;
        self.input.clear();
    }

    /// Ends the exchange in progress with `err`.
    fn fail(&mut self, err: CtlError) -> CtlError {
        warn!(conn = %self.id, state = ?self.state, error = %err, "Exchange failed");
        self.clear();
        self.last_error = err.code();
        err
    }

    /// Records `err` without touching the exchange in progress.
    fn reject(&mut self, err: CtlError) -> CtlError {
        self.last_error = err.code();
        err
    }
}

fn transport_error(op: &str, err: io::Error) -> CtlError {
    CtlError::new(ErrorCode::CallbackFailure, format!("{op} failed: {err}"))
}

fn unexpected(exchange: Exchange, response: &Response) -> CtlError {
    CtlError::new(
        ErrorCode::Serialization,
        format!(
            "unexpected {} response to {exchange:?}",
            response.message_type()
        ),
    )
}

// ============================================================================
// Tests
// ============================================================================
