//! Blocking wrapper around the connection state machine.
//!
//! [`SyncConnection`] runs every exchange to completion over a blocking
//! stream, by default the daemon's Unix socket. It never reports
//! would-block: if the stream does signal it, the operation is simply
//! retried.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::atom::{Atom, AtomArgs};
use crate::config::ClientConfig;
use crate::connection::{Connection, Progress, Transport};
use crate::error::{CtlError, ErrorCode, Result};

/// Transport over a blocking stream.
#[derive(Debug)]
pub struct SyncTransport<S> {
    stream: S,
}

impl<S> SyncTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for SyncTransport<S> {
    fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        let n = self.stream.write(data)?;
        self.stream.flush()?;
        Ok(n)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

/// Connection whose operations block until the exchange completes.
#[derive(Debug)]
pub struct SyncConnection<S = UnixStream> {
    conn: Connection<SyncTransport<S>>,
}

impl SyncConnection<UnixStream> {
    /// Connects to the daemon socket at `path`.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with(&ClientConfig {
            socket_path: path.as_ref().to_path_buf(),
            ..ClientConfig::default()
        })
    }

    /// Connects to the socket named in `config`.
    pub fn connect_with(config: &ClientConfig) -> Result<Self> {
        let path = &config.socket_path;
        let stream = UnixStream::connect(path).map_err(|e| {
            CtlError::new(
                ErrorCode::CannotConnect,
                format!("{}: {e}", path.display()),
            )
        })?;
        debug!(socket = %path.display(), "Connected to daemon");
        Ok(Self::with_config(stream, config))
    }
}

impl<S: Read + Write> SyncConnection<S> {
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, &ClientConfig::default())
    }

    pub fn with_config(stream: S, config: &ClientConfig) -> Self {
        Self {
            conn: Connection::with_config(SyncTransport::new(stream), config),
        }
    }

    pub fn connection(&self) -> &Connection<SyncTransport<S>> {
        &self.conn
    }

    pub fn last_error(&self) -> ErrorCode {
        self.conn.last_error()
    }

    pub fn into_inner(self) -> S {
        self.conn.into_transport().into_inner()
    }

    pub fn get_interfaces(&mut self) -> Result<Atom> {
        drive(|| self.conn.get_interfaces())
    }

    pub fn get_port(&mut self, interface: &Atom) -> Result<Atom> {
        drive(|| self.conn.get_port(interface))
    }

    /// Fetches the port of the interface called `name`.
    pub fn get_port_by_name(&mut self, name: &str) -> Result<Atom> {
        let interface = Atom::new(AtomArgs::Interface {
            conn: Some(self.conn.id()),
            name: name.to_string(),
        })?;
        self.get_port(&interface)
    }

    pub fn set_port(&mut self, port: &Atom) -> Result<()> {
        drive(|| self.conn.set_port(port))
    }
}

fn drive<R>(mut step: impl FnMut() -> Result<Progress<R>>) -> Result<R> {
    loop {
        if let Progress::Complete(value) = step()? {
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomKey;
    use lldp_core::Interface;
    use lldp_protocol::{encode_response, Response};
    use std::io::Cursor;

    /// In-memory stream: reads from a canned buffer, records writes.
    struct Canned {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Read for Canned {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Canned {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            // Short writes exercise the send loop
            let n = buf.len().min(3);
            self.output.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_blocking_exchange() {
        let response = Response::Interfaces(vec![Interface::new("eth0")]);
        let stream = Canned {
            input: Cursor::new(encode_response(&response).unwrap()),
            output: Vec::new(),
        };
        let mut conn = SyncConnection::new(stream);
        let list = conn.get_interfaces().unwrap();
        let names: Vec<String> = list
            .children()
            .unwrap()
            .map(|i| i.get_str(AtomKey::InterfaceName).unwrap())
            .collect();
        assert_eq!(names, ["eth0"]);
        assert_eq!(conn.last_error(), ErrorCode::NoError);

        let written = conn.into_inner().output;
        assert_eq!(
            lldp_protocol::decode_request(&written).unwrap(),
            lldp_protocol::Request::ListInterfaces
        );
    }

    #[test]
    fn test_eof_is_an_error() {
        let stream = Canned {
            input: Cursor::new(Vec::new()),
            output: Vec::new(),
        };
        let mut conn = SyncConnection::new(stream);
        let err = conn.get_interfaces().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Eof);
        assert_eq!(conn.last_error(), ErrorCode::Eof);
    }

    #[test]
    fn test_connect_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyncConnection::connect(dir.path().join("missing.sock")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotConnect);
    }
}
