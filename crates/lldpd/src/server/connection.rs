//! Connection handler for individual client connections.
//!
//! Each client gets its own `ConnectionHandler` that reads request frames,
//! asks the registry for an answer and writes the reply frame back. A
//! client may send any number of requests, one at a time.
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Connection errors are logged and result in graceful disconnect

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use lldp_protocol::{decode_request, FrameHeader, MarshalError, Response, HEADER_LEN};

use crate::handler::encode_reply;
use crate::registry::RegistryHandle;

/// Maximum frame size, header included (1 MB of payload)
pub const MAX_MESSAGE_SIZE: usize = HEADER_LEN + lldp_protocol::MAX_PAYLOAD_LEN;

/// Read timeout for idle connections (5 minutes)
pub const READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Write timeout (10 seconds)
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection handler for a single client.
pub struct ConnectionHandler {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    registry: RegistryHandle,
    connection_number: u64,
    read_timeout: Duration,
    max_message_size: usize,
}

impl ConnectionHandler {
    pub fn new(
        reader: OwnedReadHalf,
        writer: OwnedWriteHalf,
        registry: RegistryHandle,
        connection_number: u64,
    ) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
            registry,
            connection_number,
            read_timeout: READ_TIMEOUT,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    pub fn with_limits(mut self, read_timeout: Duration, max_message_size: usize) -> Self {
        self.read_timeout = read_timeout;
        self.max_message_size = max_message_size;
        self
    }

    /// Serves requests until the client leaves or misbehaves.
    pub async fn run(mut self) {
        debug!(connection = self.connection_number, "New client connected");

        if let Err(e) = self.process_frames().await {
            warn!(
                connection = self.connection_number,
                error = %e,
                "Connection closed on error"
            );
        }

        info!(connection = self.connection_number, "Client disconnected");
    }

    async fn process_frames(&mut self) -> Result<(), ConnectionError> {
        loop {
            let frame = match timeout(self.read_timeout, self.read_frame()).await {
                Ok(Ok(frame)) => frame,
                Ok(Err(ConnectionError::Eof)) => {
                    debug!(connection = self.connection_number, "Client sent EOF");
                    return Ok(());
                }
                Ok(Err(ConnectionError::Marshal(e))) => {
                    // The header itself is unusable, so the stream cannot be resynchronized.
                    self.send_frame(&encode_reply(&Response::failure(e.to_string())))
                        .await?;
                    return Err(ConnectionError::Marshal(e));
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(ConnectionError::Timeout),
            };

            let response = match decode_request(&frame) {
                Ok(request) => {
                    debug!(
                        connection = self.connection_number,
                        kind = %request.message_type(),
                        "Received request"
                    );
                    self.registry.answer(request).await
                }
                Err(e) => {
                    warn!(connection = self.connection_number, error = %e, "Malformed request");
                    Response::failure(e.to_string())
                }
            };

            self.send_frame(&encode_reply(&response)).await?;
        }
    }

    /// Reads one whole frame: header first, then the declared payload.
    async fn read_frame(&mut self) -> Result<Vec<u8>, ConnectionError> {
        let mut frame = vec![0u8; HEADER_LEN];
        self.reader.read_exact(&mut frame).await.map_err(eof_or_io)?;

        let header = FrameHeader::parse(&frame)?.ok_or(ConnectionError::Eof)?;
        let size = HEADER_LEN + header.payload_len;
        if size > self.max_message_size {
            return Err(ConnectionError::MessageTooLarge {
                size,
                max: self.max_message_size,
            });
        }

        frame.resize(size, 0);
        if let Some(payload) = frame.get_mut(HEADER_LEN..) {
            self.reader.read_exact(payload).await.map_err(eof_or_io)?;
        }
        Ok(frame)
    }

    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), ConnectionError> {
        let writer = &mut self.writer;
        match timeout(WRITE_TIMEOUT, async {
            writer.write_all(frame).await?;
            writer.flush().await?;
            Ok::<(), io::Error>(())
        })
        .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ConnectionError::Io(e.to_string())),
            Err(_) => Err(ConnectionError::WriteTimeout),
        }
    }
}

fn eof_or_io(e: io::Error) -> ConnectionError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        ConnectionError::Eof
    } else {
        ConnectionError::Io(e.to_string())
    }
}

/// Errors that can occur during connection handling.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Bad frame header: {0}")]
    Marshal(#[from] MarshalError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection closed")]
    Eof,

    #[error("Read timeout")]
    Timeout,

    #[error("Write timeout")]
    WriteTimeout,

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_size_error() {
        let err = ConnectionError::MessageTooLarge {
            size: 2_000_000,
            max: MAX_MESSAGE_SIZE,
        };
        assert!(err.to_string().contains("2000000"));
    }

    #[test]
    fn test_eof_mapping() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "early eof");
        assert!(matches!(eof_or_io(eof), ConnectionError::Eof));
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(eof_or_io(reset), ConnectionError::Io(_)));
    }
}
