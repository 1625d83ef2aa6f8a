//! Integration tests for the Unix socket server.
//!
//! Tests CAN use `.unwrap()` and `.expect()`; the panic-free behavior of
//! production code is checked through assertions.

use std::path::PathBuf;
use std::time::Duration;

use lldp_core::{Hardware, MedAppType, MedPolicy, Port, PortSettings};
use lldp_protocol::{
    decode_response, encode_request, frame_len, FrameHeader, MessageType, Request, Response,
    HEADER_LEN,
};
use lldpd::{spawn_registry, DaemonServer, Inventory};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Constants
// ============================================================================

/// Maximum time to wait for server socket to appear
const SOCKET_WAIT_TIMEOUT: Duration = Duration::from_millis(500);

/// Interval between socket existence checks
const SOCKET_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Test Helpers
// ============================================================================

struct TestServer {
    socket_path: PathBuf,
    cancel_token: CancellationToken,
    _temp_dir: TempDir,
}

impl TestServer {
    async fn spawn(inventory: Inventory) -> Self {
        Self::spawn_with(inventory, |server| server).await
    }

    async fn spawn_with(
        inventory: Inventory,
        configure: impl FnOnce(DaemonServer) -> DaemonServer,
    ) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let socket_path = temp_dir.path().join("lldpd.socket");
        let cancel_token = CancellationToken::new();

        let server = configure(DaemonServer::new(
            socket_path.clone(),
            spawn_registry(inventory),
            cancel_token.clone(),
        ));

        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let start = tokio::time::Instant::now();
        while start.elapsed() < SOCKET_WAIT_TIMEOUT {
            if socket_path.exists() {
                break;
            }
            sleep(SOCKET_POLL_INTERVAL).await;
        }
        assert!(
            socket_path.exists(),
            "Server socket did not appear within {SOCKET_WAIT_TIMEOUT:?}"
        );

        Self {
            socket_path,
            cancel_token,
            _temp_dir: temp_dir,
        }
    }

    async fn connect(&self) -> UnixStream {
        UnixStream::connect(&self.socket_path)
            .await
            .expect("connect to server")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

fn sample_inventory() -> Inventory {
    let mut eth0 = Hardware::new("eth0", 2);
    let mut neighbor = Port::with_ifname("swp7");
    neighbor.chassis.name = Some("spine-1".to_string());
    eth0.neighbors.push(neighbor);
    Inventory::new(vec![eth0, Hardware::new("eth1", 3)])
}

async fn read_reply(stream: &mut UnixStream) -> Response {
    let mut frame = vec![0u8; HEADER_LEN];
    stream.read_exact(&mut frame).await.expect("read header");
    let total = frame_len(&frame).unwrap().unwrap();
    frame.resize(total, 0);
    stream
        .read_exact(&mut frame[HEADER_LEN..])
        .await
        .expect("read payload");
    decode_response(&frame).expect("decode reply")
}

async fn roundtrip(stream: &mut UnixStream, request: &Request) -> Response {
    let frame = encode_request(request).unwrap();
    stream.write_all(&frame).await.unwrap();
    read_reply(stream).await
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_list_interfaces_over_socket() {
    let server = TestServer::spawn(sample_inventory()).await;
    let mut stream = server.connect().await;

    match roundtrip(&mut stream, &Request::ListInterfaces).await {
        Response::Interfaces(list) => {
            let names: Vec<_> = list.into_iter().map(|i| i.name).collect();
            assert_eq!(names, vec!["eth0", "eth1"]);
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn test_several_requests_on_one_connection() {
    let server = TestServer::spawn(sample_inventory()).await;
    let mut stream = server.connect().await;

    let mut settings = PortSettings::new("eth1");
    settings.med_policy = Some(MedPolicy::new(MedAppType::Voice));
    assert_eq!(
        roundtrip(&mut stream, &Request::SetPort(settings)).await,
        Response::PortSet
    );

    match roundtrip(&mut stream, &Request::get_port("eth1")).await {
        Response::Port(hw) => assert_eq!(hw.local.med.policies.len(), 1),
        other => panic!("unexpected reply: {other:?}"),
    }

    match roundtrip(&mut stream, &Request::get_port("eth0")).await {
        Response::Port(hw) => {
            assert_eq!(hw.neighbors.len(), 1);
            assert_eq!(hw.neighbors[0].chassis.name.as_deref(), Some("spine-1"));
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_interface_gets_failure() {
    let server = TestServer::spawn(sample_inventory()).await;
    let mut stream = server.connect().await;

    let reply = roundtrip(&mut stream, &Request::get_port("wlan0")).await;
    assert_eq!(reply.message_type(), MessageType::None);
    assert_eq!(reply, Response::failure("interface not found: wlan0"));
}

#[tokio::test]
async fn test_bad_payload_keeps_connection() {
    let server = TestServer::spawn(sample_inventory()).await;
    let mut stream = server.connect().await;

    // Get-port header announcing a 3-byte payload that is not JSON.
    let mut bogus = FrameHeader::new(MessageType::GetInterface, 3)
        .encode()
        .unwrap()
        .to_vec();
    bogus.extend_from_slice(b"xyz");
    stream.write_all(&bogus).await.unwrap();
    assert!(matches!(read_reply(&mut stream).await, Response::Failure { .. }));

    // Framing stayed in sync, so the next request is answered normally.
    assert!(matches!(
        roundtrip(&mut stream, &Request::ListInterfaces).await,
        Response::Interfaces(_)
    ));
}

#[tokio::test]
async fn test_unknown_type_closes_connection() {
    let server = TestServer::spawn(sample_inventory()).await;
    let mut stream = server.connect().await;

    stream.write_all(&[0x7f, 1, 0, 0, 0, 0, 0, 0]).await.unwrap();
    assert!(matches!(read_reply(&mut stream).await, Response::Failure { .. }));

    let mut rest = Vec::new();
    let n = stream.read_to_end(&mut rest).await.unwrap();
    assert_eq!(n, 0, "server should close after an unusable header");
}

#[tokio::test]
async fn test_oversized_frame_is_dropped() {
    let server = TestServer::spawn_with(sample_inventory(), |server| {
        server.with_limits(Duration::from_secs(5), 64)
    })
    .await;
    let mut stream = server.connect().await;

    let settings = PortSettings::new("x".repeat(200));
    let frame = encode_request(&Request::SetPort(settings)).unwrap();
    let _ = stream.write_all(&frame).await;

    let mut rest = Vec::new();
    let n = stream.read_to_end(&mut rest).await.unwrap_or(0);
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_idle_connection_times_out() {
    let server = TestServer::spawn_with(sample_inventory(), |server| {
        server.with_limits(Duration::from_millis(50), 4096)
    })
    .await;
    let mut stream = server.connect().await;

    let mut rest = Vec::new();
    let n = tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut rest))
        .await
        .expect("server should hang up on idle client")
        .unwrap_or(0);
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_shutdown_removes_socket() {
    let server = TestServer::spawn(Inventory::default()).await;
    let path = server.socket_path.clone();
    server.cancel_token.cancel();

    let start = tokio::time::Instant::now();
    while path.exists() && start.elapsed() < SOCKET_WAIT_TIMEOUT {
        sleep(SOCKET_POLL_INTERVAL).await;
    }
    assert!(!path.exists());
}
