//! End-to-end tests over real sockets.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use lantern::config::Config;
use lantern::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

async fn start(root: &std::path::Path) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<anyhow::Result<()>>) {
    start_with_limit(root, 4).await
}

async fn start_with_limit(
    root: &std::path::Path,
    max_connections: u32,
) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<anyhow::Result<()>>) {
    let limit = max_connections.to_string();
    let cfg = Config::try_parse_from([
        "lantern",
        "--host",
        "127.0.0.1",
        "--root",
        root.to_str().unwrap(),
        "--max-connections",
        limit.as_str(),
        "0",
    ])
    .unwrap();

    let server = Server::bind(&cfg).await.unwrap();
    let addr = server.local_addr();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    (addr, tx, handle)
}

async fn request(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn test_server_serves_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<p>hi</p>").unwrap();
    let (addr, shutdown, handle) = start(dir.path()).await;

    let out = request(addr, b"GET /index.html HTTP/1.1\r\n\r\n").await;
    assert_eq!(out, b"HTTP/1.1 200 OK\nContent-type: text/html\n\n<p>hi</p>");

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_error_responses() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown, handle) = start(dir.path()).await;

    let out = request(addr, b"GET /index.html HTTP/3\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.1 400 Bad Request\n"));

    let out = request(addr, b"DELETE /index.html HTTP/1.1\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.1 501 Method Not Implemented\n"));

    let out = request(addr, b"GET /missing.gif HTTP/1.1\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.1 404 Not Found\n"));

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_survives_failed_connections() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.gif"), b"GIF89a").unwrap();
    let (addr, shutdown, handle) = start(dir.path()).await;

    // More failing connections than worker slots; each must release its slot.
    for _ in 0..8 {
        let out = request(addr, b"GET /nope.html HTTP/1.1\r\n\r\n").await;
        assert!(out.starts_with(b"HTTP/1.1 404 "));
    }

    // A client that connects and leaves without a request.
    drop(TcpStream::connect(addr).await.unwrap());

    let out = request(addr, b"GET /a.gif HTTP/1.0\r\n\r\n").await;
    assert_eq!(out, b"HTTP/1.1 200 OK\nContent-type: image/gif\n\nGIF89a");

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_concurrent_clients() {
    let dir = tempfile::tempdir().unwrap();
    let body: Vec<u8> = (0..50_000u32).map(|i| (i % 256) as u8).collect();
    std::fs::write(dir.path().join("big.jpg"), &body).unwrap();
    let (addr, shutdown, handle) = start(dir.path()).await;

    let clients: Vec<_> = (0..10)
        .map(|_| tokio::spawn(request(addr, b"GET /big.jpg HTTP/1.1\r\n\r\n")))
        .collect();

    let head = b"HTTP/1.1 200 OK\nContent-type: image/jpeg\n\n";
    for client in clients {
        let out = client.await.unwrap();
        assert_eq!(&out[..head.len()], head);
        assert_eq!(&out[head.len()..], &body[..]);
    }

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_long_request_closes_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<p>hi</p>").unwrap();
    let (addr, shutdown, handle) = start(dir.path()).await;

    let mut raw = b"GET /index.html HTTP/1.1\r\nX-Pad: ".to_vec();
    raw.extend(std::iter::repeat_n(b'a', 4000));
    raw.extend_from_slice(b"\r\n\r\n");

    for _ in 0..20 {
        let out = request(addr, &raw).await;
        assert_eq!(out, b"HTTP/1.1 200 OK\nContent-type: text/html\n\n<p>hi</p>");
    }

    let mut raw = b"GET /missing.gif HTTP/1.1\r\nX-Pad: ".to_vec();
    raw.extend(std::iter::repeat_n(b'a', 4000));
    raw.extend_from_slice(b"\r\n\r\n");
    let out = request(addr, &raw).await;
    assert!(out.starts_with(b"HTTP/1.1 404 Not Found\n"));
    assert!(out.ends_with(b"</html>\n"));

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_shutdown_while_saturated() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown, handle) = start_with_limit(dir.path(), 1).await;

    // Holds the only slot: connected, never sends a request.
    let _stalled = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Left waiting in the backlog.
    let _queued = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    shutdown.send(()).unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(2), handle).await;
    assert!(finished.is_ok(), "server did not stop while saturated");
    finished.unwrap().unwrap().unwrap();
}
