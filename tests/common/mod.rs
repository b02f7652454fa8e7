use std::net::SocketAddr;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use scli::client::Connection;
use stash::config::Config;
use stash::server::Server;

pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    /// Keeps the served root alive for the test's duration.
    pub root: TempDir,
}

/// Server over a fresh tempdir root on an ephemeral port.
pub async fn spawn_server() -> TestServer {
    spawn_server_with_reset(false).await
}

pub async fn spawn_server_with_reset(reset_version_on_delete: bool) -> TestServer {
    let root = TempDir::new().unwrap();
    let mut config = Config::new();
    config.root = root.path().to_path_buf();
    config.io_timeout = Duration::from_secs(2);
    config.reset_version_on_delete = reset_version_on_delete;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(config);
    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        let _ = server.serve_on(listener).await;
    });
    TestServer {
        addr,
        shutdown,
        root,
    }
}

pub async fn connect(server: &TestServer) -> Connection {
    Connection::open(&server.addr.to_string()).await.unwrap()
}

/// Generate a random String with length n.
pub fn random_string(n: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(n)
        .map(char::from)
        .collect()
}

/// Random binary content with length n.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut content = vec![0u8; n];
    rand::thread_rng().fill(&mut content[..]);
    content
}
