//! TCP listener and per-connection command loop.
//!
//! One worker task per accepted connection. A worker reads one header at a
//! time, takes the shared-state lock for the file operation, then answers.
//! Store failures and timeouts are reported and the connection lives on;
//! protocol and network failures close it. The listener itself never exits
//! on a per-connection error.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::proto::{self, Reply, Request};
use crate::registry::Registry;
use crate::state::SharedState;
use crate::store::Store;
use crate::{Error, Result};

pub struct Server {
    config: Config,
    state: Arc<SharedState>,
    store: Arc<Store>,
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(config: Config) -> Server {
        let registry = Registry::new(config.reset_version_on_delete);
        let store = Store::new(config.root.clone());
        Server {
            state: Arc::new(SharedState::new(registry)),
            store: Arc::new(store),
            shutdown: CancellationToken::new(),
            config,
        }
    }

    /// Token observed by the accept loop and every worker. Cancelling it
    /// stops accepting and drains idle connections.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Bind the configured address and accept until shutdown.
    pub async fn serve(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.addr).await.map_err(Error::Net)?;
        self.serve_on(listener).await
    }

    /// Accept loop over an already-bound listener.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<()> {
        info!("listening on {}", listener.local_addr().map_err(Error::Net)?);
        loop {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested");
                    return Ok(());
                }
            };
            let (stream, peer) = match accepted {
                Ok(pair) => pair,
                Err(error) => {
                    warn!("accept failed: {}", error);
                    continue;
                }
            };
            info!("client connected from {}", peer);
            let worker = Worker {
                state: self.state.clone(),
                store: self.store.clone(),
                chunk_size: self.config.chunk_size,
                max_path: self.config.max_path,
                io_timeout: self.config.io_timeout,
                shutdown: self.shutdown.clone(),
            };
            tokio::task::spawn(async move {
                match worker.run(stream).await {
                    Ok(()) => info!("client {} disconnected", peer),
                    Err(error) => warn!("connection from {} closed: {}", peer, error),
                }
            });
        }
    }
}

/// Per-connection execution unit.
struct Worker {
    state: Arc<SharedState>,
    store: Arc<Store>,
    chunk_size: usize,
    max_path: usize,
    io_timeout: Duration,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(&self, stream: TcpStream) -> Result<()> {
        let (read_half, write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut writer = write_half;
        // Header lines get slack for the verb and length tokens.
        let line_limit = self.max_path + 32;
        loop {
            let line = tokio::select! {
                line = proto::read_line(&mut reader, line_limit) => line?,
                _ = self.shutdown.cancelled() => return Ok(()),
            };
            let line = match line {
                Some(line) => line,
                None => return Ok(()),
            };
            let request = Request::parse(&line, self.max_path)?;
            let result = match &request {
                Request::Write { path, len } => {
                    self.write(&mut reader, &mut writer, path, *len).await
                }
                Request::Get { path } => self.get(&mut writer, path).await,
                Request::Rm { path } => self.rm(&mut writer, path).await,
                Request::Ls { path } => self.ls(&mut writer, path).await,
            };
            match result {
                Ok(()) => {}
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    warn!("command on {} failed: {}", request.path(), error);
                    self.send_line(&mut writer, &Reply::for_error(&error)).await?;
                }
            }
        }
    }

    /// WRITE holds the lock for the whole body transfer and the version
    /// bump; the version itself is never sent back.
    async fn write<R>(
        &self,
        reader: &mut R,
        writer: &mut OwnedWriteHalf,
        path: &str,
        len: u64,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut registry = self.state.lock().await;
        let mut file = match self.store.open_for_write(path).await {
            Ok(file) => file,
            Err(error) => {
                drop(registry);
                // Drain the announced body so the next header parses.
                let mut sink = tokio::io::sink();
                proto::receive_body(reader, &mut sink, len, self.chunk_size, self.io_timeout)
                    .await?;
                return Err(error);
            }
        };
        proto::receive_body(reader, &mut file, len, self.chunk_size, self.io_timeout).await?;
        file.flush().await.map_err(|_| Error::StoreIo)?;
        let version = registry.record_write(path);
        drop(registry);
        info!("wrote {} ({} bytes), version {}", path, len, version);
        self.send_line(writer, &Reply::Ok).await
    }

    /// GET snapshots the file under the lock and sends after release, so
    /// the lock never covers a network send.
    async fn get(&self, writer: &mut OwnedWriteHalf, path: &str) -> Result<()> {
        let guard = self.state.lock().await;
        let content = self.store.read_all(path, self.chunk_size).await?;
        drop(guard);
        self.send_line(writer, &Reply::Len(content.len() as u64)).await?;
        proto::send_body(writer, &content, self.chunk_size, self.io_timeout).await
    }

    async fn rm(&self, writer: &mut OwnedWriteHalf, path: &str) -> Result<()> {
        let mut registry = self.state.lock().await;
        self.store.delete(path).await?;
        registry.forget(path);
        drop(registry);
        info!("removed {}", path);
        self.send_line(writer, &Reply::Ok).await
    }

    async fn ls(&self, writer: &mut OwnedWriteHalf, path: &str) -> Result<()> {
        let registry = self.state.lock().await;
        let version = registry.lookup(path);
        drop(registry);
        match version {
            Some(version) => self.send_line(writer, &Reply::Version(version)).await,
            None => self.send_line(writer, &Reply::Err("not found")).await,
        }
    }

    async fn send_line(&self, writer: &mut OwnedWriteHalf, reply: &Reply) -> Result<()> {
        let line = reply.to_line();
        match timeout(self.io_timeout, writer.write_all(line.as_bytes())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(Error::Net(error)),
            Err(_) => Err(Error::Timeout),
        }
    }
}
