use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::config::Config;
use crate::Result;

const CHUNK_SIZE: usize = 1024;

/// Client state struct.
pub struct Client {
    pub config: Config,
}

impl Client {
    pub fn new(server: Option<String>) -> Client {
        let mut config = Config::load();
        if let Some(server) = server {
            config.server = server;
        }
        Client { config }
    }

    async fn connect(&self) -> Result<Connection> {
        Connection::open(&self.config.server).await
    }

    /// Upload a local file.
    pub async fn write(&self, local: &str, remote: Option<String>) -> Result<String> {
        let remote = remote.unwrap_or_else(|| local.to_string());
        let content = tokio::fs::read(local).await?;
        let mut conn = self.connect().await?;
        conn.write(&remote, &content).await?;
        Ok(format!("wrote {} ({} bytes)", remote, content.len()))
    }

    /// Download a remote file.
    pub async fn get(&self, remote: &str, local: Option<String>) -> Result<String> {
        let local = local.unwrap_or_else(|| remote.to_string());
        let mut conn = self.connect().await?;
        let content = conn.get(remote).await?;
        tokio::fs::write(&local, &content).await?;
        Ok(format!("saved {} ({} bytes)", local, content.len()))
    }

    pub async fn rm(&self, remote: &str) -> Result<String> {
        let mut conn = self.connect().await?;
        conn.rm(remote).await?;
        Ok(format!("removed {}", remote))
    }

    pub async fn ls(&self, remote: &str) -> Result<String> {
        let mut conn = self.connect().await?;
        let version = conn.ls(remote).await?;
        Ok(format!("{} version {}", remote, version))
    }
}

/// One live protocol connection. Commands can be issued back to back.
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    pub async fn open(addr: &str) -> Result<Connection> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Connection {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Upload `content` under `remote`.
    pub async fn write(&mut self, remote: &str, content: &[u8]) -> Result<()> {
        self.send_line(&format!("WRITE {} {}", remote, content.len()))
            .await?;
        self.send_all(content).await?;
        self.expect_ok().await
    }

    /// Download `remote`.
    pub async fn get(&mut self, remote: &str) -> Result<Vec<u8>> {
        self.send_line(&format!("GET {}", remote)).await?;
        let len = self.expect_number().await?;
        self.read_body(len).await
    }

    pub async fn rm(&mut self, remote: &str) -> Result<()> {
        self.send_line(&format!("RM {}", remote)).await?;
        self.expect_ok().await
    }

    /// Stored version of `remote`.
    pub async fn ls(&mut self, remote: &str) -> Result<u64> {
        self.send_line(&format!("LS {}", remote)).await?;
        self.expect_number().await
    }

    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    pub async fn send_all(&mut self, content: &[u8]) -> Result<()> {
        for piece in content.chunks(CHUNK_SIZE) {
            self.writer.write_all(piece).await?;
        }
        Ok(())
    }

    /// Read one status line, without the terminator.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err("connection closed by server".into());
        }
        Ok(line.trim_end_matches('\n').to_string())
    }

    /// Read a status line that must be exactly `OK`.
    pub async fn expect_ok(&mut self) -> Result<()> {
        let line = self.read_line().await?;
        if line == "OK" {
            Ok(())
        } else {
            Err(line.into())
        }
    }

    /// Read `OK <number>`, returning the number.
    pub async fn expect_number(&mut self) -> Result<u64> {
        let line = self.read_line().await?;
        match line.strip_prefix("OK ") {
            Some(number) => Ok(number.parse()?),
            None => Err(line.into()),
        }
    }

    /// Read exactly `len` body bytes.
    pub async fn read_body(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut content = BytesMut::with_capacity(len as usize);
        let mut buf = [0u8; CHUNK_SIZE];
        let mut remaining = len as usize;
        while remaining > 0 {
            let want = remaining.min(CHUNK_SIZE);
            let read = self.reader.read(&mut buf[..want]).await?;
            if read == 0 {
                return Err("server closed mid-transfer".into());
            }
            content.extend_from_slice(&buf[..read]);
            remaining -= read;
        }
        Ok(content.to_vec())
    }
}
