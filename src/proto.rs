//! Wire representation of commands and replies.
//!
//! One `\n`-terminated header line per command. WRITE carries a
//! length-prefixed body after its header; GET answers with `OK <len>`
//! followed by exactly that many raw bytes, so file content containing
//! marker-like sequences needs no escaping.

pub mod reply;
pub mod request;

pub use reply::Reply;
pub use request::Request;

use std::io::ErrorKind;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::{Error, Result};

/// Read one header line, without the terminator. `None` means the peer
/// closed cleanly before sending anything. Lines over `limit` bytes and
/// mid-line disconnects are header errors.
pub async fn read_line<R>(reader: &mut R, limit: usize) -> Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut line = Vec::new();
    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(error) if error.kind() == ErrorKind::UnexpectedEof => {
                if line.is_empty() {
                    return Ok(None);
                }
                return Err(Error::ProtoHeader);
            }
            Err(error) => return Err(Error::Net(error)),
        };
        if byte == b'\n' {
            break;
        }
        if line.len() == limit {
            return Err(Error::ProtoHeader);
        }
        line.push(byte);
    }
    match String::from_utf8(line) {
        Ok(line) => Ok(Some(line)),
        Err(_) => Err(Error::ProtoHeader),
    }
}

/// Copy exactly `len` body bytes from the connection into `sink`, `chunk`
/// bytes at a time. A socket stall longer than `deadline` is a timeout;
/// sink failures are store failures.
pub async fn receive_body<R, W>(
    reader: &mut R,
    sink: &mut W,
    len: u64,
    chunk: usize,
    deadline: Duration,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = BytesMut::zeroed(chunk);
    let mut remaining = len;
    while remaining > 0 {
        let want = remaining.min(chunk as u64) as usize;
        let read = match timeout(deadline, reader.read(&mut buf[..want])).await {
            Ok(Ok(0)) => return Err(Error::Net(ErrorKind::UnexpectedEof.into())),
            Ok(Ok(read)) => read,
            Ok(Err(error)) => return Err(Error::Net(error)),
            Err(_) => return Err(Error::Timeout),
        };
        sink.write_all(&buf[..read]).await.map_err(|_| Error::StoreIo)?;
        remaining -= read as u64;
    }
    Ok(())
}

/// Send a body buffer in `chunk` sized writes under the deadline.
pub async fn send_body<W>(
    writer: &mut W,
    content: &[u8],
    chunk: usize,
    deadline: Duration,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    for piece in content.chunks(chunk) {
        match timeout(deadline, writer.write_all(piece)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(Error::Net(error)),
            Err(_) => return Err(Error::Timeout),
        }
    }
    Ok(())
}
