use crate::{Error, Result};

/// A parsed command header.
#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    Write { path: String, len: u64 },
    Get { path: String },
    Rm { path: String },
    Ls { path: String },
}

impl Request {
    pub fn path(&self) -> &str {
        match self {
            Request::Write { path, .. } => path,
            Request::Get { path } => path,
            Request::Rm { path } => path,
            Request::Ls { path } => path,
        }
    }

    /// Parse one header line. Verbs are case-sensitive; the path is a
    /// single non-empty token of at most `max_path` bytes; WRITE takes a
    /// decimal body length as its third token. Anything else is a
    /// connection-fatal protocol error.
    pub fn parse(line: &str, max_path: usize) -> Result<Request> {
        let mut parts = line.split(' ');
        let verb = parts.next().unwrap_or("");
        let path = match parts.next() {
            Some(path) if !path.is_empty() && path.len() <= max_path => path.to_string(),
            _ => return Err(Error::ProtoPath),
        };
        let request = match verb {
            "WRITE" => {
                let len = match parts.next() {
                    Some(len) => len.parse::<u64>().map_err(|_| Error::ProtoLength)?,
                    None => return Err(Error::ProtoLength),
                };
                Request::Write { path, len }
            }
            "GET" => Request::Get { path },
            "RM" => Request::Rm { path },
            "LS" => Request::Ls { path },
            _ => return Err(Error::ProtoVerb),
        };
        if parts.next().is_some() {
            return Err(Error::ProtoHeader);
        }
        Ok(request)
    }
}
