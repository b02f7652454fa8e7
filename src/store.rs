//! Filesystem access scoped to the served root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use bytes::{Bytes, BytesMut};
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

use crate::{Error, Result};

pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: PathBuf) -> Store {
        Store { root }
    }

    /// Map a client path under the root. Absolute paths and any non-plain
    /// component (`..`, `.`, prefixes) are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return Err(Error::StorePathInvalid);
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(Error::StorePathInvalid),
            }
        }
        Ok(self.root.join(relative))
    }

    /// Create or truncate the target of a write, making parent directories
    /// as needed.
    pub async fn open_for_write(&self, path: &str) -> Result<File> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(store_error)?;
        }
        File::create(target).await.map_err(store_error)
    }

    /// Read the whole file in `chunk` sized reads.
    pub async fn read_all(&self, path: &str, chunk: usize) -> Result<Bytes> {
        let target = self.resolve(path)?;
        let mut file = File::open(target).await.map_err(store_error)?;
        let mut content = BytesMut::new();
        let mut buf = BytesMut::zeroed(chunk);
        loop {
            let read = file.read(&mut buf[..]).await.map_err(store_error)?;
            if read == 0 {
                break;
            }
            content.extend_from_slice(&buf[..read]);
        }
        Ok(content.freeze())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        fs::remove_file(target).await.map_err(store_error)
    }
}

/// Map filesystem failures onto the store error kinds.
fn store_error(error: std::io::Error) -> Error {
    match error.kind() {
        ErrorKind::NotFound => Error::StoreNotFound,
        ErrorKind::PermissionDenied => Error::StorePermissionDenied,
        _ => Error::StoreIo,
    }
}
