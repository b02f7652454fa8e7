//! The process-wide lock over everything the command handlers share.

use tokio::sync::{Mutex, MutexGuard};

use crate::registry::Registry;

/// Guard proving the holder is inside the critical section. Filesystem
/// work done while it is held is serialized along with the registry.
pub type SharedStateGuard<'a> = MutexGuard<'a, Registry>;

/// One lock serializes every registry and filesystem operation across all
/// connections; operations on the same path apply in lock-acquisition
/// order. Handlers only reach the registry through [`SharedState::lock`],
/// so a per-path sharding scheme could replace this without touching them.
pub struct SharedState {
    registry: Mutex<Registry>,
}

impl SharedState {
    pub fn new(registry: Registry) -> SharedState {
        SharedState {
            registry: Mutex::new(registry),
        }
    }

    pub async fn lock(&self) -> SharedStateGuard<'_> {
        self.registry.lock().await
    }
}
