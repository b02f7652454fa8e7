//! In-memory version table for served paths.
//!
//! Lives for the process lifetime and starts empty on every boot; versions
//! are not persisted. All mutation happens inside the shared-state critical
//! section.

use std::collections::HashMap;

/// Metadata kept per path. The version never decreases.
#[derive(Debug)]
struct FileRecord {
    version: u64,
    removed: bool,
}

pub struct Registry {
    records: HashMap<String, FileRecord>,
    reset_on_delete: bool,
}

impl Registry {
    pub fn new(reset_on_delete: bool) -> Registry {
        Registry {
            records: HashMap::new(),
            reset_on_delete,
        }
    }

    /// Bump the counter for a completed write. First write of a path is
    /// version 1. Returns the resulting version.
    pub fn record_write(&mut self, path: &str) -> u64 {
        match self.records.get_mut(path) {
            Some(record) => {
                record.version += 1;
                record.removed = false;
                record.version
            }
            None => {
                self.records.insert(
                    path.to_string(),
                    FileRecord {
                        version: 1,
                        removed: false,
                    },
                );
                1
            }
        }
    }

    /// Version of a live path, none if never written or removed.
    pub fn lookup(&self, path: &str) -> Option<u64> {
        self.records
            .get(path)
            .filter(|record| !record.removed)
            .map(|record| record.version)
    }

    /// Called after a successful remove. With `reset_on_delete` the record
    /// is dropped and a later write restarts at version 1; otherwise the
    /// counter survives and a later write resumes past it.
    pub fn forget(&mut self, path: &str) {
        if self.reset_on_delete {
            self.records.remove(path);
        } else if let Some(record) = self.records.get_mut(path) {
            record.removed = true;
        }
    }
}
