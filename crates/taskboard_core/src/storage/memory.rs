//! In-process storage provider.
//!
//! Keeps the last saved board as a JSON value so loads go through the same
//! decode path as the file provider. Failure switches let callers exercise
//! degraded persistence without touching the file system.

use super::{BoardStorage, StorageError, StorageResult};
use crate::model::board::Board;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

const MEMORY_PATH: &str = "<memory>";

#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<Value>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that already holds `value` as its artifact.
    pub fn with_value(value: Value) -> Self {
        let storage = Self::default();
        *storage.lock_value() = Some(value);
        storage
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Last saved (or seeded) raw value.
    pub fn snapshot(&self) -> Option<Value> {
        self.lock_value().clone()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    fn lock_value(&self) -> std::sync::MutexGuard<'_, Option<Value>> {
        // A poisoned lock still holds a complete value; writes replace it whole.
        self.value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BoardStorage for MemoryStorage {
    fn load(&self) -> StorageResult<Option<Value>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from(MEMORY_PATH),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "load disabled"),
            });
        }
        Ok(self.snapshot())
    }

    fn save(&self, board: &Board) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("save disabled".to_string()));
        }
        let value = serde_json::to_value(board).map_err(StorageError::Serialize)?;
        *self.lock_value() = Some(value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
