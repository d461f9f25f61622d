//! Persistence providers for the board artifact.
//!
//! # Responsibility
//! - Define the load/save contract the board store depends on.
//! - Keep file-system and serialization details out of store logic.
//!
//! # Invariants
//! - `load` returns `Ok(None)` only when no artifact exists.
//! - `save` writes the complete board; partial or incremental writes are
//!   never performed.
//!
//! # See also
//! - docs/architecture/persistence.md

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::model::board::Board;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure surfaced by a storage provider.
#[derive(Debug)]
pub enum StorageError {
    /// Read or write failed at the I/O layer.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact exists but is not valid JSON.
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The board could not be encoded.
    Serialize(serde_json::Error),
    /// Provider rejected the write without touching any artifact.
    Unavailable(String),
}

impl StorageError {
    /// Returns whether this failure came from unreadable artifact content
    /// rather than from the I/O layer.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "board file `{}`: {source}", path.display()),
            Self::Corrupt { path, source } => write!(
                f,
                "board file `{}` is not valid JSON: {source}",
                path.display()
            ),
            Self::Serialize(err) => write!(f, "failed to encode board: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

/// Load/save contract consumed by the board store.
pub trait BoardStorage {
    /// Loads the raw persisted value, or `None` when nothing was saved yet.
    fn load(&self) -> StorageResult<Option<Value>>;
    /// Overwrites the persisted artifact with the full board.
    fn save(&self, board: &Board) -> StorageResult<()>;
}

impl<S: BoardStorage + ?Sized> BoardStorage for &S {
    fn load(&self) -> StorageResult<Option<Value>> {
        (**self).load()
    }

    fn save(&self, board: &Board) -> StorageResult<()> {
        (**self).save(board)
    }
}
