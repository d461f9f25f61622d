//! Single-file JSON storage provider.
//!
//! # Responsibility
//! - Read the board artifact from one per-user JSON file.
//! - Write the full board pretty-printed, replacing the file atomically.
//!
//! # Invariants
//! - A missing file is reported as `Ok(None)`, never as an error.
//! - Writes go through a sibling temp file + rename; readers never observe a
//!   half-written artifact.

use super::{BoardStorage, StorageError, StorageResult};
use crate::model::board::Board;
use log::{error, info};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_EXTENSION: &str = "json.tmp";

/// JSON file backed board storage.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, content: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp_path = self.path.with_extension(TEMP_EXTENSION);
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl BoardStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Option<Value>> {
        let started_at = Instant::now();
        info!("event=board_load module=storage status=start mode=file");

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=board_load module=storage status=ok mode=file found=false duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(None);
            }
            Err(err) => {
                error!(
                    "event=board_load module=storage status=error mode=file duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                info!(
                    "event=board_load module=storage status=ok mode=file found=true bytes={} duration_ms={}",
                    raw.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(value))
            }
            Err(err) => {
                error!(
                    "event=board_load module=storage status=error mode=file duration_ms={} error_code=parse_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StorageError::Corrupt {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }

    fn save(&self, board: &Board) -> StorageResult<()> {
        let started_at = Instant::now();
        let content = serde_json::to_string_pretty(board).map_err(StorageError::Serialize)?;

        match self.write_atomically(&content) {
            Ok(()) => {
                info!(
                    "event=board_save module=storage status=ok mode=file columns={} tasks={} duration_ms={}",
                    board.columns.len(),
                    board.tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=board_save module=storage status=error mode=file duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStorage;
    use crate::model::board::Board;
    use crate::storage::BoardStorage;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("board.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_dirs_and_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("board.json");
        let storage = JsonFileStorage::new(&path);

        storage.save(&Board::seeded()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"columns\""));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn garbage_content_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStorage::new(&path).load().unwrap_err();
        assert!(err.is_corrupt(), "unexpected error: {err}");
    }

    #[test]
    fn unreadable_path_is_reported_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileStorage::new(dir.path()).load().unwrap_err();
        assert!(!err.is_corrupt(), "unexpected error: {err}");
    }
}
