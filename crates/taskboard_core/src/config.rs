//! Data and log location resolution.
//!
//! # Responsibility
//! - Resolve the per-user board file and log directory.
//!
//! # Invariants
//! - Resolution order: explicit path, then non-blank env override, then the
//!   platform data directory (temp dir when the platform reports none).

use std::path::{Path, PathBuf};

/// Env override for the board file path.
pub const DATA_FILE_ENV: &str = "TASKBOARD_DATA_FILE";
/// Env override for the log directory.
pub const LOG_DIR_ENV: &str = "TASKBOARD_LOG_DIR";

const APP_DIR_NAME: &str = "taskboard";
const DATA_FILE_NAME: &str = "board.json";
const LOG_DIR_NAME: &str = "logs";

/// Resolves the board file location.
pub fn resolve_data_file(explicit: Option<&Path>) -> PathBuf {
    resolve_with(
        explicit,
        std::env::var(DATA_FILE_ENV).ok(),
        app_dir().join(DATA_FILE_NAME),
    )
}

/// Resolves the log directory location.
pub fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_with(
        explicit,
        std::env::var(LOG_DIR_ENV).ok(),
        app_dir().join(LOG_DIR_NAME),
    )
}

fn app_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn resolve_with(explicit: Option<&Path>, env_value: Option<String>, fallback: PathBuf) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    fallback
}
