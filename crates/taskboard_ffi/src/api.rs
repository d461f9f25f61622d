//! FFI use-case API for the board view layer.
//!
//! # Responsibility
//! - Expose the board store's getState + mutation API to Dart via FRB.
//! - Flatten core errors into stable response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation response carries the full board JSON for re-render.
//! - One process-wide store; calls are serialized by the view event loop and
//!   the mutex only guards against accidental cross-thread use.
//!
//! # See also
//! - docs/architecture/logging.md

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use taskboard_core::config::resolve_data_file;
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Board, BoardStore, ColumnArrangement, JsonFileStorage, OpenReport, StoreError,
};

type FileBoardStore = BoardStore<JsonFileStorage>;

static BOARD_STORE: OnceLock<Mutex<Option<FileBoardStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Response envelope for board open/read/mutation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the request was accepted (false only for rejected input or
    /// unusable state).
    pub ok: bool,
    /// Whether board state changed.
    pub changed: bool,
    /// Created entity id, when the call creates one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Non-fatal warning, e.g. a write that may not survive a restart.
    pub warning: Option<String>,
    /// Full canonical board as JSON, for re-render.
    pub board_json: String,
}

impl BoardActionResponse {
    fn success(board: &Board, changed: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            id: None,
            message: message.into(),
            warning: None,
            board_json: board_to_json(board),
        }
    }

    fn failure(board: Option<&Board>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            id: None,
            message: message.into(),
            warning: None,
            board_json: board.map(board_to_json).unwrap_or_default(),
        }
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }
}

/// Opens (or re-opens) the board at `path`, or at the resolved default
/// location when `path` is `None`.
///
/// # FFI contract
/// - Never fails the view: load problems degrade to the default board and
///   are reported in `warning`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_open(path: Option<String>) -> BoardActionResponse {
    let explicit = path
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let data_file = resolve_data_file(explicit.as_deref());

    let (store, report) = BoardStore::open(JsonFileStorage::new(&data_file));
    let mut response = BoardActionResponse::success(
        store.state(),
        report.persisted,
        format!("Board opened ({}).", report.shape.as_str()),
    );
    response.warning = open_warning(&report);

    *lock_store() = Some(store);
    response
}

/// Returns the current board (getState).
#[flutter_rust_bridge::frb(sync)]
pub fn board_state() -> BoardActionResponse {
    with_store(|store| Ok(BoardActionResponse::success(store.state(), false, "Board loaded.")))
}

#[flutter_rust_bridge::frb(sync)]
pub fn column_add(title: String) -> BoardActionResponse {
    with_store(|store| {
        let column = store.add_column(&title)?;
        Ok(BoardActionResponse::success(store.state(), true, "Column added.").with_id(column.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn column_rename(column_id: String, title: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.rename_column(&column_id, &title)?;
        Ok(changed_response(store.state(), changed, "Column renamed."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn column_delete(column_id: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.delete_column(&column_id)?;
        Ok(changed_response(store.state(), changed, "Column deleted."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn column_reorder(column_id: String, target_column_id: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.reorder_columns(&column_id, &target_column_id)?;
        Ok(changed_response(store.state(), changed, "Columns reordered."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String, description: String, column_id: String) -> BoardActionResponse {
    with_store(|store| match store.add_task(&text, &description, &column_id)? {
        Some(task) => {
            Ok(BoardActionResponse::success(store.state(), true, "Task added.").with_id(task.id))
        }
        None => Ok(BoardActionResponse::success(
            store.state(),
            false,
            "Column not found; nothing changed.",
        )),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_update(task_id: String, text: String, description: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.update_task(&task_id, &text, &description)?;
        Ok(changed_response(store.state(), changed, "Task updated."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.delete_task(&task_id)?;
        Ok(changed_response(store.state(), changed, "Task deleted."))
    })
}

/// Coarse drop on a column body; the task keeps its `order` value.
#[flutter_rust_bridge::frb(sync)]
pub fn task_move(task_id: String, target_column_id: String) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.move_task(&task_id, &target_column_id)?;
        Ok(changed_response(store.state(), changed, "Task moved."))
    })
}

/// Drops a task at `index` among the target column's other cards.
#[flutter_rust_bridge::frb(sync)]
pub fn task_drop(task_id: String, target_column_id: String, index: u32) -> BoardActionResponse {
    with_store(|store| {
        let changed = store.drop_task(&task_id, &target_column_id, index as usize)?;
        Ok(changed_response(store.state(), changed, "Task dropped."))
    })
}

/// Commits a full arrangement: JSON array of `{columnId, taskIds}`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_reorder(arrangement_json: String) -> BoardActionResponse {
    let arrangement = match serde_json::from_str::<Vec<ColumnArrangement>>(&arrangement_json) {
        Ok(arrangement) => arrangement,
        Err(err) => {
            return BoardActionResponse::failure(None, format!("tasks_reorder failed: {err}"))
        }
    };
    with_store(|store| {
        let changed = store.reorder_tasks(&arrangement)?;
        Ok(changed_response(store.state(), changed, "Tasks reordered."))
    })
}

fn changed_response(board: &Board, changed: bool, message: &str) -> BoardActionResponse {
    if changed {
        BoardActionResponse::success(board, true, message)
    } else {
        BoardActionResponse::success(board, false, "Nothing changed.")
    }
}

fn with_store(
    f: impl FnOnce(&mut FileBoardStore) -> Result<BoardActionResponse, StoreError>,
) -> BoardActionResponse {
    let mut guard = lock_store();
    if guard.is_none() {
        let data_file = resolve_data_file(None);
        let (store, report) = BoardStore::open(JsonFileStorage::new(data_file));
        if let Some(warning) = open_warning(&report) {
            warn!("event=ffi_open module=ffi status=fallback warning={warning}");
        }
        *guard = Some(store);
    }
    let Some(store) = guard.as_mut() else {
        return BoardActionResponse::failure(None, "board store unavailable");
    };

    match f(store) {
        Ok(response) => response,
        Err(err @ StoreError::Persistence(_)) => {
            let mut response = BoardActionResponse::success(store.state(), true, "Saved in memory.");
            response.warning = Some(err.to_string());
            response
        }
        Err(err) => BoardActionResponse::failure(Some(store.state()), err.to_string()),
    }
}

fn lock_store() -> MutexGuard<'static, Option<FileBoardStore>> {
    BOARD_STORE
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_warning(report: &OpenReport) -> Option<String> {
    match (&report.load_error, &report.persist_error) {
        (Some(load), Some(save)) => Some(format!("{load}; {save}")),
        (Some(load), None) => Some(format!("loaded default board: {load}")),
        (None, Some(save)) => Some(format!("board not saved: {save}")),
        (None, None) => None,
    }
}

fn board_to_json(board: &Board) -> String {
    serde_json::to_string(board).unwrap_or_default()
}
