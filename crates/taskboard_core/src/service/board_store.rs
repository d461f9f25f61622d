//! Board store use-case service.
//!
//! # Responsibility
//! - Own the single authoritative in-memory `Board`.
//! - Expose validated mutations, each followed by a full write-through.
//! - Turn startup load/migration into a usable board plus diagnostics.
//!
//! # Invariants
//! - Rejected input (`Validation`) never mutates state and never writes.
//! - Missing ids are no-ops (`Ok(false)`/`Ok(None)`), never errors.
//! - A failed write keeps the in-memory mutation; the next successful write
//!   resubmits the full board.
//! - `Board::validate()` holds after every call.

use crate::migrate::{migrate, ShapeKind};
use crate::model::board::{
    normalize_column_title, normalize_task_text, Board, BoardValidationError, Column, Task,
};
use crate::model::ordering::{arrangement_after_drop, ColumnArrangement};
use crate::storage::{BoardStorage, StorageError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure returned by a store mutation.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected; board untouched, nothing written.
    Validation(BoardValidationError),
    /// Board mutated in memory but the write-through failed.
    Persistence(StorageError),
}

impl StoreError {
    /// Returns whether in-memory state changed despite the error.
    pub fn state_changed(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "change may not survive a restart: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<BoardValidationError> for StoreError {
    fn from(value: BoardValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Startup diagnostics produced by `BoardStore::open`.
#[derive(Debug)]
pub struct OpenReport {
    /// Shape the artifact was classified as.
    pub shape: ShapeKind,
    /// Entities discarded while normalizing the artifact.
    pub dropped: usize,
    /// Entities kept after filling missing fields.
    pub repaired: usize,
    /// Whether the normalized board was written back.
    pub persisted: bool,
    /// Read/parse failure that forced the default board.
    pub load_error: Option<StorageError>,
    /// Write-back failure after migration.
    pub persist_error: Option<StorageError>,
}

impl OpenReport {
    /// True when loading needed no fallback and every write succeeded.
    pub fn is_clean(&self) -> bool {
        self.load_error.is_none() && self.persist_error.is_none()
    }
}

/// Authoritative board with write-through persistence.
pub struct BoardStore<S: BoardStorage> {
    storage: S,
    board: Board,
}

impl<S: BoardStorage> BoardStore<S> {
    /// Loads, migrates and (when needed) re-persists the board.
    ///
    /// Never fails: unreadable or corrupt artifacts degrade to the seed
    /// board and are reported through `OpenReport::load_error`. An artifact
    /// that could not be read at the I/O layer is not overwritten.
    pub fn open(storage: S) -> (Self, OpenReport) {
        let (report, load_error) = match storage.load() {
            Ok(loaded) => (migrate(loaded.as_ref()), None),
            Err(err) => {
                warn!(
                    "event=store_open module=store status=fallback corrupt={} error={}",
                    err.is_corrupt(),
                    err
                );
                let mut report = migrate(None);
                report.shape = ShapeKind::Unrecognized;
                report.needs_persist = err.is_corrupt();
                (report, Some(err))
            }
        };

        let store = Self {
            storage,
            board: report.board,
        };

        let mut persist_error = None;
        let mut persisted = false;
        if report.needs_persist {
            match store.storage.save(&store.board) {
                Ok(()) => persisted = true,
                Err(err) => {
                    warn!("event=store_open module=store status=error error_code=persist_failed error={err}");
                    persist_error = Some(err);
                }
            }
        }

        info!(
            "event=store_open module=store status=ok shape={} columns={} tasks={} persisted={}",
            report.shape.as_str(),
            store.board.columns.len(),
            store.board.tasks.len(),
            persisted
        );

        let open_report = OpenReport {
            shape: report.shape,
            dropped: report.dropped,
            repaired: report.repaired,
            persisted,
            load_error,
            persist_error,
        };
        (store, open_report)
    }

    /// Adopts an already-canonical board without loading or writing.
    pub fn from_board(storage: S, board: Board) -> StoreResult<Self> {
        board.validate()?;
        Ok(Self { storage, board })
    }

    /// Current canonical board for rendering.
    pub fn state(&self) -> &Board {
        &self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the current board again, e.g. after a failed write-through.
    pub fn flush(&self) -> StoreResult<()> {
        self.commit("flush")
    }

    /// Appends a new column with a generated id.
    pub fn add_column(&mut self, title: &str) -> StoreResult<Column> {
        let title = normalize_column_title(title)?;
        let column = Column::new(title);
        self.board.columns.push(column.clone());
        self.commit("column_add")?;
        Ok(column)
    }

    /// Renames one column. Unknown id or unchanged title is a no-op.
    pub fn rename_column(&mut self, column_id: &str, title: &str) -> StoreResult<bool> {
        let title = normalize_column_title(title)?;
        let Some(column) = self
            .board
            .columns
            .iter_mut()
            .find(|column| column.id == column_id)
        else {
            return Ok(Self::noop("column_rename", "column_not_found"));
        };
        if column.title == title {
            return Ok(Self::noop("column_rename", "unchanged"));
        }
        column.title = title;
        self.commit("column_rename")?;
        Ok(true)
    }

    /// Removes one column and every task in it.
    pub fn delete_column(&mut self, column_id: &str) -> StoreResult<bool> {
        let Some(index) = self.board.column_index(column_id) else {
            return Ok(Self::noop("column_delete", "column_not_found"));
        };
        self.board.columns.remove(index);
        let before = self.board.tasks.len();
        self.board.tasks.retain(|task| task.column_id != column_id);
        debug!(
            "event=column_delete module=store cascade_tasks={}",
            before - self.board.tasks.len()
        );
        self.commit("column_delete")?;
        Ok(true)
    }

    /// Moves `column_id` to the current position of `target_column_id`.
    ///
    /// Remove-then-reinsert at the target's pre-removal index, so dragging
    /// right lands after the target and dragging left lands before it.
    pub fn reorder_columns(
        &mut self,
        column_id: &str,
        target_column_id: &str,
    ) -> StoreResult<bool> {
        if column_id == target_column_id {
            return Ok(Self::noop("column_reorder", "same_column"));
        }
        let (Some(from), Some(to)) = (
            self.board.column_index(column_id),
            self.board.column_index(target_column_id),
        ) else {
            return Ok(Self::noop("column_reorder", "column_not_found"));
        };

        let moved = self.board.columns.remove(from);
        self.board.columns.insert(to, moved);
        self.commit("column_reorder")?;
        Ok(true)
    }

    /// Appends a task to the end of `column_id`.
    ///
    /// Returns `Ok(None)` when the column does not exist.
    pub fn add_task(
        &mut self,
        text: &str,
        description: &str,
        column_id: &str,
    ) -> StoreResult<Option<Task>> {
        let text = normalize_task_text(text)?;
        if !self.board.has_column(column_id) {
            Self::noop("task_add", "column_not_found");
            return Ok(None);
        }

        let order = self.board.next_order(column_id);
        let task = Task::new(text, description, column_id, Some(order));
        self.board.tasks.push(task.clone());
        self.commit("task_add")?;
        Ok(Some(task))
    }

    /// Overwrites text (trimmed) and description of one task.
    pub fn update_task(
        &mut self,
        task_id: &str,
        text: &str,
        description: &str,
    ) -> StoreResult<bool> {
        let text = normalize_task_text(text)?;
        let Some(task) = self.board.task_mut(task_id) else {
            return Ok(Self::noop("task_update", "task_not_found"));
        };
        if task.text == text && task.description == description {
            return Ok(Self::noop("task_update", "unchanged"));
        }
        task.text = text;
        task.description = description.to_string();
        self.commit("task_update")?;
        Ok(true)
    }

    pub fn delete_task(&mut self, task_id: &str) -> StoreResult<bool> {
        let before = self.board.tasks.len();
        self.board.tasks.retain(|task| task.id != task_id);
        if self.board.tasks.len() == before {
            return Ok(Self::noop("task_delete", "task_not_found"));
        }
        self.commit("task_delete")?;
        Ok(true)
    }

    /// Coarse cross-column move without an explicit position.
    ///
    /// `order` is inherited unchanged, so the task lands wherever its old
    /// value sorts among the target column's tasks.
    pub fn move_task(&mut self, task_id: &str, target_column_id: &str) -> StoreResult<bool> {
        if !self.board.has_column(target_column_id) {
            return Ok(Self::noop("task_move", "column_not_found"));
        }
        let Some(task) = self.board.task_mut(task_id) else {
            return Ok(Self::noop("task_move", "task_not_found"));
        };
        if task.column_id == target_column_id {
            return Ok(Self::noop("task_move", "same_column"));
        }
        task.column_id = target_column_id.to_string();
        self.commit("task_move")?;
        Ok(true)
    }

    /// Stamps a supplied per-column arrangement into `order`/`column_id`.
    ///
    /// Each listed task gets `order = index` within its lane. Unknown
    /// columns and task ids are skipped; a task listed twice keeps its first
    /// position. Writes once, and only when some task actually changed.
    pub fn reorder_tasks(&mut self, arrangement: &[ColumnArrangement]) -> StoreResult<bool> {
        let mut stamped = HashSet::new();
        let mut changed = 0usize;

        for lane in arrangement {
            if !self.board.has_column(&lane.column_id) {
                debug!("event=tasks_reorder module=store status=skip reason=column_not_found");
                continue;
            }
            for (index, task_id) in lane.task_ids.iter().enumerate() {
                if !stamped.insert(task_id.as_str()) {
                    continue;
                }
                let Some(task) = self.board.task_mut(task_id) else {
                    continue;
                };
                let order = index as i64;
                if task.column_id != lane.column_id || task.order != Some(order) {
                    task.column_id = lane.column_id.clone();
                    task.order = Some(order);
                    changed += 1;
                }
            }
        }

        if changed == 0 {
            return Ok(Self::noop("tasks_reorder", "unchanged"));
        }
        debug!("event=tasks_reorder module=store changed_tasks={changed}");
        self.commit("tasks_reorder")?;
        Ok(true)
    }

    /// Drops one task at `index` of `target_column_id` and commits the
    /// resulting arrangement.
    pub fn drop_task(
        &mut self,
        task_id: &str,
        target_column_id: &str,
        index: usize,
    ) -> StoreResult<bool> {
        match arrangement_after_drop(&self.board, task_id, target_column_id, index) {
            Some(arrangement) => self.reorder_tasks(&arrangement),
            None => Ok(Self::noop("task_drop", "not_found")),
        }
    }

    fn commit(&self, event: &'static str) -> StoreResult<()> {
        match self.storage.save(&self.board) {
            Ok(()) => {
                info!("event={event} module=store status=ok");
                Ok(())
            }
            Err(err) => {
                warn!("event={event} module=store status=error error_code=persist_failed error={err}");
                Err(StoreError::Persistence(err))
            }
        }
    }

    fn noop(event: &'static str, reason: &'static str) -> bool {
        debug!("event={event} module=store status=noop reason={reason}");
        false
    }
}
