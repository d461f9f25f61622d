//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical persisted shape (`columns` + `tasks`).
//! - Provide lookup, render-order and append-order helpers.
//! - Validate cross-entity invariants after load or mutation.
//!
//! # Invariants
//! - `Column::id` and `Task::id` are stable for the entity lifetime.
//! - `Task::order` is optional; missing values fall back to the tie-break.
//! - Seed column ids are literals, so repeated seeding is idempotent.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::ordering::render_order;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable column identifier. Seed columns use fixed literals.
pub type ColumnId = String;

/// Stable task identifier.
pub type TaskId = String;

/// Column id legacy incomplete items migrate into.
pub const NEW_COLUMN_ID: &str = "new";
/// Column id legacy completed items migrate into.
pub const DONE_COLUMN_ID: &str = "done";

/// Default lanes in display order: `(id, title)`.
pub const SEED_COLUMNS: [(&str, &str); 4] = [
    (NEW_COLUMN_ID, "New"),
    ("inprogress", "In Progress"),
    ("blocked", "Blocked"),
    (DONE_COLUMN_ID, "Done"),
];

/// Validation failures for board entities and cross-entity invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    /// Column title is blank after trim.
    BlankColumnTitle,
    /// Task text is blank after trim.
    BlankTaskText,
    /// Two columns share one id.
    DuplicateColumnId(ColumnId),
    /// Two tasks share one id.
    DuplicateTaskId(TaskId),
    /// Task references a column that does not exist.
    DanglingColumnRef { task_id: TaskId, column_id: ColumnId },
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankColumnTitle => write!(f, "column title must not be blank"),
            Self::BlankTaskText => write!(f, "task text must not be blank"),
            Self::DuplicateColumnId(id) => write!(f, "duplicate column id: {id}"),
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id: {id}"),
            Self::DanglingColumnRef { task_id, column_id } => write!(
                f,
                "task {task_id} references missing column {column_id}"
            ),
        }
    }
}

impl Error for BoardValidationError {}

/// One named lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    /// Creates a column with a freshly generated id.
    ///
    /// The title is stored as given; callers normalize it first.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Creates a column with a caller-provided id (seed and import paths).
    pub fn with_id(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Display title. Never blank for tasks created through the store.
    pub text: String,
    #[serde(default)]
    pub description: String,
    pub column_id: ColumnId,
    /// Unix epoch milliseconds. Secondary sort key.
    pub created_at: i64,
    /// Position within the column. Primary sort key when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Task {
    /// Creates a task with a generated id and the current instant as
    /// `created_at`.
    pub fn new(
        text: impl Into<String>,
        description: impl Into<String>,
        column_id: impl Into<ColumnId>,
        order: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            description: description.into(),
            column_id: column_id.into(),
            created_at: now_epoch_ms(),
            order,
        }
    }
}

/// Complete persisted state: lanes in display order plus every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Board {
    /// Returns the default four-lane board with no tasks.
    pub fn seeded() -> Self {
        Self {
            columns: SEED_COLUMNS
                .iter()
                .map(|(id, title)| Column::with_id(*id, *title))
                .collect(),
            tasks: Vec::new(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub fn has_column(&self, column_id: &str) -> bool {
        self.column(column_id).is_some()
    }

    /// Position of a column in display order.
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id == column_id)
    }

    pub fn column_ids_in_order(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.id.as_str()).collect()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Tasks of one column in render order: `(order, created_at, id)`.
    pub fn tasks_in_column(&self, column_id: &str) -> Vec<&Task> {
        let mut tasks = self
            .tasks
            .iter()
            .filter(|task| task.column_id == column_id)
            .collect::<Vec<_>>();
        tasks.sort_by(|a, b| render_order(a, b));
        tasks
    }

    /// Number of tasks shown in one column.
    pub fn task_count(&self, column_id: &str) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.column_id == column_id)
            .count()
    }

    /// Order value that appends a task to the end of `column_id`.
    ///
    /// Tasks without `order` do not participate (they render first); an
    /// empty column yields `0`. Saturates at `i64::MAX`, where the creation
    /// time tie-break still renders the new task last.
    pub fn next_order(&self, column_id: &str) -> i64 {
        self.tasks
            .iter()
            .filter(|task| task.column_id == column_id)
            .filter_map(|task| task.order)
            .max()
            .unwrap_or(-1)
            .saturating_add(1)
    }

    /// Checks id uniqueness, referential integrity and required text.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if column.title.trim().is_empty() {
                return Err(BoardValidationError::BlankColumnTitle);
            }
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardValidationError::DuplicateColumnId(column.id.clone()));
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if task.text.trim().is_empty() {
                return Err(BoardValidationError::BlankTaskText);
            }
            if !task_ids.insert(task.id.as_str()) {
                return Err(BoardValidationError::DuplicateTaskId(task.id.clone()));
            }
            if !column_ids.contains(task.column_id.as_str()) {
                return Err(BoardValidationError::DanglingColumnRef {
                    task_id: task.id.clone(),
                    column_id: task.column_id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Trims a column title and rejects blank input.
pub fn normalize_column_title(value: &str) -> Result<String, BoardValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardValidationError::BlankColumnTitle);
    }
    Ok(trimmed.to_string())
}

/// Trims task text and rejects blank input.
pub fn normalize_task_text(value: &str) -> Result<String, BoardValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardValidationError::BlankTaskText);
    }
    Ok(trimmed.to_string())
}

/// Current wall-clock instant in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{Board, BoardValidationError, Column, Task, SEED_COLUMNS};

    fn task_at(id: &str, column_id: &str, created_at: i64, order: Option<i64>) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {id}"),
            description: String::new(),
            column_id: column_id.to_string(),
            created_at,
            order,
        }
    }

    #[test]
    fn seeded_board_has_fixed_lanes_in_order() {
        let board = Board::seeded();
        let ids = board.column_ids_in_order();
        assert_eq!(ids, vec!["new", "inprogress", "blocked", "done"]);
        for (column, (_, title)) in board.columns.iter().zip(SEED_COLUMNS) {
            assert_eq!(column.title, title);
        }
        assert!(board.tasks.is_empty());
    }

    #[test]
    fn next_order_ignores_tasks_without_order() {
        let mut board = Board::seeded();
        assert_eq!(board.next_order("new"), 0);

        board.tasks.push(task_at("a", "new", 1, None));
        assert_eq!(board.next_order("new"), 0);

        board.tasks.push(task_at("b", "new", 2, Some(5)));
        board.tasks.push(task_at("c", "done", 3, Some(40)));
        assert_eq!(board.next_order("new"), 6);
    }

    #[test]
    fn next_order_saturates_at_max() {
        let mut board = Board::seeded();
        board.tasks.push(task_at("a", "new", 1, Some(i64::MAX)));
        assert_eq!(board.next_order("new"), i64::MAX);
    }

    #[test]
    fn tasks_in_column_follow_render_order_and_count_badge() {
        let mut board = Board::seeded();
        board.tasks.push(task_at("legacy", "new", 1, None));
        board.tasks.push(task_at("late", "new", 9, Some(1)));
        board.tasks.push(task_at("b", "new", 5, Some(0)));
        board.tasks.push(task_at("a", "new", 5, Some(0)));
        board.tasks.push(task_at("other", "done", 0, Some(0)));

        let ids = board
            .tasks_in_column("new")
            .into_iter()
            .map(|task| task.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["legacy", "a", "b", "late"]);
        assert_eq!(board.task_count("new"), 4);
        assert_eq!(board.task_count("blocked"), 0);
    }

    #[test]
    fn validate_rejects_dangling_column_reference() {
        let mut board = Board::seeded();
        board.tasks.push(task_at("a", "ghost", 1, Some(0)));

        let err = board.validate().unwrap_err();
        assert_eq!(
            err,
            BoardValidationError::DanglingColumnRef {
                task_id: "a".to_string(),
                column_id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut board = Board::seeded();
        board.columns.push(Column::with_id("new", "Again"));
        assert_eq!(
            board.validate().unwrap_err(),
            BoardValidationError::DuplicateColumnId("new".to_string())
        );

        let mut board = Board::seeded();
        board.tasks.push(task_at("a", "new", 1, None));
        board.tasks.push(task_at("a", "done", 2, None));
        assert_eq!(
            board.validate().unwrap_err(),
            BoardValidationError::DuplicateTaskId("a".to_string())
        );
    }

    #[test]
    fn task_wire_format_is_camel_case_and_omits_missing_order() {
        let task = task_at("a", "new", 1_700_000_000_000, None);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["columnId"], "new");
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert!(json.get("order").is_none());

        let decoded: Task = serde_json::from_value(serde_json::json!({
            "id": "b",
            "text": "no description",
            "columnId": "done",
            "createdAt": 5,
            "order": 2
        }))
        .unwrap();
        assert_eq!(decoded.description, "");
        assert_eq!(decoded.order, Some(2));
    }
}
