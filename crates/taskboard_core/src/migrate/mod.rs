//! Schema migrator for persisted board artifacts.
//!
//! # Responsibility
//! - Normalize any loaded value (legacy list, unordered board, current
//!   board, or garbage) into a valid canonical `Board`.
//! - Report whether the normalized board must be written back.
//!
//! # Invariants
//! - `migrate` is pure: no I/O, no logging side effects beyond diagnostics.
//! - Output always satisfies `Board::validate()`.
//! - A valid current-shape board migrates to itself and needs no write.
//!
//! # See also
//! - docs/architecture/data-model.md

mod shape;

pub use shape::{classify, LoadedShape, ShapeKind};

use crate::model::board::{now_epoch_ms, Board, Column, Task, DONE_COLUMN_ID, NEW_COLUMN_ID};
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Outcome of one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Canonical board produced by migration.
    pub board: Board,
    /// Shape the loaded value was classified as.
    pub shape: ShapeKind,
    /// Whether the caller should persist `board` to upgrade the artifact.
    pub needs_persist: bool,
    /// Entities discarded because they could not be decoded or violated
    /// referential integrity.
    pub dropped: usize,
    /// Entities kept after filling a missing or malformed field.
    pub repaired: usize,
}

impl MigrationReport {
    fn seeded(shape: ShapeKind) -> Self {
        Self {
            board: Board::seeded(),
            shape,
            needs_persist: true,
            dropped: 0,
            repaired: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    dropped: usize,
    repaired: usize,
}

/// Migrates a loaded artifact into the canonical board shape.
///
/// `None` means no prior artifact exists (first run).
pub fn migrate(loaded: Option<&Value>) -> MigrationReport {
    let Some(value) = loaded else {
        info!("event=migrate module=migrate status=ok shape=missing");
        return MigrationReport::seeded(ShapeKind::Missing);
    };

    let shape = classify(value);
    let kind = shape.kind();
    let mut counters = Counters::default();

    let report = match shape {
        LoadedShape::LegacyList(items) => {
            let board = from_legacy_list(items, &mut counters);
            MigrationReport {
                board,
                shape: kind,
                needs_persist: true,
                dropped: counters.dropped,
                repaired: counters.repaired,
            }
        }
        LoadedShape::Unordered(object) | LoadedShape::Current(object) => {
            let board = from_board_object(object, &mut counters);
            MigrationReport {
                board,
                shape: kind,
                needs_persist: counters.dropped > 0 || counters.repaired > 0,
                dropped: counters.dropped,
                repaired: counters.repaired,
            }
        }
        LoadedShape::Unrecognized(reason) => {
            warn!("event=migrate module=migrate status=fallback shape=unrecognized reason={reason}");
            MigrationReport::seeded(kind)
        }
    };

    info!(
        "event=migrate module=migrate status=ok shape={} columns={} tasks={} dropped={} repaired={} needs_persist={}",
        report.shape.as_str(),
        report.board.columns.len(),
        report.board.tasks.len(),
        report.dropped,
        report.repaired,
        report.needs_persist
    );
    report
}

/// Maps legacy completion-flagged items onto the seed lanes.
fn from_legacy_list(items: &[Value], counters: &mut Counters) -> Board {
    let migrated_at = now_epoch_ms();
    let mut board = Board::seeded();
    let mut seen = HashSet::new();

    for item in items {
        let Some(object) = item.as_object() else {
            counters.dropped += 1;
            continue;
        };
        let Some(text) = non_blank_str(object, "text") else {
            counters.dropped += 1;
            continue;
        };

        let id = match non_blank_str(object, "id") {
            Some(id) => id.to_string(),
            None => {
                counters.repaired += 1;
                Uuid::new_v4().to_string()
            }
        };
        if !seen.insert(id.clone()) {
            counters.dropped += 1;
            continue;
        }

        let completed = object
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let created_at = read_epoch_ms(object, "createdAt").unwrap_or_else(|| {
            counters.repaired += 1;
            migrated_at
        });

        board.tasks.push(Task {
            id,
            text: text.to_string(),
            description: String::new(),
            column_id: (if completed { DONE_COLUMN_ID } else { NEW_COLUMN_ID }).to_string(),
            created_at,
            order: None,
        });
    }

    board
}

/// Adopts a column + task object, dropping entities that cannot be honored.
fn from_board_object(object: &Map<String, Value>, counters: &mut Counters) -> Board {
    let mut columns = Vec::new();
    let mut column_ids = HashSet::new();
    for raw in array_field(object, "columns") {
        let decoded = raw.as_object().and_then(|column| {
            let id = non_blank_str(column, "id")?;
            let title = non_blank_str(column, "title")?;
            Some(Column::with_id(id, title))
        });
        match decoded {
            Some(column) if column_ids.insert(column.id.clone()) => columns.push(column),
            _ => counters.dropped += 1,
        }
    }

    let migrated_at = now_epoch_ms();
    let mut tasks = Vec::new();
    let mut task_ids = HashSet::new();
    for raw in array_field(object, "tasks") {
        let Some(task) = raw
            .as_object()
            .and_then(|task| decode_task(task, migrated_at, counters))
        else {
            counters.dropped += 1;
            continue;
        };
        if !column_ids.contains(task.column_id.as_str()) {
            warn!("event=migrate_drop module=migrate kind=task reason=dangling_column");
            counters.dropped += 1;
            continue;
        }
        if !task_ids.insert(task.id.clone()) {
            warn!("event=migrate_drop module=migrate kind=task reason=duplicate_id");
            counters.dropped += 1;
            continue;
        }
        tasks.push(task);
    }

    Board { columns, tasks }
}

fn decode_task(
    object: &Map<String, Value>,
    migrated_at: i64,
    counters: &mut Counters,
) -> Option<Task> {
    let id = non_blank_str(object, "id")?;
    let text = non_blank_str(object, "text")?;
    let column_id = non_blank_str(object, "columnId")?;

    let description = match object.get("description") {
        Some(Value::String(value)) => value.clone(),
        None | Some(Value::Null) => String::new(),
        Some(_) => {
            counters.repaired += 1;
            String::new()
        }
    };
    let created_at = read_epoch_ms(object, "createdAt").unwrap_or_else(|| {
        counters.repaired += 1;
        migrated_at
    });
    let order = match object.get("order") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = as_i64_lossy(value);
            if parsed.is_none() {
                counters.repaired += 1;
            }
            parsed
        }
    };

    Some(Task {
        id: id.to_string(),
        text: text.to_string(),
        description,
        column_id: column_id.to_string(),
        created_at,
        order,
    })
}

fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match object.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn non_blank_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn read_epoch_ms(object: &Map<String, Value>, key: &str) -> Option<i64> {
    object.get(key).and_then(as_i64_lossy)
}

fn as_i64_lossy(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|number| number.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::{migrate, ShapeKind};
    use serde_json::json;

    #[test]
    fn missing_artifact_yields_persisted_seed_board() {
        let report = migrate(None);
        assert_eq!(report.shape, ShapeKind::Missing);
        assert!(report.needs_persist);
        assert_eq!(report.board.columns.len(), 4);
        assert!(report.board.tasks.is_empty());
    }

    #[test]
    fn legacy_items_without_text_or_duplicate_ids_are_dropped() {
        let loaded = json!([
            { "id": "a", "text": "keep", "completed": true, "createdAt": 10 },
            { "id": "b", "text": "   ", "completed": false, "createdAt": 11 },
            { "id": "a", "text": "dup", "completed": false, "createdAt": 12 },
            "not an object",
            { "text": "no id", "createdAt": 13.9 }
        ]);
        let report = migrate(Some(&loaded));

        assert_eq!(report.shape, ShapeKind::LegacyList);
        assert_eq!(report.dropped, 3);
        assert_eq!(report.repaired, 1);
        assert_eq!(report.board.tasks.len(), 2);
        assert_eq!(report.board.tasks[0].column_id, "done");
        assert_eq!(report.board.tasks[1].column_id, "new");
        assert_eq!(report.board.tasks[1].created_at, 13);
        assert!(!report.board.tasks[1].id.is_empty());
        report.board.validate().unwrap();
    }

    #[test]
    fn board_object_drops_dangling_tasks_and_requests_persist() {
        let loaded = json!({
            "columns": [
                { "id": "new", "title": "New" },
                { "id": "new", "title": "Duplicate" },
                { "title": "No id" }
            ],
            "tasks": [
                { "id": "t1", "text": "ok", "columnId": "new", "createdAt": 1 },
                { "id": "t2", "text": "orphan", "columnId": "gone", "createdAt": 2 }
            ]
        });
        let report = migrate(Some(&loaded));

        assert_eq!(report.shape, ShapeKind::Unordered);
        assert_eq!(report.board.columns.len(), 1);
        assert_eq!(report.board.tasks.len(), 1);
        assert_eq!(report.dropped, 3);
        assert!(report.needs_persist);
        report.board.validate().unwrap();
    }

    #[test]
    fn non_array_tasks_default_to_empty() {
        let loaded = json!({ "columns": [{ "id": "a", "title": "A" }], "tasks": "oops" });
        let report = migrate(Some(&loaded));
        assert_eq!(report.shape, ShapeKind::Unordered);
        assert!(report.board.tasks.is_empty());
        assert!(!report.needs_persist);
    }
}
