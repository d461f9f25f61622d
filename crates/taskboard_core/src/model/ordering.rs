//! Task ordering engine.
//!
//! # Responsibility
//! - Define the total render order of tasks inside one column.
//! - Compute drop positions from pointer geometry.
//! - Build the full per-column arrangement a drag produces, which the store
//!   then stamps into canonical `order` values.
//!
//! # Invariants
//! - Render order is `(order ASC, created_at ASC, id ASC)`; a missing
//!   `order` sorts before every present one, so appended tasks
//!   (`Board::next_order`) land after never-positioned legacy tasks.
//! - Drop index is computed against siblings that exclude the dragged card.

use crate::model::board::{Board, ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Compares two tasks of the same column by render position.
pub fn render_order(a: &Task, b: &Task) -> Ordering {
    order_key(a.order)
        .cmp(&order_key(b.order))
        .then(a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn order_key(order: Option<i64>) -> (bool, i64) {
    match order {
        Some(value) => (true, value),
        None => (false, 0),
    }
}

/// Desired task sequence of one column, as observed on the view surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnArrangement {
    pub column_id: ColumnId,
    pub task_ids: Vec<TaskId>,
}

impl ColumnArrangement {
    pub fn new(column_id: impl Into<ColumnId>, task_ids: Vec<TaskId>) -> Self {
        Self {
            column_id: column_id.into(),
            task_ids,
        }
    }
}

/// Vertical extent of one rendered sibling card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub top: f64,
    pub height: f64,
}

impl CardBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Insertion index for a pointer at `pointer_y`.
///
/// Returns the index of the first sibling whose midpoint lies below the
/// pointer, or `siblings.len()` to append. `siblings` are in render order and
/// must not include the card being dragged.
pub fn drop_index(pointer_y: f64, siblings: &[CardBounds]) -> usize {
    siblings
        .iter()
        .position(|bounds| pointer_y < bounds.midpoint())
        .unwrap_or(siblings.len())
}

/// Current rendered arrangement of every column, in column display order.
pub fn current_arrangement(board: &Board) -> Vec<ColumnArrangement> {
    board
        .columns
        .iter()
        .map(|column| {
            let task_ids = board
                .tasks_in_column(&column.id)
                .into_iter()
                .map(|task| task.id.clone())
                .collect();
            ColumnArrangement::new(column.id.clone(), task_ids)
        })
        .collect()
}

/// Arrangement after dropping `task_id` into `target_column_id` at `index`.
///
/// The task is removed from its current position first, so `index` counts
/// siblings without it. Out-of-range indexes append. Returns `None` when the
/// task or the target column does not exist.
pub fn arrangement_after_drop(
    board: &Board,
    task_id: &str,
    target_column_id: &str,
    index: usize,
) -> Option<Vec<ColumnArrangement>> {
    board.task(task_id)?;

    let mut arrangement = current_arrangement(board);
    for lane in &mut arrangement {
        lane.task_ids.retain(|id| id != task_id);
    }

    let lane = arrangement
        .iter_mut()
        .find(|lane| lane.column_id == target_column_id)?;
    let index = index.min(lane.task_ids.len());
    lane.task_ids.insert(index, task_id.to_string());

    Some(arrangement)
}

#[cfg(test)]
mod tests {
    use super::{arrangement_after_drop, drop_index, render_order, CardBounds};
    use crate::model::board::{Board, Task};

    fn task(id: &str, column_id: &str, created_at: i64, order: Option<i64>) -> Task {
        Task {
            id: id.to_string(),
            text: id.to_string(),
            description: String::new(),
            column_id: column_id.to_string(),
            created_at,
            order,
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.id.clone()).collect()
    }

    #[test]
    fn equal_order_breaks_tie_by_created_at() {
        let later = task("later", "new", 20, Some(1));
        let earlier = task("earlier", "new", 10, Some(1));
        let mut tasks = vec![&later, &earlier];
        tasks.sort_by(|a, b| render_order(a, b));
        assert_eq!(ids(&tasks), vec!["earlier", "later"]);
    }

    #[test]
    fn missing_order_sorts_before_present_order_then_by_created_at() {
        let mut board = Board::seeded();
        board.tasks.push(task("u2", "new", 30, None));
        board.tasks.push(task("o1", "new", 50, Some(1)));
        board.tasks.push(task("u1", "new", 5, None));
        board.tasks.push(task("o0", "new", 90, Some(0)));

        let rendered = board.tasks_in_column("new");
        assert_eq!(ids(&rendered), vec!["u1", "u2", "o0", "o1"]);
    }

    #[test]
    fn identical_keys_fall_back_to_id() {
        let b = task("b", "new", 1, Some(0));
        let a = task("a", "new", 1, Some(0));
        let mut tasks = vec![&b, &a];
        tasks.sort_by(|x, y| render_order(x, y));
        assert_eq!(ids(&tasks), vec!["a", "b"]);
    }

    #[test]
    fn drop_index_uses_sibling_midpoints() {
        let siblings = [
            CardBounds::new(0.0, 40.0),
            CardBounds::new(50.0, 40.0),
            CardBounds::new(100.0, 40.0),
        ];
        assert_eq!(drop_index(-5.0, &siblings), 0);
        assert_eq!(drop_index(19.0, &siblings), 0);
        assert_eq!(drop_index(21.0, &siblings), 1);
        assert_eq!(drop_index(75.0, &siblings), 2);
        assert_eq!(drop_index(500.0, &siblings), 3);
        assert_eq!(drop_index(10.0, &[]), 0);
    }

    #[test]
    fn arrangement_after_drop_moves_task_across_columns() {
        let mut board = Board::seeded();
        board.tasks.push(task("t1", "new", 1, Some(0)));
        board.tasks.push(task("t2", "new", 2, Some(1)));
        board.tasks.push(task("t3", "done", 3, Some(0)));

        let arrangement = arrangement_after_drop(&board, "t2", "done", 0).unwrap();
        assert_eq!(arrangement.len(), 4);
        assert_eq!(arrangement[0].column_id, "new");
        assert_eq!(arrangement[0].task_ids, vec!["t1"]);
        assert_eq!(arrangement[3].column_id, "done");
        assert_eq!(arrangement[3].task_ids, vec!["t2", "t3"]);
    }

    #[test]
    fn arrangement_after_drop_clamps_index_and_rejects_unknown_ids() {
        let mut board = Board::seeded();
        board.tasks.push(task("t1", "new", 1, Some(0)));
        board.tasks.push(task("t2", "new", 2, Some(1)));

        let arrangement = arrangement_after_drop(&board, "t1", "new", 99).unwrap();
        assert_eq!(arrangement[0].task_ids, vec!["t2", "t1"]);

        assert!(arrangement_after_drop(&board, "missing", "new", 0).is_none());
        assert!(arrangement_after_drop(&board, "t1", "ghost", 0).is_none());
    }
}
