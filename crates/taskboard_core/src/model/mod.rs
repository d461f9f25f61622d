//! Canonical board data model.
//!
//! # Responsibility
//! - Define the `Board`/`Column`/`Task` shapes shared by migrator, store and
//!   every view collaborator.
//! - Own the render-order rule and the drop-position computation, so ordering
//!   logic lives in exactly one place.
//!
//! # Invariants
//! - Every `task.column_id` references a live column.
//! - Column and task ids are unique within one board.
//! - Column display order is the sequence order of `Board::columns`.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod board;
pub mod ordering;
