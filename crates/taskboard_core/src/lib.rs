//! Core domain logic for the task board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use migrate::{migrate, MigrationReport, ShapeKind};
pub use model::board::{
    Board, BoardValidationError, Column, ColumnId, Task, TaskId, SEED_COLUMNS,
};
pub use model::ordering::{
    arrangement_after_drop, current_arrangement, drop_index, CardBounds, ColumnArrangement,
};
pub use service::board_store::{BoardStore, OpenReport, StoreError, StoreResult};
pub use storage::{BoardStorage, JsonFileStorage, MemoryStorage, StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
