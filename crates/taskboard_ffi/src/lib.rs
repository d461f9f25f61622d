//! Flutter-facing FFI surface for the task board core.

pub mod api;
