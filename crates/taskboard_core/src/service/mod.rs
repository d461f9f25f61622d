//! Core use-case services.
//!
//! # Responsibility
//! - Turn view-layer intents into validated, persisted board mutations.
//! - Keep view/FFI layers decoupled from storage details.

pub mod board_store;
