//! Codepad Types - Pure type definitions for WASM compatibility
//!
//! This crate contains only pure data types with no async runtime dependencies,
//! so the same project model is shared by the CLI and the browser bindings.

pub mod chat;
pub mod console;
pub mod project;

pub use chat::*;
pub use console::*;
pub use project::*;

/// Generate a new time-ordered identifier.
///
/// UUID v7 carries a millisecond timestamp plus random bits, so ids created
/// within the same millisecond still differ.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
