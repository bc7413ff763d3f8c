//! Codepad Core Library
//!
//! Project persistence, live preview composition and the pattern-matched
//! assistant behind the Codepad playground. Hosts plug in their own storage
//! and rendering through the traits in [`ports`].

pub use codepad_types::*;

pub mod config;
pub mod error;
pub mod export;
pub mod patch;
pub mod ports;
pub mod preview;
pub mod project_store;
pub mod session;
pub mod storage;
pub mod tree;

pub use config::CodepadConfig;
pub use error::{CodepadError, Result};
pub use export::{export_file, export_filename, export_preview, ExportArtifact};
pub use patch::{PatchContext, PatchEffect, PatchEngine, PatchOutcome};
pub use ports::{KeyValueStore, RenderTarget};
pub use preview::{compose, ConsoleChannel, Previewer, RecordingTarget};
pub use project_store::ProjectStore;
pub use session::{EditorSession, PendingInstruction, SessionAddress};
pub use storage::MemoryStore;
