//! Command implementations

pub mod chat;
pub mod export;
pub mod file;
pub mod preview;
pub mod project;

use crate::config::SettingsManager;
use crate::preview::DirectoryTarget;
use crate::storage::FileStore;
use anyhow::{Context, Result};
use codepad_core::{CodepadConfig, EditorSession, ProjectStore, SessionAddress};
use codepad_types::FileNode;
use std::path::PathBuf;

pub type CliSession = EditorSession<FileStore, DirectoryTarget>;

/// Project store over `$CODEPAD_HOME/storage.json`
pub fn open_store(config: &CodepadConfig) -> Result<ProjectStore<FileStore>> {
    let store = ProjectStore::new(FileStore::open(SettingsManager::storage_path()?))
        .with_root_key(config.storage.projects_key.clone())
        .with_default_name(config.default_project_name.clone());
    Ok(store)
}

/// Open an editor session on a project (or the scratch session when `None`).
/// The preview goes to `out`, or the default preview directory.
pub fn open_session(
    project: Option<String>,
    out: Option<PathBuf>,
    config: &CodepadConfig,
) -> Result<CliSession> {
    let dir = match out {
        Some(dir) => dir,
        None => SettingsManager::preview_dir()?,
    };
    let address = SessionAddress::from_project_id(project);
    let description = match &address {
        SessionAddress::Project(id) => format!("project '{}'", id),
        SessionAddress::Scratch => "scratch session".to_string(),
    };

    EditorSession::open(
        FileStore::open(SettingsManager::storage_path()?),
        DirectoryTarget::new(dir),
        address,
        config,
    )
    .with_context(|| format!("Failed to open {}", description))
}

/// Resolve a file argument: an id first, then the first node with that name
pub fn resolve_file<'a>(files: &'a [FileNode], arg: &str) -> Result<&'a FileNode> {
    codepad_core::tree::find(files, arg)
        .or_else(|| codepad_core::tree::find_named(files, arg))
        .with_context(|| format!("File '{}' not found", arg))
}
