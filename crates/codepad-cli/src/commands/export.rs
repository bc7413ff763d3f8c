//! Export a file or the composed preview

use super::{open_session, resolve_file};
use anyhow::{Context, Result};
use codepad_core::{export_file, CodepadConfig};
use colored::Colorize;
use std::path::PathBuf;

pub async fn run(
    project: Option<String>,
    file: Option<&str>,
    out: Option<PathBuf>,
    config: &CodepadConfig,
) -> Result<()> {
    let session = open_session(project, None, config)?;

    let artifact = match file {
        Some(arg) => {
            let node = resolve_file(&session.project().files, arg)?;
            if node.is_folder() {
                anyhow::bail!("'{}' is a folder", node.name);
            }
            export_file(&node.content, &node.name)
        }
        None => session
            .export_preview()
            .context("Nothing to export: the project has no HTML file")?,
    };

    let path = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{}",
        format!("✅ Exported {} ({})", artifact.filename, artifact.mime_type).green()
    );
    println!("   {}", path.display().to_string().cyan());
    Ok(())
}
