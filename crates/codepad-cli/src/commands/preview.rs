//! Render the preview document to disk

use super::open_session;
use anyhow::{Context, Result};
use codepad_core::CodepadConfig;
use colored::Colorize;
use std::path::PathBuf;

pub async fn run(
    project: Option<String>,
    out: Option<PathBuf>,
    open: bool,
    config: &CodepadConfig,
) -> Result<()> {
    // Opening the session renders the first preview
    let session = open_session(project, out, config)?;
    let path = session.previewer().target().document_path();

    if session.previewer().last_document().is_none() {
        println!(
            "{}",
            "⚠️  Nothing to preview: the project has no HTML file".yellow()
        );
        return Ok(());
    }

    println!("{}", "✅ Preview written".green());
    println!("   {}", path.display().to_string().cyan());

    if open {
        webbrowser::open(&path.to_string_lossy())
            .with_context(|| format!("Failed to open {}", path.display()))?;
    }
    Ok(())
}
