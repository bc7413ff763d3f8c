//! File tree commands

use super::{open_session, resolve_file};
use crate::commands::project::print_tree;
use anyhow::{Context, Result};
use codepad_core::CodepadConfig;
use codepad_types::FileKind;
use colored::Colorize;
use std::io::Read;
use std::path::Path;

pub async fn list(project: Option<String>, config: &CodepadConfig) -> Result<()> {
    let session = open_session(project, None, config)?;

    println!("{} {}", "📁".blue(), session.project().name.blue().bold());
    print_tree(&session.project().files, 1);
    Ok(())
}

pub async fn add(
    project: Option<String>,
    name: &str,
    folder: bool,
    parent: Option<&str>,
    config: &CodepadConfig,
) -> Result<()> {
    let mut session = open_session(project, None, config)?;
    let parent_id = match parent {
        Some(arg) => Some(resolve_file(&session.project().files, arg)?.id.clone()),
        None => None,
    };
    let kind = if folder { FileKind::Folder } else { FileKind::File };

    let id = session.create_file(name, kind, parent_id.as_deref())?;

    let label = if folder { "folder" } else { "file" };
    println!("{}", format!("✅ Added {} '{}'", label, name).green());
    println!("   ID: {}", id.cyan());
    if session.is_scratch() {
        println!(
            "   {}",
            "Note: the scratch session only keeps its HTML document. Use --project to keep other files."
                .yellow()
        );
    }
    Ok(())
}

pub async fn remove(project: Option<String>, file: &str, config: &CodepadConfig) -> Result<()> {
    let mut session = open_session(project, None, config)?;
    let id = resolve_file(&session.project().files, file)?.id.clone();

    let removed = session.delete_file(&id)?;
    println!("{}", format!("✅ Deleted '{}'", removed.name).green());
    Ok(())
}

pub async fn rename(
    project: Option<String>,
    file: &str,
    name: &str,
    config: &CodepadConfig,
) -> Result<()> {
    let mut session = open_session(project, None, config)?;
    let id = resolve_file(&session.project().files, file)?.id.clone();

    session.rename_file(&id, name)?;
    println!("{}", format!("✅ Renamed '{}' to '{}'", file, name).green());
    Ok(())
}

/// Replace a file's content from `from`, or stdin when absent
pub async fn write(
    project: Option<String>,
    file: &str,
    from: Option<&Path>,
    config: &CodepadConfig,
) -> Result<()> {
    let content = match from {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let mut session = open_session(project, None, config)?;
    let id = resolve_file(&session.project().files, file)?.id.clone();

    session.update_file(&id, &content)?;
    println!(
        "{}",
        format!("✅ Wrote {} bytes to '{}'", content.len(), file).green()
    );
    Ok(())
}

pub async fn cat(project: Option<String>, file: &str, config: &CodepadConfig) -> Result<()> {
    let session = open_session(project, None, config)?;
    let node = resolve_file(&session.project().files, file)?;

    if node.is_folder() {
        anyhow::bail!("'{}' is a folder", node.name);
    }
    print!("{}", node.content);
    Ok(())
}
