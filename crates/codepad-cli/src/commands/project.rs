//! Project management commands

use super::open_store;
use anyhow::{Context, Result};
use codepad_core::{tree, CodepadConfig};
use codepad_types::FileNode;
use colored::Colorize;

pub async fn list(config: &CodepadConfig) -> Result<()> {
    let projects = open_store(config)?.list()?;

    println!("{}", "📁 Projects".blue().bold());
    println!();

    if projects.is_empty() {
        println!("   (No projects yet)");
        println!();
        println!("   Create one with: {}", "codepad project new".dimmed());
        return Ok(());
    }

    for project in &projects {
        println!(
            "   {} {} {}",
            project.name.cyan(),
            project.id.dimmed(),
            format!("({} files)", tree::walk(&project.files).count()).dimmed()
        );
        println!(
            "       Modified: {}",
            project
                .last_modified
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        );
    }

    Ok(())
}

pub async fn new(name: Option<&str>, config: &CodepadConfig) -> Result<()> {
    let store = open_store(config)?;
    let project = store.create()?;
    let project = match name {
        Some(name) => store.rename(&project.id, name)?,
        None => project,
    };

    println!(
        "{}",
        format!("✅ Created project '{}'", project.name).green()
    );
    println!("   ID: {}", project.id.cyan());
    println!(
        "   Open it with: {}",
        format!("codepad preview --project {}", project.id).dimmed()
    );
    Ok(())
}

pub async fn show(id: &str, config: &CodepadConfig) -> Result<()> {
    let project = open_store(config)?
        .load(id)
        .with_context(|| format!("Failed to load project '{}'", id))?;

    println!("{} {}", "📁".blue(), project.name.blue().bold());
    println!("   ID: {}", project.id.cyan());
    println!(
        "   Modified: {}",
        project.last_modified.format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    if project.files.is_empty() {
        println!("   (No files)");
    } else {
        print_tree(&project.files, 1);
    }
    Ok(())
}

pub async fn rename(id: &str, name: &str, config: &CodepadConfig) -> Result<()> {
    let project = open_store(config)?.rename(id, name)?;
    println!("{}", format!("✅ Renamed project to '{}'", project.name).green());
    Ok(())
}

pub async fn duplicate(id: &str, config: &CodepadConfig) -> Result<()> {
    let store = open_store(config)?;
    let source = store.load(id)?;
    let copy = store.duplicate(&source)?;

    println!("{}", format!("✅ Created '{}'", copy.name).green());
    println!("   ID: {}", copy.id.cyan());
    Ok(())
}

pub async fn remove(id: &str, config: &CodepadConfig) -> Result<()> {
    open_store(config)?.delete(id)?;
    println!("{}", format!("✅ Deleted project '{}'", id).green());
    Ok(())
}

/// Indented listing of a file tree
pub fn print_tree(files: &[FileNode], depth: usize) {
    let indent = "   ".repeat(depth);
    for node in files {
        if node.is_folder() {
            println!("{}{}/ {}", indent, node.name.yellow(), node.id.dimmed());
            if let Some(children) = &node.children {
                print_tree(children, depth + 1);
            }
        } else {
            println!(
                "{}{} {}",
                indent,
                node.name,
                format!("[{}] {}", node.language(), node.id).dimmed()
            );
        }
    }
}
