//! Codepad CLI
//!
//! Manage playground projects, render previews and talk to the assistant
//! from the terminal. State lives in `$CODEPAD_HOME/storage.json`.

mod commands;
mod config;
mod preview;
mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use crate::config::SettingsManager;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "codepad")]
#[command(author, version, about = "Codepad - a browser-style web playground in your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage saved projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Edit the files of a project
    File {
        /// Project id (defaults to the scratch session)
        #[arg(short, long, global = true)]
        project: Option<String>,

        #[command(subcommand)]
        action: FileAction,
    },

    /// Write the composed preview to disk
    Preview {
        /// Project id (defaults to the scratch session)
        #[arg(short, long)]
        project: Option<String>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the preview in a browser
        #[arg(long)]
        open: bool,
    },

    /// Ask the assistant to change the code
    Chat {
        /// Project id (defaults to the scratch session)
        #[arg(short, long)]
        project: Option<String>,

        /// File to work on (id or name)
        #[arg(short, long)]
        file: Option<String>,

        /// What to do, e.g. "add a button"
        #[arg(required = true, trailing_var_arg = true)]
        instruction: Vec<String>,
    },

    /// Export a file, or the whole preview as one HTML document
    Export {
        /// Project id (defaults to the scratch session)
        #[arg(short, long)]
        project: Option<String>,

        /// File to export (id or name); the preview when absent
        #[arg(short, long)]
        file: Option<String>,

        /// Destination path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List,
    /// Create a project
    New {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show a project's files
    Show { id: String },
    /// Rename a project
    Rename { id: String, name: String },
    /// Duplicate a project
    Dup { id: String },
    /// Delete a project
    Rm { id: String },
}

#[derive(Subcommand)]
enum FileAction {
    /// List files
    Ls,
    /// Add a file or folder
    Add {
        name: String,
        /// Create a folder instead of a file
        #[arg(long)]
        folder: bool,
        /// Parent folder (id or name)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a file or folder
    Rm { file: String },
    /// Rename a file or folder
    Mv { file: String, name: String },
    /// Replace a file's content
    Write {
        file: String,
        /// Read content from this path instead of stdin
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Print a file's content
    Cat { file: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "codepad_cli=debug,codepad_core=debug"
        } else {
            "codepad_cli=info"
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Starting Codepad CLI");

    let result = run(cli.command).await;

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

async fn run(command: Commands) -> Result<()> {
    let config = SettingsManager::load()?;

    match command {
        Commands::Project { action } => match action {
            ProjectAction::List => commands::project::list(&config).await,
            ProjectAction::New { name } => commands::project::new(name.as_deref(), &config).await,
            ProjectAction::Show { id } => commands::project::show(&id, &config).await,
            ProjectAction::Rename { id, name } => {
                commands::project::rename(&id, &name, &config).await
            }
            ProjectAction::Dup { id } => commands::project::duplicate(&id, &config).await,
            ProjectAction::Rm { id } => commands::project::remove(&id, &config).await,
        },
        Commands::File { project, action } => match action {
            FileAction::Ls => commands::file::list(project, &config).await,
            FileAction::Add {
                name,
                folder,
                parent,
            } => commands::file::add(project, &name, folder, parent.as_deref(), &config).await,
            FileAction::Rm { file } => commands::file::remove(project, &file, &config).await,
            FileAction::Mv { file, name } => {
                commands::file::rename(project, &file, &name, &config).await
            }
            FileAction::Write { file, from } => {
                commands::file::write(project, &file, from.as_deref(), &config).await
            }
            FileAction::Cat { file } => commands::file::cat(project, &file, &config).await,
        },
        Commands::Preview { project, out, open } => {
            commands::preview::run(project, out, open, &config).await
        }
        Commands::Chat {
            project,
            file,
            instruction,
        } => {
            let instruction = instruction.join(" ");
            commands::chat::run(project, file.as_deref(), &instruction, &config).await
        }
        Commands::Export { project, file, out } => {
            commands::export::run(project, file.as_deref(), out, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_chat_joins_instruction_words() {
        let cli = Cli::try_parse_from(["codepad", "chat", "-p", "42", "add", "a", "button"]).unwrap();
        match cli.command {
            Commands::Chat {
                project,
                instruction,
                ..
            } => {
                assert_eq!(project.as_deref(), Some("42"));
                assert_eq!(instruction.join(" "), "add a button");
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_file_project_flag_after_action() {
        let cli = Cli::try_parse_from(["codepad", "file", "cat", "index.html", "--project", "7"]).unwrap();
        match cli.command {
            Commands::File {
                project,
                action: FileAction::Cat { file },
            } => {
                assert_eq!(project.as_deref(), Some("7"));
                assert_eq!(file, "index.html");
            }
            _ => panic!("expected file cat"),
        }
    }
}
