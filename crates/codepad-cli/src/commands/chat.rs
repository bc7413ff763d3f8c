//! Send an instruction to the assistant

use super::{open_session, resolve_file};
use anyhow::Result;
use codepad_core::CodepadConfig;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub async fn run(
    project: Option<String>,
    file: Option<&str>,
    instruction: &str,
    config: &CodepadConfig,
) -> Result<()> {
    let mut session = open_session(project, None, config)?;

    if let Some(arg) = file {
        let id = resolve_file(&session.project().files, arg)?.id.clone();
        session.select_file(&id)?;
    }
    if let Some(active) = session.active_file() {
        println!("{} {}", "Active file:".dimmed(), active.name.cyan());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let delay = tokio::time::sleep(config.assistant.processing_delay());
    let result = session.submit(instruction, delay).await;
    spinner.finish_and_clear();

    let Some(outcome) = result? else {
        println!("{}", "Nothing to send".dimmed());
        return Ok(());
    };

    if outcome.is_change() {
        println!("{} {}", "🤖".blue(), outcome.message.green());
        if let Some(active) = session.active_file() {
            println!("   Updated: {}", active.name.cyan());
        }
    } else {
        println!("{} {}", "🤖".blue(), outcome.message.yellow());
    }
    Ok(())
}
