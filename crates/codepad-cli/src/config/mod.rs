//! Configuration management

use anyhow::{Context, Result};
use codepad_core::CodepadConfig;
use std::path::PathBuf;

pub struct SettingsManager;

impl SettingsManager {
    /// Get the codepad home directory (~/.codepad)
    pub fn codepad_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CODEPAD_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".codepad"))
    }

    /// Key-value file standing in for browser local storage
    pub fn storage_path() -> Result<PathBuf> {
        Ok(Self::codepad_home()?.join("storage.json"))
    }

    /// Default directory the preview document is written to
    pub fn preview_dir() -> Result<PathBuf> {
        Ok(Self::codepad_home()?.join("preview"))
    }

    /// Load configuration: defaults, then `config.{toml,yaml,json}` in the
    /// home directory, then `CODEPAD_*` environment variables
    /// (`CODEPAD_ASSISTANT__PROCESSING_DELAY_MS=0`).
    pub fn load() -> Result<CodepadConfig> {
        let base = Self::codepad_home()?.join("config");

        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(&base.to_string_lossy()).required(false))
            .add_source(
                ::config::Environment::with_prefix("CODEPAD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}
