//! Configuration for Codepad hosts
//!
//! Every field has a default so a partial (or absent) config file still
//! produces a usable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root key holding the serialized project collection
pub const DEFAULT_PROJECTS_KEY: &str = "projects";
/// Scratch session keys used when no project id is addressed
pub const DEFAULT_SCRATCH_CODE_KEY: &str = "editorCode";
pub const DEFAULT_SCRATCH_NAME_KEY: &str = "projectName";

pub const DEFAULT_PROJECT_NAME: &str = "New Project";
pub const DEFAULT_SCRATCH_PROJECT_NAME: &str = "My Project";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodepadConfig {
    pub storage: StorageKeys,
    pub assistant: AssistantConfig,
    /// Name given to projects created without one
    pub default_project_name: String,
}

impl Default for CodepadConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            assistant: AssistantConfig::default(),
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub projects_key: String,
    pub scratch_code_key: String,
    pub scratch_name_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            projects_key: DEFAULT_PROJECTS_KEY.to_string(),
            scratch_code_key: DEFAULT_SCRATCH_CODE_KEY.to_string(),
            scratch_name_key: DEFAULT_SCRATCH_NAME_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Simulated generation latency applied before a patch lands
    pub processing_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 1500,
        }
    }
}

impl AssistantConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}
