//! Error types for Codepad

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodepadError>;

#[derive(Error, Debug)]
pub enum CodepadError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("An instruction is already being processed")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CodepadError {
    fn from(e: serde_json::Error) -> Self {
        CodepadError::Serialization(e.to_string())
    }
}
