//! Project and file tree types
//!
//! The `children` tree is the only ownership structure. Older persisted
//! records may carry a `parentId` on files; serde ignores it on read and it
//! is never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A playground project as persisted in the projects collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            files: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    /// Bump `last_modified` to now
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// Whether a tree node is a file or a folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    File,
    Folder,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Folder => write!(f, "folder"),
        }
    }
}

/// A node in a project's file tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    /// Unused for folders
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            kind: FileKind::File,
            children: None,
        }
    }

    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: String::new(),
            kind: FileKind::Folder,
            children: Some(Vec::new()),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    pub fn language(&self) -> Language {
        Language::from_file_name(&self.name)
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        !self.is_folder() && has_extension(&self.name, ext)
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len()
        && name.ends_with(ext)
        && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}

/// Language of a file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    JavaScript,
    TypeScript,
    Json,
    Markdown,
    PlainText,
}

impl Language {
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "html" => Language::Html,
            "css" => Language::Css,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "json" => Language::Json,
            "md" => Language::Markdown,
            _ => Language::PlainText,
        }
    }

    /// MIME type used when exporting a file of this language
    pub fn mime_type(&self) -> &'static str {
        match self {
            Language::Html => "text/html",
            Language::Css => "text/css",
            Language::JavaScript => "text/javascript",
            Language::TypeScript => "application/typescript",
            Language::Json => "application/json",
            Language::Markdown => "text/markdown",
            Language::PlainText => "text/plain",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Html => write!(f, "html"),
            Language::Css => write!(f, "css"),
            Language::JavaScript => write!(f, "javascript"),
            Language::TypeScript => write!(f, "typescript"),
            Language::Json => write!(f, "json"),
            Language::Markdown => write!(f, "markdown"),
            Language::PlainText => write!(f, "plaintext"),
        }
    }
}
