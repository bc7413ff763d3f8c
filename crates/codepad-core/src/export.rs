//! Downloadable artifacts

use crate::preview::compose;
use bytes::Bytes;
use codepad_types::{Language, Project};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// File content ready to hand to a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Bytes,
}

pub fn export_file(content: &str, filename: &str) -> ExportArtifact {
    ExportArtifact {
        filename: filename.to_string(),
        mime_type: Language::from_file_name(filename).mime_type(),
        bytes: Bytes::copy_from_slice(content.as_bytes()),
    }
}

/// `My Cool App` -> `my-cool-app.html`
pub fn export_filename(project_name: &str) -> String {
    let slug = WHITESPACE.replace_all(project_name.trim(), "-").to_lowercase();
    let slug = if slug.is_empty() { "project".to_string() } else { slug };
    format!("{}.html", slug)
}

/// The composed preview document, named after the project. `None` when the
/// project has no HTML file.
pub fn export_preview(project: &Project) -> Option<ExportArtifact> {
    let document = compose(&project.files)?;
    Some(export_file(&document, &export_filename(&project.name)))
}
