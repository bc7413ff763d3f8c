//! Render target writing the preview document to disk

use codepad_core::{RenderTarget, Result};
use std::fs;
use std::path::PathBuf;

pub const PREVIEW_FILE_NAME: &str = "preview.html";

/// Writes each rendered document to `<dir>/preview.html`, replacing the
/// previous one. Opening the file in a browser runs it.
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_FILE_NAME)
    }
}

impl RenderTarget for DirectoryTarget {
    fn write_document(&mut self, document: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.document_path(), document)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_render_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = DirectoryTarget::new(dir.path().join("out"));

        target.write_document("<p>one</p>").unwrap();
        target.write_document("<p>two</p>").unwrap();

        let written = fs::read_to_string(target.document_path()).unwrap();
        assert_eq!(written, "<p>two</p>");
    }
}
