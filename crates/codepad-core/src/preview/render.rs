//! Render composed documents into an isolated context

use super::compose::compose;
use super::console::{instrument, ConsoleChannel, ConsoleCursor};
use crate::ports::RenderTarget;
use crate::Result;
use codepad_types::FileNode;
use tracing::debug;

/// Drives a [`RenderTarget`] and owns the console subscription for it.
///
/// Every render opens a fresh console context, so log lines posted by a
/// previous document are discarded once it has been replaced.
pub struct Previewer<T> {
    target: T,
    console: ConsoleChannel,
    last_document: Option<String>,
}

impl<T: RenderTarget> Previewer<T> {
    pub fn new(target: T) -> Self {
        Self::with_console(target, ConsoleChannel::new())
    }

    /// Share an existing channel, e.g. one the host's message listener feeds
    pub fn with_console(target: T, console: ConsoleChannel) -> Self {
        Self {
            target,
            console,
            last_document: None,
        }
    }

    /// Replace the context's contents with `document`
    pub fn render(&mut self, document: &str) -> Result<()> {
        let context = self.console.open_context();
        self.target.write_document(&instrument(document, &context))?;
        self.last_document = Some(document.to_string());
        debug!(bytes = document.len(), "Rendered preview");
        Ok(())
    }

    /// Compose and render. Returns `false` when the tree has no HTML file,
    /// in which case nothing is rendered.
    pub fn render_files(&mut self, files: &[FileNode]) -> Result<bool> {
        match compose(files) {
            Some(document) => {
                self.render(&document)?;
                Ok(true)
            }
            None => {
                debug!("No HTML file to preview");
                Ok(false)
            }
        }
    }

    /// Re-run the last rendered document without recomposing
    pub fn refresh(&mut self) -> Result<bool> {
        let Some(document) = self.last_document.clone() else {
            return Ok(false);
        };
        self.render(&document)?;
        Ok(true)
    }

    pub fn capture_console(&self) -> ConsoleCursor {
        self.console.cursor()
    }

    pub fn console(&self) -> &ConsoleChannel {
        &self.console
    }

    /// Discard the context; messages still in flight are dropped
    pub fn teardown(&mut self) {
        self.console.close_context();
        self.last_document = None;
    }

    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

/// Render target that keeps every written document in memory
#[derive(Debug, Default)]
pub struct RecordingTarget {
    documents: Vec<String>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn last(&self) -> Option<&str> {
        self.documents.last().map(String::as_str)
    }
}

impl RenderTarget for RecordingTarget {
    fn write_document(&mut self, document: &str) -> Result<()> {
        self.documents.push(document.to_string());
        Ok(())
    }
}
