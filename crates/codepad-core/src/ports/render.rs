//! Render target trait for the live preview

use crate::Result;

/// An isolated rendering context, such as a sandboxed iframe.
///
/// `write_document` must discard everything the context held before and run
/// the new document's scripts exactly once.
pub trait RenderTarget {
    fn write_document(&mut self, document: &str) -> Result<()>;
}
