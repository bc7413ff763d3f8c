//! Compose a project's files into one self-contained HTML document

use crate::tree;
use codepad_types::FileNode;
use tracing::debug;

const HEAD_CLOSE: &str = "</head>";
const BODY_CLOSE: &str = "</body>";

/// Build the preview document for a file tree.
///
/// The first `.html` file (depth-first display order) is the base document.
/// Every `.css` file is inlined in its own `<style>` block before `</head>`
/// and every `.js` file in its own `<script>` block before `</body>`. When an
/// anchor is missing that injection is skipped. Returns `None` when the tree
/// has no `.html` file.
pub fn compose(files: &[FileNode]) -> Option<String> {
    let base = tree::walk(files).find(|f| f.has_extension("html"))?;

    let styles = wrap_all(files, "css", "style");
    let scripts = wrap_all(files, "js", "script");

    let mut document = base.content.clone();
    if let Some(styles) = styles {
        document = inject_before(&document, HEAD_CLOSE, &styles);
    }
    if let Some(scripts) = scripts {
        document = inject_before(&document, BODY_CLOSE, &scripts);
    }
    Some(document)
}

fn wrap_all(files: &[FileNode], ext: &str, tag: &str) -> Option<String> {
    let blocks: Vec<String> = tree::walk(files)
        .filter(|f| f.has_extension(ext))
        .map(|f| format!("<{tag}>{}</{tag}>", f.content))
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

fn inject_before(document: &str, anchor: &str, block: &str) -> String {
    match document.find(anchor) {
        Some(pos) => format!("{}{}{}", &document[..pos], block, &document[pos..]),
        None => {
            debug!(anchor, "Anchor missing, skipping injection");
            document.to_string()
        }
    }
}
