//! Save an export through a temporary object URL

use codepad_core::ExportArtifact;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub fn trigger_download(artifact: &ExportArtifact) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(artifact.bytes.as_ref()));
    let options = BlobPropertyBag::new();
    options.set_type(artifact.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.filename);
    anchor.click();

    Url::revoke_object_url(&url)?;
    log::debug!("Downloaded {} ({} bytes)", artifact.filename, artifact.bytes.len());
    Ok(())
}
