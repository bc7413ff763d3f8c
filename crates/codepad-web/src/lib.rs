//! Codepad in the browser
//!
//! Binds the editor session to `localStorage`, a sandboxed preview iframe
//! and blob downloads. The page drives everything through [`Playground`].

mod download;
mod logger;
mod playground;
mod preview;
mod storage;

pub use download::trigger_download;
pub use playground::Playground;
pub use preview::{ConsoleRelay, IframeTarget};
pub use storage::LocalStorageStore;

use codepad_core::CodepadError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(start)]
pub fn start() {
    logger::init();
    log::info!("Codepad web bindings loaded");
}

pub(crate) fn js_error(err: CodepadError) -> JsValue {
    JsError::new(&err.to_string()).into()
}

/// Message out of a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
