//! Sandboxed iframe preview and its console relay

use crate::describe;
use codepad_core::{CodepadError, ConsoleChannel, RenderTarget, Result};
use codepad_types::ConsoleMessage;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlIFrameElement, MessageEvent, Window};

const SANDBOX: &str = "allow-scripts allow-same-origin";

/// Writes documents into an iframe's own document
pub struct IframeTarget {
    iframe: HtmlIFrameElement,
}

impl IframeTarget {
    pub fn new(iframe: HtmlIFrameElement) -> Result<Self> {
        iframe
            .set_attribute("sandbox", SANDBOX)
            .map_err(|e| CodepadError::Render(describe(&e)))?;
        Ok(Self { iframe })
    }

    pub fn frame(&self) -> &HtmlIFrameElement {
        &self.iframe
    }
}

impl RenderTarget for IframeTarget {
    fn write_document(&mut self, document: &str) -> Result<()> {
        let doc = self
            .iframe
            .content_document()
            .ok_or_else(|| CodepadError::Render("preview frame has no document".to_string()))?;
        let doc: &HtmlDocument = doc.unchecked_ref();

        let render = || -> std::result::Result<(), JsValue> {
            doc.open()?;
            doc.write(&js_sys::Array::of1(&JsValue::from_str(document)))?;
            doc.close()
        };
        render().map_err(|e| CodepadError::Render(describe(&e)))
    }
}

/// `message` listener feeding console messages posted by the preview frame
/// into a [`ConsoleChannel`]. Events from any other window are ignored.
/// Removed from the window on drop.
pub struct ConsoleRelay {
    window: Window,
    callback: Closure<dyn FnMut(MessageEvent)>,
}

impl ConsoleRelay {
    pub fn attach(
        window: Window,
        frame: HtmlIFrameElement,
        channel: ConsoleChannel,
    ) -> std::result::Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |event: MessageEvent| {
            let from_preview = match (event.source(), frame.content_window()) {
                (Some(source), Some(preview)) => js_sys::Object::is(&source, &preview),
                _ => false,
            };
            if !from_preview {
                return;
            }

            let data = event.data();
            let accepted = match data.as_string() {
                Some(raw) => channel.deliver_json(&raw),
                None => match serde_wasm_bindgen::from_value::<ConsoleMessage>(data) {
                    Ok(message) => channel.deliver(message),
                    // Not a console message, e.g. posted by a browser extension
                    Err(_) => return,
                },
            };
            if !accepted {
                log::debug!("Dropped console message from a stale preview");
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())?;
        Ok(Self { window, callback })
    }
}

impl Drop for ConsoleRelay {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("message", self.callback.as_ref().unchecked_ref());
    }
}
