//! JavaScript-facing editor facade

use crate::download::trigger_download;
use crate::js_error;
use crate::preview::{ConsoleRelay, IframeTarget};
use crate::storage::LocalStorageStore;
use codepad_core::{CodepadConfig, ConsoleChannel, EditorSession, Previewer, SessionAddress};
use codepad_types::FileKind;
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type WebSession = EditorSession<LocalStorageStore, IframeTarget>;

/// One editor page: a project (or the scratch session) bound to a preview
/// iframe
#[wasm_bindgen]
pub struct Playground {
    session: Rc<RefCell<WebSession>>,
    processing_delay_ms: u32,
    _relay: ConsoleRelay,
}

#[wasm_bindgen]
impl Playground {
    /// Open the project named by `?project=` in the page URL.
    ///
    /// `config` is an optional object shaped like `CodepadConfig`; missing
    /// fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(frame: web_sys::HtmlIFrameElement, config: JsValue) -> Result<Playground, JsValue> {
        let config: CodepadConfig = if config.is_undefined() || config.is_null() {
            CodepadConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let address = SessionAddress::from_query_with(&window.location().search()?, |value| {
            js_sys::decode_uri_component(value).ok().map(String::from)
        });

        let console = ConsoleChannel::new();
        let target = IframeTarget::new(frame).map_err(js_error)?;
        let relay = ConsoleRelay::attach(window, target.frame().clone(), console.clone())?;
        let previewer = Previewer::with_console(target, console);

        let session = EditorSession::open_with_previewer(
            LocalStorageStore::from_window().map_err(js_error)?,
            previewer,
            address,
            &config,
        )
        .map_err(js_error)?;
        log::info!("Opened project '{}'", session.project().name);

        Ok(Playground {
            session: Rc::new(RefCell::new(session)),
            processing_delay_ms: u32::try_from(config.assistant.processing_delay_ms)
                .unwrap_or(u32::MAX),
            _relay: relay,
        })
    }

    /// The open project as a plain object
    pub fn project(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.borrow().project())
    }

    #[wasm_bindgen(js_name = isScratch)]
    pub fn is_scratch(&self) -> bool {
        self.session.borrow().is_scratch()
    }

    #[wasm_bindgen(js_name = activeFile)]
    pub fn active_file(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().active_file())
    }

    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, id: &str) -> Result<(), JsValue> {
        self.session.borrow_mut().select_file(id).map_err(js_error)
    }

    #[wasm_bindgen(js_name = updateFile)]
    pub fn update_file(&self, id: &str, content: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .update_file(id, content)
            .map_err(js_error)
    }

    /// Returns the new node's id
    #[wasm_bindgen(js_name = createFile)]
    pub fn create_file(
        &self,
        name: &str,
        folder: bool,
        parent: Option<String>,
    ) -> Result<String, JsValue> {
        let kind = if folder { FileKind::Folder } else { FileKind::File };
        self.session
            .borrow_mut()
            .create_file(name, kind, parent.as_deref())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteFile)]
    pub fn delete_file(&self, id: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .delete_file(id)
            .map(|_| ())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = renameFile)]
    pub fn rename_file(&self, id: &str, name: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .rename_file(id, name)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = renameProject)]
    pub fn rename_project(&self, name: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .rename_project(name)
            .map_err(js_error)
    }

    /// Recompose from the current files
    #[wasm_bindgen(js_name = refreshPreview)]
    pub fn refresh_preview(&self) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .refresh_preview()
            .map_err(js_error)
    }

    /// Re-run the last document
    #[wasm_bindgen(js_name = reloadPreview)]
    pub fn reload_preview(&self) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .reload_preview()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = consoleEntries)]
    pub fn console_entries(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().console().entries())
    }

    #[wasm_bindgen(js_name = clearConsole)]
    pub fn clear_console(&self) {
        self.session.borrow().console().clear();
    }

    pub fn transcript(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.borrow().transcript())
    }

    #[wasm_bindgen(js_name = isProcessing)]
    pub fn is_processing(&self) -> bool {
        self.session.borrow().is_processing()
    }

    /// Download the active file. Returns `false` when no file is active.
    #[wasm_bindgen(js_name = downloadActive)]
    pub fn download_active(&self) -> Result<bool, JsValue> {
        let Some(artifact) = self.session.borrow().export_active() else {
            return Ok(false);
        };
        trigger_download(&artifact)?;
        Ok(true)
    }

    /// Download the composed preview. Returns `false` without an HTML file.
    #[wasm_bindgen(js_name = downloadPreview)]
    pub fn download_preview(&self) -> Result<bool, JsValue> {
        let Some(artifact) = self.session.borrow().export_preview() else {
            return Ok(false);
        };
        trigger_download(&artifact)?;
        Ok(true)
    }

    /// Send an instruction to the assistant. Resolves to the reply text, or
    /// `undefined` for blank input. Rejects while another one is running.
    pub fn submit(&self, text: String) -> js_sys::Promise {
        let session = Rc::clone(&self.session);
        let delay_ms = self.processing_delay_ms;

        wasm_bindgen_futures::future_to_promise(async move {
            // No borrow is held across the delay
            let pending = session.borrow_mut().begin_instruction(&text).map_err(js_error)?;
            let Some(pending) = pending else {
                return Ok(JsValue::UNDEFINED);
            };

            TimeoutFuture::new(delay_ms).await;

            let outcome = session
                .borrow_mut()
                .complete_instruction(pending)
                .map_err(js_error)?;
            Ok(JsValue::from_str(&outcome.message))
        })
    }
}

impl Drop for Playground {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.previewer_mut().teardown();
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}
