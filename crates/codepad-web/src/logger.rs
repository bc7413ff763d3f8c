//! Browser logging
//!
//! Core crates log through `tracing`; with its `log` feature and no
//! subscriber installed, those events are forwarded to `log`, which
//! `wasm-logger` writes to the developer console.

pub fn init() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}
