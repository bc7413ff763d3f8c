//! Live preview: document composition, rendering and console relay

pub mod compose;
pub mod console;
pub mod render;

pub use compose::compose;
pub use console::{console_shim, format_console_args, ConsoleChannel, ConsoleCursor};
pub use render::{Previewer, RecordingTarget};
