//! Port traits (interfaces) for dependency injection

pub mod render;
pub mod storage;

pub use render::RenderTarget;
pub use storage::KeyValueStore;
