//! Window + runtime loop.
//!
//! Owns the `winit` event loop and window, and drives an [`Engine`](crate::core::Engine)
//! with a GPU rasterizer bound to that window.

mod runtime;

pub use runtime::Runtime;
