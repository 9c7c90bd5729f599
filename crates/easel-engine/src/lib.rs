//! Easel engine crate.
//!
//! A small immediate-mode 2D drawing scaffold: a transform stack, a fixed
//! interval update timer, transformed drawing primitives and an application
//! shell that drives a [`Sketch`] inside a window.
//!
//! Everything above [`draw::Rasterizer`] is platform independent and runs
//! headless; [`window::Runtime`] supplies the winit + wgpu backend.

pub mod core;
pub mod device;
pub mod draw;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod transform;
pub mod window;

pub use crate::core::{map, Engine, EngineConfig, Sketch};
pub use crate::error::{DrawError, EngineError, InitError, RasterError, TransformStackError};
pub use crate::paint::Color;
pub use glam::Vec2;
