//! Drawing primitives layer.
//!
//! - [`primitives`]: local-space geometry mapped through the transform stack
//! - [`Rasterizer`]: the device-space capability primitives delegate to
//! - [`Recorder`]: headless rasterizer that records calls

pub mod primitives;
mod rasterizer;
mod recorder;

pub use rasterizer::Rasterizer;
pub use recorder::{RasterCall, Recorder};
