//! GPU device + surface management.
//!
//! Creates the wgpu device and queue, configures the window surface and
//! hands out per-frame encoders.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
