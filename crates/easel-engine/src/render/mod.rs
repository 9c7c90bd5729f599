//! GPU rendering subsystem.
//!
//! Rasterizer calls are tessellated into a per-frame triangle mesh on the CPU
//! and drawn with a single wgpu pipeline at present time.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod gpu_rasterizer;
mod mesh;
pub mod tessellate;

pub use gpu_rasterizer::GpuRasterizer;
pub use mesh::MeshRenderer;
