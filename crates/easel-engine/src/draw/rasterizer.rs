use glam::Vec2;

use crate::error::RasterError;
use crate::paint::Color;

/// Rasterization capability consumed by the drawing primitives.
///
/// All coordinates are device space (logical pixels, top-left origin, +Y down);
/// the primitives layer has already applied the transform stack.
pub trait Rasterizer {
    /// Discards everything drawn so far this frame and fills the surface with `color`.
    fn clear(&mut self, color: Color) -> Result<(), RasterError>;

    /// Shows the frame.
    fn present(&mut self) -> Result<(), RasterError>;

    /// Anti-aliased 1px line.
    fn line(&mut self, start: Vec2, end: Vec2, color: Color) -> Result<(), RasterError>;

    /// Closed polygon outline.
    fn polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError>;

    /// Filled convex polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError>;

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError>;

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError>;

    /// Drawable size changed, in physical pixels.
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Releases platform resources. Called exactly once by the owning engine.
    fn release(&mut self) {}
}
