//! Transform-aware drawing primitives.
//!
//! Each function maps local-space geometry through the top of the transform
//! stack and hands device-space geometry to the rasterizer. Nothing is retained
//! after the call returns.

use glam::Vec2;

use crate::error::RasterError;
use crate::paint::Color;
use crate::transform::TransformStack;

use super::Rasterizer;

pub fn line(
    stack: &TransformStack,
    raster: &mut dyn Rasterizer,
    start: Vec2,
    end: Vec2,
    color: Color,
) -> Result<(), RasterError> {
    raster.line(stack.transform_point(start), stack.transform_point(end), color)
}

/// Rectangle outline spanning `top_left`..`bottom_right` in local space.
pub fn rectangle(
    stack: &TransformStack,
    raster: &mut dyn Rasterizer,
    top_left: Vec2,
    bottom_right: Vec2,
    color: Color,
) -> Result<(), RasterError> {
    let quad = rect_corners(stack, top_left, bottom_right);
    raster.polygon(&quad, color)
}

pub fn fill_rectangle(
    stack: &TransformStack,
    raster: &mut dyn Rasterizer,
    top_left: Vec2,
    bottom_right: Vec2,
    color: Color,
) -> Result<(), RasterError> {
    let quad = rect_corners(stack, top_left, bottom_right);
    raster.fill_polygon(&quad, color)
}

/// Circle outline. Only the center is transformed; `radius` is passed through,
/// so scale and rotation never turn circles into ellipses.
pub fn circle(
    stack: &TransformStack,
    raster: &mut dyn Rasterizer,
    center: Vec2,
    radius: f32,
    color: Color,
) -> Result<(), RasterError> {
    raster.circle(stack.transform_point(center), radius, color)
}

/// Filled circle. Same radius rule as [`circle`].
pub fn fill_circle(
    stack: &TransformStack,
    raster: &mut dyn Rasterizer,
    center: Vec2,
    radius: f32,
    color: Color,
) -> Result<(), RasterError> {
    raster.fill_circle(stack.transform_point(center), radius, color)
}

/// All four corners, each transformed independently.
/// Order: top-left, top-right, bottom-right, bottom-left (local space).
fn rect_corners(stack: &TransformStack, top_left: Vec2, bottom_right: Vec2) -> [Vec2; 4] {
    [
        top_left,
        Vec2::new(bottom_right.x, top_left.y),
        bottom_right,
        Vec2::new(top_left.x, bottom_right.y),
    ]
    .map(|p| stack.transform_point(p))
}
