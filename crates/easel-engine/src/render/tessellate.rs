//! CPU tessellation of rasterizer calls into colored triangles.
//!
//! Output is a non-indexed triangle list in logical pixels. Lines carry a
//! transparent outer fringe so the GPU's linear color interpolation gives them
//! a one-pixel anti-aliased edge.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Core line width in logical pixels.
const LINE_WIDTH: f32 = 1.0;
/// Width of the fade-out band on each side of a line.
const LINE_FRINGE: f32 = 1.0;

const MIN_CIRCLE_SEGMENTS: u32 = 12;
const MAX_CIRCLE_SEGMENTS: u32 = 256;
/// Target arc length per circle segment, in logical pixels.
const CIRCLE_SEGMENT_LEN: f32 = 4.0;

/// Vertex layout (24 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  color  [f32; 4]   loc 1  (linear, premultiplied)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    #[inline]
    fn new(pos: Vec2, color: [f32; 4]) -> Self {
        Self { pos: pos.to_array(), color }
    }

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangles accumulated for one frame.
#[derive(Debug, Default)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all triangles, keeping capacity.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    #[inline]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Anti-aliased line. A zero-length line produces nothing.
    pub fn line(&mut self, start: Vec2, end: Vec2, color: [f32; 4]) -> Result<(), &'static str> {
        ensure_finite(&[start, end])?;

        let d = end - start;
        let len = d.length();
        if len <= f32::EPSILON {
            return Ok(());
        }

        let n = d.perp() / len;
        let inner = n * (LINE_WIDTH * 0.5);
        let outer = n * (LINE_WIDTH * 0.5 + LINE_FRINGE);
        let clear = [0.0; 4];

        self.quad(
            [start + inner, end + inner, end - inner, start - inner],
            [color, color, color, color],
        );
        self.quad(
            [start + outer, end + outer, end + inner, start + inner],
            [clear, clear, color, color],
        );
        self.quad(
            [start - inner, end - inner, end - outer, start - outer],
            [color, color, clear, clear],
        );
        Ok(())
    }

    /// Closed outline through `points`.
    pub fn polygon(&mut self, points: &[Vec2], color: [f32; 4]) -> Result<(), &'static str> {
        if points.len() < 2 {
            return Err("polygon outline needs at least 2 points");
        }
        ensure_finite(points)?;

        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(a, b, color)?;
        }
        Ok(())
    }

    /// Filled convex polygon, triangulated as a fan around the first point.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) -> Result<(), &'static str> {
        if points.len() < 3 {
            return Err("filled polygon needs at least 3 points");
        }
        ensure_finite(points)?;

        let p0 = points[0];
        for pair in points[1..].windows(2) {
            self.triangle([p0, pair[0], pair[1]], color);
        }
        Ok(())
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) -> Result<(), &'static str> {
        ensure_circle(center, radius)?;
        if radius == 0.0 {
            return Ok(());
        }

        let rim = circle_points(center, radius);
        self.polygon(&rim, color)
    }

    pub fn fill_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    ) -> Result<(), &'static str> {
        ensure_circle(center, radius)?;
        if radius == 0.0 {
            return Ok(());
        }

        let rim = circle_points(center, radius);
        for (i, &a) in rim.iter().enumerate() {
            let b = rim[(i + 1) % rim.len()];
            self.triangle([center, a, b], color);
        }
        Ok(())
    }

    fn triangle(&mut self, p: [Vec2; 3], color: [f32; 4]) {
        self.vertices.extend(p.map(|p| MeshVertex::new(p, color)));
    }

    /// Two triangles: (0, 1, 2) and (0, 2, 3).
    fn quad(&mut self, p: [Vec2; 4], c: [[f32; 4]; 4]) {
        for i in [0, 1, 2, 0, 2, 3] {
            self.vertices.push(MeshVertex::new(p[i], c[i]));
        }
    }
}

/// Segment count for a circle of `radius` logical pixels.
pub fn circle_segments(radius: f32) -> u32 {
    let n = (TAU * radius / CIRCLE_SEGMENT_LEN).ceil();
    if n.is_finite() {
        (n as u32).clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
    } else {
        MAX_CIRCLE_SEGMENTS
    }
}

fn circle_points(center: Vec2, radius: f32) -> Vec<Vec2> {
    let n = circle_segments(radius);
    (0..n)
        .map(|i| {
            let theta = TAU * i as f32 / n as f32;
            center + Vec2::from_angle(theta) * radius
        })
        .collect()
}

fn ensure_finite(points: &[Vec2]) -> Result<(), &'static str> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err("non-finite coordinate")
    }
}

fn ensure_circle(center: Vec2, radius: f32) -> Result<(), &'static str> {
    ensure_finite(&[center])?;
    if !radius.is_finite() || radius < 0.0 {
        return Err("radius must be finite and non-negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    // ── lines ─────────────────────────────────────────────────────────────

    #[test]
    fn line_is_core_quad_plus_two_fringes() {
        let mut mesh = Mesh::new();
        mesh.line(Vec2::ZERO, Vec2::new(10.0, 0.0), WHITE).unwrap();
        assert_eq!(mesh.triangle_count(), 6);

        let opaque: Vec<_> = mesh.vertices().iter().filter(|v| v.color == WHITE).collect();
        assert!(opaque.iter().all(|v| v.pos[1].abs() <= 0.5 + 1e-6));

        let faded: Vec<_> = mesh.vertices().iter().filter(|v| v.color == [0.0; 4]).collect();
        assert!(!faded.is_empty());
        assert!(faded.iter().all(|v| (v.pos[1].abs() - 1.5).abs() < 1e-6));
    }

    #[test]
    fn zero_length_line_is_empty() {
        let mut mesh = Mesh::new();
        mesh.line(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), WHITE).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn non_finite_line_is_rejected() {
        let mut mesh = Mesh::new();
        assert!(mesh.line(Vec2::new(f32::NAN, 0.0), Vec2::ONE, WHITE).is_err());
        assert!(mesh.is_empty());
    }

    // ── polygons ──────────────────────────────────────────────────────────

    #[test]
    fn quad_fill_is_two_triangles() {
        let mut mesh = Mesh::new();
        let quad = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        mesh.fill_polygon(&quad, WHITE).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices()[0].pos, [0.0, 0.0]);
        assert_eq!(mesh.vertices()[3].pos, [0.0, 0.0]);
    }

    #[test]
    fn fill_needs_three_points() {
        let mut mesh = Mesh::new();
        assert!(mesh.fill_polygon(&[Vec2::ZERO, Vec2::ONE], WHITE).is_err());
    }

    #[test]
    fn outline_closes_the_loop() {
        let mut mesh = Mesh::new();
        let tri = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        mesh.polygon(&tri, WHITE).unwrap();
        // Three edges, six triangles each.
        assert_eq!(mesh.triangle_count(), 18);
    }

    // ── circles ───────────────────────────────────────────────────────────

    #[test]
    fn segment_count_is_clamped() {
        assert_eq!(circle_segments(0.1), 12);
        assert_eq!(circle_segments(40.0), 63);
        assert_eq!(circle_segments(1.0e6), 256);
    }

    #[test]
    fn filled_circle_stays_inside_radius() {
        let mut mesh = Mesh::new();
        let center = Vec2::new(50.0, 50.0);
        mesh.fill_circle(center, 20.0, WHITE).unwrap();

        assert_eq!(mesh.triangle_count() as u32, circle_segments(20.0));
        for v in mesh.vertices() {
            assert!(Vec2::from(v.pos).distance(center) <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn circle_outline_is_one_line_per_segment() {
        let mut mesh = Mesh::new();
        mesh.circle(Vec2::ZERO, 5.0, WHITE).unwrap();
        assert_eq!(mesh.triangle_count() as u32, circle_segments(5.0) * 6);
    }

    #[test]
    fn zero_radius_draws_nothing_and_negative_is_rejected() {
        let mut mesh = Mesh::new();
        mesh.fill_circle(Vec2::ZERO, 0.0, WHITE).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.circle(Vec2::ZERO, -1.0, WHITE).is_err());
    }
}
