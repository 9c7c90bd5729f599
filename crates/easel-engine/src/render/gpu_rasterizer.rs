use std::sync::Arc;

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::draw::Rasterizer;
use crate::error::{RasterError, RasterOp};
use crate::paint::Color;

use super::mesh::MeshRenderer;
use super::tessellate::Mesh;

/// [`Rasterizer`] that tessellates on the CPU and draws the frame on present.
///
/// Draw calls only append triangles; nothing reaches the GPU until `present`,
/// which clears the surface and draws the accumulated mesh in one pass.
pub struct GpuRasterizer {
    window: Arc<Window>,
    gpu: Option<Gpu>,
    mesh: Mesh,
    renderer: MeshRenderer,
    clear_color: Color,
}

impl GpuRasterizer {
    pub fn new(window: Arc<Window>, gpu: Gpu) -> Self {
        Self {
            window,
            gpu: Some(gpu),
            mesh: Mesh::new(),
            renderer: MeshRenderer::new(),
            clear_color: Color::BLACK,
        }
    }

    fn gpu_mut(&mut self, op: RasterOp) -> Result<&mut Gpu, RasterError> {
        self.gpu
            .as_mut()
            .ok_or_else(|| RasterError::backend(op, "GPU resources were released"))
    }

    fn logical_viewport(&self, size: PhysicalSize<u32>) -> Vec2 {
        let logical = size.to_logical::<f32>(self.window.scale_factor());
        Vec2::new(logical.width, logical.height)
    }
}

impl Rasterizer for GpuRasterizer {
    fn clear(&mut self, color: Color) -> Result<(), RasterError> {
        self.mesh.clear();
        self.clear_color = color;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RasterError> {
        let clear = self.clear_color.to_linear_premul();
        let size = self.gpu_mut(RasterOp::Present)?.size();
        if size.width == 0 || size.height == 0 {
            self.mesh.clear();
            return Ok(());
        }
        let viewport = self.logical_viewport(size);

        let Some(gpu) = self.gpu.as_mut() else {
            return Err(RasterError::backend(RasterOp::Present, "GPU resources were released"));
        };

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                self.mesh.clear();
                let reason = err.to_string();
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured => {
                        log::warn!("surface lost or outdated, reconfigured; skipping frame");
                        Ok(())
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("surface acquire failed ({reason}); skipping frame");
                        Ok(())
                    }
                    SurfaceErrorAction::Fatal => Err(RasterError::Surface(reason)),
                };
            }
        };

        let clear = wgpu::Color {
            r: f64::from(clear[0]),
            g: f64::from(clear[1]),
            b: f64::from(clear[2]),
            a: f64::from(clear[3]),
        };
        self.renderer
            .render(gpu, &mut frame, clear, viewport, self.mesh.vertices());

        self.window.pre_present_notify();
        gpu.submit(frame);
        self.mesh.clear();
        Ok(())
    }

    fn line(&mut self, start: Vec2, end: Vec2, color: Color) -> Result<(), RasterError> {
        self.mesh
            .line(start, end, color.to_linear_premul())
            .map_err(|reason| RasterError::InvalidGeometry { op: RasterOp::Line, reason })
    }

    fn polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError> {
        self.mesh
            .polygon(points, color.to_linear_premul())
            .map_err(|reason| RasterError::InvalidGeometry { op: RasterOp::Polygon, reason })
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError> {
        self.mesh
            .fill_polygon(points, color.to_linear_premul())
            .map_err(|reason| RasterError::InvalidGeometry {
                op: RasterOp::FillPolygon,
                reason,
            })
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError> {
        self.mesh
            .circle(center, radius, color.to_linear_premul())
            .map_err(|reason| RasterError::InvalidGeometry { op: RasterOp::Circle, reason })
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError> {
        self.mesh
            .fill_circle(center, radius, color.to_linear_premul())
            .map_err(|reason| RasterError::InvalidGeometry {
                op: RasterOp::FillCircle,
                reason,
            })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(PhysicalSize::new(width, height));
        }
    }

    fn release(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!("GPU resources released");
        }
        self.mesh.clear();
    }
}
