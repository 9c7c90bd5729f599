use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::device::{Gpu, GpuFrame};

use super::tessellate::MeshVertex;

/// Smallest vertex buffer allocated, in vertices.
const MIN_VERTEX_CAPACITY: usize = 1024;

/// Draws one frame's triangle list in a single clear-then-draw pass.
///
/// The pipeline is built on first use and rebuilt if the surface format
/// changes. The vertex buffer only grows.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline: Option<MeshPipeline>,
    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
}

/// Everything tied to one surface format.
struct MeshPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    viewport_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `frame` to `clear` and draws `vertices` over it.
    ///
    /// `viewport` is the logical size the vertex positions are expressed in.
    pub fn render(
        &mut self,
        gpu: &Gpu,
        frame: &mut GpuFrame,
        clear: wgpu::Color,
        viewport: Vec2,
        vertices: &[MeshVertex],
    ) {
        let device = gpu.device();
        let queue = gpu.queue();

        if !vertices.is_empty() {
            self.prepare_pipeline(device, gpu.surface_format());
            self.reserve(device, vertices.len());
        }

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if vertices.is_empty() {
            return;
        }
        let (Some(mp), Some(vbo)) = (self.pipeline.as_ref(), self.vertex_vbo.as_ref()) else {
            return;
        };

        let uniform = ViewportUniform {
            size: viewport.max(Vec2::ONE).to_array(),
            _pad: [0.0; 2],
        };
        queue.write_buffer(&mp.viewport_ubo, 0, bytemuck::bytes_of(&uniform));
        queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        pass.set_pipeline(&mp.pipeline);
        pass.set_bind_group(0, &mp.bind_group, &[]);
        pass.set_vertex_buffer(0, vbo.slice(..));
        pass.draw(0..vertices.len() as u32, 0..1);
    }

    fn prepare_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline.as_ref().is_some_and(|p| p.format == format) {
            return;
        }
        log::debug!("building mesh pipeline for {format:?}");
        self.pipeline = Some(MeshPipeline::new(device, format));
    }

    fn reserve(&mut self, device: &wgpu::Device, vertices: usize) {
        if vertices <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }
        let capacity = vertices.next_power_of_two().max(MIN_VERTEX_CAPACITY);
        self.vertex_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel mesh vbo"),
            size: (capacity * std::mem::size_of::<MeshVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = capacity;
    }
}

impl MeshPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let uniform_size = std::mem::size_of::<ViewportUniform>() as u64;
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("easel viewport layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel viewport ubo"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel viewport bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel mesh pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("easel mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Negative scale mirrors winding.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            format,
            pipeline,
            viewport_ubo,
            bind_group,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}
