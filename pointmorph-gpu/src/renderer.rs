use crate::device::GpuContext;
use pointmorph_core::{
    normal_color, Error, FrameRenderer, Point3f, Result, Transform3D, Vector3f, UNSHADED_COLOR,
};
use nalgebra::Matrix4;
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Depth buffer format used by the point pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-point instance data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    /// Create vertex from Point3f with the given color
    pub fn from_point(point: &Point3f, color: [f32; 3]) -> Self {
        Self {
            position: [point.x, point.y, point.z],
            color,
        }
    }

    /// Vertex buffer layout descriptor; one entry per drawn point
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-frame uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _padding: f32,
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub point_size: f32,
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    /// Samples per pixel; 1 disables multisampling
    pub sample_count: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            background_color: [0.0, 0.0, 0.0, 1.0],
            enable_depth_test: true,
            sample_count: 4,
        }
    }
}

/// Point renderer presenting to a window surface
pub struct PointCloudRenderer {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub frame_uniform: FrameUniform,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub depth_view: wgpu::TextureView,
    /// Present only when multisampling
    pub msaa_view: Option<wgpu::TextureView>,
    pub config: RenderConfig,
    pending: Vec<PointVertex>,
}

impl PointCloudRenderer {
    /// Create new point cloud renderer
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let size = window.inner_size();
        let (gpu_context, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            // Frames are paced by vsync
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let frame_uniform = FrameUniform {
            view_proj: Matrix4::<f32>::identity().into(),
            model: Matrix4::<f32>::identity().into(),
            viewport: [surface_config.width as f32, surface_config.height as f32],
            point_size: config.point_size,
            _padding: 0.0,
        };

        let device = &gpu_context.device;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&frame_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("frame_bind_group_layout"),
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let shader = gpu_context
            .create_shader_module("Point Cloud Shader", include_str!("shaders/point_cloud.wgsl"));

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Cloud Render Pipeline Layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Cloud Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[PointVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: config.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let depth_view = gpu_context.create_depth_view(
            surface_config.width,
            surface_config.height,
            config.sample_count,
        );
        let msaa_view = Self::msaa_view(&gpu_context, &surface_config, config.sample_count);

        Ok(Self {
            gpu_context,
            surface,
            surface_config,
            render_pipeline,
            frame_uniform,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            msaa_view,
            config,
            pending: Vec::new(),
        })
    }

    /// Update the combined view-projection matrix
    pub fn update_camera(&mut self, view_proj: Matrix4<f32>) {
        self.frame_uniform.view_proj = view_proj.into();
    }

    /// Set the on-screen point size in pixels
    pub fn set_point_size(&mut self, point_size: f32) {
        self.config.point_size = point_size;
        self.frame_uniform.point_size = point_size;
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu_context.device, &self.surface_config);
            self.depth_view = self.gpu_context.create_depth_view(
                new_size.width,
                new_size.height,
                self.config.sample_count,
            );
            self.msaa_view =
                Self::msaa_view(&self.gpu_context, &self.surface_config, self.config.sample_count);
            self.frame_uniform.viewport = [new_size.width as f32, new_size.height as f32];
        }
    }

    fn msaa_view(
        gpu_context: &GpuContext,
        surface_config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<wgpu::TextureView> {
        (sample_count > 1).then(|| {
            gpu_context.create_msaa_view(
                surface_config.format,
                surface_config.width,
                surface_config.height,
                sample_count,
            )
        })
    }

    /// Render queued points and present
    fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.gpu_context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.frame_uniform),
        );

        let vertex_buffer = if self.pending.is_empty() {
            None
        } else {
            Some(self.gpu_context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Point Cloud Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.pending),
                usage: wgpu::BufferUsages::VERTEX,
            }))
        };

        let device = &self.gpu_context.device;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Cloud Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Cloud Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.msaa_view.as_ref().unwrap_or(&view),
                    resolve_target: self.msaa_view.as_ref().map(|_| &view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.config.background_color[0],
                            g: self.config.background_color[1],
                            b: self.config.background_color[2],
                            a: self.config.background_color[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: if self.config.enable_depth_test {
                    Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    })
                } else {
                    None
                },
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(vertex_buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.draw(0..6, 0..self.pending.len() as u32);
            }
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl FrameRenderer for PointCloudRenderer {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn set_model_transform(&mut self, transform: &Transform3D) {
        self.frame_uniform.model = transform.matrix.into();
    }

    fn draw_points(&mut self, positions: &[Point3f], normals: &[Vector3f]) {
        self.pending.extend(points_to_vertices(positions, normals));
    }

    fn end_frame(&mut self) -> Result<()> {
        self.render()
    }
}

/// Convert positions to render vertices coloured by their normals.
///
/// Positions past the end of `normals` are drawn in [`UNSHADED_COLOR`].
pub fn points_to_vertices(positions: &[Point3f], normals: &[Vector3f]) -> Vec<PointVertex> {
    positions
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let color = normals.get(i).map(normal_color).unwrap_or(UNSHADED_COLOR);
            PointVertex::from_point(point, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_colored_by_normal() {
        let positions = vec![Point3f::new(1.0, 2.0, 3.0), Point3f::new(-1.0, 0.0, 0.0)];
        let normals = vec![Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0)];

        let vertices = points_to_vertices(&positions, &normals);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].color, [0.5, 1.0, 0.5]);
        assert_eq!(vertices[1].color, [0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_missing_normals_are_unshaded() {
        let positions = vec![Point3f::origin(); 3];
        let normals = vec![Vector3f::new(0.0, 0.0, 1.0)];

        let vertices = points_to_vertices(&positions, &normals);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].color, [0.5, 0.5, 1.0]);
        assert_eq!(vertices[1].color, UNSHADED_COLOR);
        assert_eq!(vertices[2].color, UNSHADED_COLOR);
    }

    #[test]
    fn test_layouts_match_shader() {
        // mat4 + mat4 + vec2 + f32 + f32, a multiple of 16 for uniform alignment
        assert_eq!(std::mem::size_of::<FrameUniform>(), 144);
        assert_eq!(std::mem::size_of::<PointVertex>(), 24);
        assert_eq!(PointVertex::desc().array_stride, 24);
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.point_size, 2.0);
        assert!(config.enable_depth_test);
        assert_eq!(config.sample_count, 4);
    }
}
