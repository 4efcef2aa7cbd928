//! Instanced wgpu render pipeline
//!
//! Three batches share one pipeline: the ball (circle fan, 1 instance), the
//! paddles (quad, 2 instances) and the center-line dashes (quad, static).
//! Geometry is uploaded once; only the instance buffers change per frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;

use super::shapes::{self, Mesh};
use super::vertex::{Instance, Vertex, colors};
use crate::config::GameConfig;
use crate::consts::BALL_SEGMENTS;
use crate::error::{InitError, RenderError};
use crate::frame::{Entity, Renderer};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    projection: [[f32; 4]; 4],
    color: [f32; 4],
}

/// Pixel-space orthographic projection, origin bottom-left
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, 0.0, height, -1.0, 1.0)
}

/// One mesh drawn many times
struct MeshBatch {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    capacity: u32,
    /// Size every instance of this batch is drawn at
    size: Vec2,
}

impl MeshBatch {
    fn new(device: &wgpu::Device, label: &str, mesh: &Mesh, size: Vec2, capacity: u32) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}_instances")),
            size: (std::mem::size_of::<Instance>() * capacity as usize) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            instance_buffer,
            instance_count: 0,
            capacity,
            size,
        }
    }

    fn write_positions(&mut self, queue: &wgpu::Queue, positions: &[Vec2]) {
        let instances: Vec<Instance> = positions
            .iter()
            .take(self.capacity as usize)
            .map(|p| Instance {
                offset: p.to_array(),
                size: self.size.to_array(),
            })
            .collect();
        if instances.len() < positions.len() {
            log::warn!(
                "Dropping {} instances over batch capacity {}",
                positions.len() - instances.len(),
                self.capacity
            );
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

/// Main render state
pub struct InstancedRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ball: MeshBatch,
    paddles: MeshBatch,
    center_line: MeshBatch,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl InstancedRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        game: &GameConfig,
    ) -> Result<Self, InitError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("duel-pong-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| InitError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| InitError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("instanced_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("instanced.wgsl").into()),
        });

        let globals = Globals {
            projection: screen_projection(game.screen_width, game.screen_height).to_cols_array_2d(),
            color: colors::FOREGROUND,
        };
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&globals),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), Instance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let dash_count = shapes::center_line_offsets(game).len() as u32;
        let ball_size = Vec2::splat(game.ball_radius * 2.0);
        let paddle_size = Vec2::new(game.paddle_width, game.paddle_height);

        let ball = MeshBatch::new(&device, "ball", &shapes::circle(BALL_SEGMENTS), ball_size, 1);
        let paddles = MeshBatch::new(&device, "paddles", &shapes::quad(), paddle_size, 2);
        let center_line =
            MeshBatch::new(&device, "center_line", &shapes::quad(), game.dash_size, dash_count);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group,
            ball,
            paddles,
            center_line,
            size: (width, height),
        })
    }

    /// Reconfigure after the surface was lost or outdated
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size;
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

impl Renderer for InstancedRenderer {
    fn update_instance_positions(&mut self, entity: Entity, positions: &[Vec2]) {
        let batch = match entity {
            Entity::Ball => &mut self.ball,
            Entity::Paddles => &mut self.paddles,
            Entity::CenterLine => &mut self.center_line,
        };
        batch.write_positions(&self.queue, positions);
    }

    fn draw_frame(&mut self) -> Result<(), RenderError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            self.ball.draw(&mut render_pass);
            self.paddles.draw(&mut render_pass);
            self.center_line.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
