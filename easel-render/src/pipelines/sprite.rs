//! Sprite pipeline: one textured, tinted quad per draw.
//!
//! Shared state (shader, bind group layouts, sampler, unit quad) lives in
//! [`SpriteResources`], created once per [`GpuContext`]. A
//! [`SpritePipeline`] exists per target format: one for offscreen RGBA
//! textures and one per window surface.

use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites, CommandEncoderDescriptor,
    Device, FilterMode, FragmentState, FrontFace, IndexFormat, LoadOp, MultisampleState,
    Operations, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode, PrimitiveState,
    PrimitiveTopology, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor, ShaderModule,
    ShaderModuleDescriptor, ShaderStages, StoreOp, TextureFormat, TextureSampleType, TextureView,
    TextureViewDimension, VertexState,
};

use crate::context::GpuContext;
use crate::vertex::{CameraUniform, QuadVertex, SpriteInstance};

/// Pipeline-independent sprite state.
pub struct SpriteResources {
    shader: ShaderModule,
    camera_bgl: BindGroupLayout,
    sprite_bgl: BindGroupLayout,
    sampler: Sampler,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
}

impl SpriteResources {
    pub fn new(device: &Device) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sprite.wgsl").into()),
        });

        // ── Camera bind group layout (group 0) ──────────────────
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sprite_camera_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Texture bind group layout (group 1) ─────────────────
        let sprite_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sprite_texture_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Nearest filtering keeps pixel-aligned copies exact.
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("sprite_quad_vb"),
            contents: bytemuck::cast_slice(&QuadVertex::VERTICES),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("sprite_quad_ib"),
            contents: bytemuck::cast_slice(&QuadVertex::INDICES),
            usage: BufferUsages::INDEX,
        });

        Self {
            shader,
            camera_bgl,
            sprite_bgl,
            sampler,
            vertex_buffer,
            index_buffer,
        }
    }
}

/// A texture view paired with the sprite sampler, ready to be sampled.
pub struct SpriteBinding {
    bind_group: BindGroup,
}

impl SpriteBinding {
    pub fn new(device: &Device, resources: &SpriteResources, view: &TextureView) -> Self {
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite_texture_bg"),
            layout: &resources.sprite_bgl,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&resources.sampler),
                },
            ],
        });
        Self { bind_group }
    }
}

/// Where a sprite is drawn.
#[derive(Clone, Copy)]
pub struct SpriteTarget<'a> {
    pub view: &'a TextureView,
    pub width: u32,
    pub height: u32,
}

/// Render pipeline for one target format.
pub struct SpritePipeline {
    pipeline: RenderPipeline,
    format: TextureFormat,
}

impl SpritePipeline {
    pub fn new(device: &Device, resources: &SpriteResources, format: TextureFormat) -> Self {
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&resources.camera_bgl, &resources.sprite_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&layout),
            vertex: VertexState {
                module: &resources.shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
            },
            fragment: Some(FragmentState {
                module: &resources.shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!("Sprite pipeline created for {:?}", format);
        Self { pipeline, format }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Draw one sprite onto `target` and submit.
    ///
    /// `load` decides what happens to the target first: `LoadOp::Load`
    /// blends over the existing pixels, `LoadOp::Clear` replaces them.
    pub fn draw(
        &self,
        ctx: &GpuContext,
        target: SpriteTarget<'_>,
        sprite: &SpriteBinding,
        instance: SpriteInstance,
        load: LoadOp<wgpu::Color>,
    ) {
        let resources = ctx.sprites();
        let device = &ctx.device;

        let camera = CameraUniform::target(target.width, target.height);
        let camera_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("sprite_camera_ub"),
            contents: bytemuck::bytes_of(&camera),
            usage: BufferUsages::UNIFORM,
        });
        let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite_camera_bg"),
            layout: &resources.camera_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let instance_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("sprite_instance"),
            contents: bytemuck::bytes_of(&instance),
            usage: BufferUsages::VERTEX,
        });

        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("sprite_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target.view,
                    resolve_target: None,
                    ops: Operations {
                        load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &camera_bind_group, &[]);
            pass.set_bind_group(1, &sprite.bind_group, &[]);
            pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, instance_buffer.slice(..));
            pass.set_index_buffer(resources.index_buffer.slice(..), IndexFormat::Uint16);
            pass.draw_indexed(0..QuadVertex::INDICES.len() as u32, 0, 0..1);
        }
        ctx.queue.submit(Some(encoder.finish()));
    }
}

/// Clear `target` to `color` without drawing anything.
pub fn clear(ctx: &GpuContext, target: &TextureView, color: wgpu::Color) {
    let mut encoder = ctx.device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("clear_encoder"),
    });
    {
        let _pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("clear_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }
    ctx.queue.submit(Some(encoder.finish()));
}
