//! GPU rendering pass for the displacement crossfade.
//!
//! The fragment stage samples the displacement map, rotates the resulting
//! vector separately for each slot, scales it by the slot intensity and the
//! blend factor (or its complement), offsets each slot's sample coordinates,
//! and mixes the two distorted samples by the blend factor.

use crate::gpu::GpuContext;
use crate::material::MaterialState;
use crate::plane::{PlaneMesh, PlaneVertex, view_projection};
use crate::surface::SurfaceSize;

/// Uniforms for displacement rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DisplacementUniforms {
    pub view_projection: [[f32; 4]; 4],
    /// Logical width, logical height, aspect factor a1, aspect factor a2.
    pub res: [f32; 4],
    pub intensity1: f32,
    pub intensity2: f32,
    pub angle1: f32,
    pub angle2: f32,
    /// Blend factor: 0.0 shows slot A, 1.0 shows slot B.
    pub disp_factor: f32,
    /// Device scale factor.
    pub dpr: f32,
    /// Padding for 16-byte alignment.
    pub _pad: [f32; 2],
}

impl DisplacementUniforms {
    pub fn new(material: &MaterialState, size: SurfaceSize) -> Self {
        let width = size.logical_width();
        let height = size.logical_height();
        Self {
            view_projection: view_projection(width, height).to_cols_array_2d(),
            res: [width, height, material.aspect.a1, material.aspect.a2],
            intensity1: material.params.intensity1,
            intensity2: material.params.intensity2,
            angle1: material.params.angle1,
            angle2: material.params.angle2,
            disp_factor: material.blend,
            dpr: size.scale_factor,
            _pad: [0.0; 2],
        }
    }
}

/// Texture views bound for one frame.
pub struct SlotViews<'a> {
    pub displacement: &'a wgpu::TextureView,
    pub slot_a: &'a wgpu::TextureView,
    pub slot_b: &'a wgpu::TextureView,
}

/// GPU resources for the displacement shader material.
pub struct DisplacementPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    /// Uniforms + displacement map + two slot textures + sampler.
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl DisplacementPass {
    /// Create a new displacement pass with GPU resources.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Displacement Shader"),
            source: wgpu::ShaderSource::Wgsl(DISPLACEMENT_SHADER.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Displacement Uniforms"),
            size: std::mem::size_of::<DisplacementUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = crate::texture::linear_sampler(gpu);

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Displacement Bind Group Layout"),
            entries: &[
                // Uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Displacement map
                texture_entry(1),
                // Slot A
                texture_entry(2),
                // Slot B
                texture_entry(3),
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Displacement Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Displacement Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[PlaneVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group_layout,
            sampler,
        }
    }

    /// Clear `target` to transparent and draw the plane.
    pub fn render(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        plane: &PlaneMesh,
        views: SlotViews<'_>,
        uniforms: &DisplacementUniforms,
    ) {
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Displacement Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(views.displacement),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(views.slot_a),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(views.slot_b),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Displacement Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, plane.vertex_buffer.slice(..));
        pass.set_index_buffer(plane.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..plane.index_count, 0, 0..1);
    }
}

/// Displacement crossfade shader.
const DISPLACEMENT_SHADER: &str = r#"
struct Uniforms {
    view_projection: mat4x4<f32>,
    res: vec4f,
    intensity1: f32,
    intensity2: f32,
    angle1: f32,
    angle2: f32,
    disp_factor: f32,
    dpr: f32,
    _pad: vec2f,
}

@group(0) @binding(0) var<uniform> u: Uniforms;
@group(0) @binding(1) var disp_texture: texture_2d<f32>;
@group(0) @binding(2) var texture1: texture_2d<f32>;
@group(0) @binding(3) var texture2: texture_2d<f32>;
@group(0) @binding(4) var tex_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4f,
    @location(0) uv: vec2f,
}

@vertex
fn vs(@location(0) position: vec3f, @location(1) uv: vec2f) -> VertexOutput {
    var out: VertexOutput;
    out.position = u.view_projection * vec4f(position, 1.0);
    out.uv = uv;
    return out;
}

fn rotation(angle: f32) -> mat2x2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return mat2x2<f32>(c, -s, s, c);
}

@fragment
fn fs(v: VertexOutput) -> @location(0) vec4f {
    let disp = textureSample(disp_texture, tex_sampler, v.uv);
    let disp_vec = vec2f(disp.r, disp.g);

    // Cover-fit: frame position in logical pixels, then scaled around the center
    let uv = v.position.xy / (u.res.xy * u.dpr);
    let fitted = (uv - vec2f(0.5)) * u.res.zw + vec2f(0.5);

    let distorted1 = fitted + rotation(u.angle1) * disp_vec * u.intensity1 * u.disp_factor;
    let distorted2 = fitted + rotation(u.angle2) * disp_vec * u.intensity2 * (1.0 - u.disp_factor);
    let sample1 = textureSample(texture1, tex_sampler, distorted1);
    let sample2 = textureSample(texture2, tex_sampler, distorted2);

    return mix(sample1, sample2, u.disp_factor);
}
"#;
