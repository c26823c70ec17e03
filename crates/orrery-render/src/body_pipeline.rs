//! Lit, textured pipeline that draws every body.
//!
//! Bind groups:
//! - 0: [`FrameUniform`], shared by all bodies (vertex and fragment).
//! - 1: [`BodyUniform`], one per body (vertex).
//! - 2: diffuse texture and sampler from [`crate::TextureBinder`].

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_scene::{BodyTransform, ShadingMode};

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;
use crate::shader::{ShaderError, capture_validation};

/// Light power used to attenuate the specular shading mode by squared distance.
pub const FLASHLIGHT_POWER: f32 = 50_000.0;

/// Per-frame lighting inputs.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    /// World-space light position; `w` is unused.
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    pub camera_position: [f32; 4],
    /// 1 = ambient + diffuse, 2 = attenuated diffuse + specular.
    pub mode: u32,
    pub light_power: f32,
    pub _padding: [f32; 2],
}

impl FrameUniform {
    /// The light sits at the camera.
    pub fn new(camera_position: Vec3, light_color: Vec3, mode: ShadingMode) -> Self {
        Self {
            light_position: camera_position.extend(1.0).to_array(),
            light_color: light_color.extend(1.0).to_array(),
            camera_position: camera_position.extend(1.0).to_array(),
            mode: mode as u32,
            light_power: FLASHLIGHT_POWER,
            _padding: [0.0; 2],
        }
    }
}

/// Per-body transforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl BodyUniform {
    pub fn new(mvp: Mat4, model: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

impl From<&BodyTransform> for BodyUniform {
    fn from(transform: &BodyTransform) -> Self {
        Self::new(transform.mvp, transform.model)
    }
}

fn uniform_layout_entry(visibility: wgpu::ShaderStages, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub body_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// Builds the pipeline from a module exposing `vs_main` and `fs_main`.
    ///
    /// Back faces are culled, fronts wind counter-clockwise, and depth uses
    /// the reverse-Z state of [`DepthBuffer`]. A module whose bindings or
    /// vertex inputs do not match fails with [`ShaderError::Compile`].
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, ShaderError> {
        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame-bind-group-layout"),
                entries: &[uniform_layout_entry(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<FrameUniform>(),
                )],
            });
        let body_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-bind-group-layout"),
                entries: &[uniform_layout_entry(
                    wgpu::ShaderStages::VERTEX,
                    std::mem::size_of::<BodyUniform>(),
                )],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &body_bind_group_layout,
                texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let (pipeline, error) = capture_validation(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("body-pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[VertexPositionNormalUv::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(DepthBuffer::depth_stencil_state()),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        });
        if let Some(error) = error {
            return Err(ShaderError::Compile {
                name: "body-pipeline".to_string(),
                message: error.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            frame_bind_group_layout,
            body_bind_group_layout,
        })
    }
}

/// Built-in body shader.
///
/// Mode 1 adds a flat ambient term to unattenuated diffuse. Mode 2 divides
/// diffuse and a specular highlight by squared distance to the light, which
/// reads as a flashlight held at the camera.
pub const BODY_SHADER_SOURCE: &str = r#"
struct FrameUniform {
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    camera_position: vec4<f32>,
    mode: u32,
    light_power: f32,
    _padding: vec2<f32>,
};

struct BodyUniform {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> body: BodyUniform;

@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = body.mvp * vec4<f32>(in.position, 1.0);
    out.world_position = (body.model * vec4<f32>(in.position, 1.0)).xyz;
    // Bodies are scaled uniformly, so the model matrix keeps normals perpendicular.
    out.world_normal = (body.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(t_diffuse, s_diffuse, in.uv).rgb;
    let light = frame.light_color.rgb;

    let n = normalize(in.world_normal);
    let to_light = frame.light_position.xyz - in.world_position;
    let l = normalize(to_light);
    let cos_theta = clamp(dot(n, l), 0.0, 1.0);

    let ambient = 0.1 * albedo;
    var color = ambient + albedo * light * cos_theta;

    if (frame.mode == 2u) {
        let distance_sq = max(dot(to_light, to_light), 1e-4);
        let attenuation = frame.light_power / distance_sq;
        let e = normalize(frame.camera_position.xyz - in.world_position);
        let r = reflect(-l, n);
        let cos_alpha = clamp(dot(e, r), 0.0, 1.0);
        let specular = vec3<f32>(0.3, 0.3, 0.3);
        color = ambient
            + albedo * light * cos_theta * attenuation
            + specular * light * pow(cos_alpha, 5.0) * attenuation;
    }

    return vec4<f32>(color, 1.0);
}
"#;
