//! Every GPU resource the scene needs, and the per-frame draw.

use bytemuck::Zeroable;
use orrery_assets::{MeshData, TextureData};
use orrery_scene::BodyTransform;
use wgpu::util::DeviceExt;

use crate::body_pipeline::{BodyPipeline, BodyUniform, FrameUniform};
use crate::buffer::MeshBuffer;
use crate::depth::{DepthBuffer, MsaaTarget};
use crate::gpu::RenderContext;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::shader::ShaderError;
use crate::texture::{GpuTexture, TextureBinder, TextureError};

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// CPU-side assets for one body, already loaded or substituted.
pub struct BodyAssets {
    pub name: String,
    pub mesh: MeshData,
    pub texture: TextureData,
}

/// One body's GPU resources.
pub struct GpuBody {
    pub name: String,
    pub mesh: MeshBuffer,
    pub texture: GpuTexture,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Owns the pipeline, the render targets and every body's buffers.
///
/// Bodies are stored in the order they were given, which must match the
/// order of the transforms passed to [`prepare`](Self::prepare).
pub struct SceneRenderer {
    pipeline: BodyPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    bodies: Vec<GpuBody>,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
}

impl SceneRenderer {
    pub fn new(
        ctx: &RenderContext,
        shader: &wgpu::ShaderModule,
        assets: &[BodyAssets],
    ) -> Result<Self, RendererError> {
        let device = &ctx.device;
        let (width, height) = ctx.size();

        let textures = TextureBinder::new(device);
        let pipeline = BodyPipeline::new(
            device,
            shader,
            ctx.surface_format,
            ctx.sample_count,
            textures.layout(),
        )?;

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &pipeline.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let bodies = assets
            .iter()
            .map(|body| upload_body(ctx, &pipeline, &textures, body))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Uploaded {} bodies", bodies.len());

        Ok(Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            bodies,
            depth: DepthBuffer::new(device, width, height, ctx.sample_count),
            msaa: MsaaTarget::new(device, ctx.surface_format, width, height, ctx.sample_count),
        })
    }

    /// Resizes the depth and multisample targets.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, width, height);
        }
    }

    /// Writes this frame's uniforms.
    ///
    /// Extra transforms are ignored and missing ones leave the previous
    /// frame's value in place.
    pub fn prepare(&self, queue: &wgpu::Queue, frame: &FrameUniform, transforms: &[BodyTransform]) {
        if transforms.len() != self.bodies.len() {
            log::warn!(
                "{} transforms for {} bodies",
                transforms.len(),
                self.bodies.len()
            );
        }
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));
        for (body, transform) in self.bodies.iter().zip(transforms) {
            let uniform = BodyUniform::from(transform);
            queue.write_buffer(&body.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Records one draw per body into `render_pass`.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for body in &self.bodies {
            render_pass.set_bind_group(1, &body.bind_group, &[]);
            render_pass.set_bind_group(2, &body.texture.bind_group, &[]);
            body.mesh.draw(render_pass);
        }
    }

    /// Clears, draws every body into `frame` and presents it.
    pub fn render(&self, ctx: &RenderContext, frame: wgpu::SurfaceTexture) {
        let mut builder = RenderPassBuilder::new()
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("body-pass");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa(msaa.view.clone());
        }

        let mut encoder = FrameEncoder::new(&ctx.device, frame);
        {
            let mut pass = encoder.begin_render_pass(&builder);
            self.draw(&mut pass);
        }
        encoder.submit(&ctx.queue);
    }

    pub fn bodies(&self) -> &[GpuBody] {
        &self.bodies
    }
}

fn upload_body(
    ctx: &RenderContext,
    pipeline: &BodyPipeline,
    textures: &TextureBinder,
    body: &BodyAssets,
) -> Result<GpuBody, TextureError> {
    let device = &ctx.device;
    let mesh = MeshBuffer::from_mesh(device, &body.name, &body.mesh);
    let texture = match textures.upload(device, &ctx.queue, &body.name, &body.texture) {
        Ok(texture) => texture,
        Err(err) => {
            log::warn!("Texture for '{}' rejected ({err}), using placeholder", body.name);
            textures.upload(device, &ctx.queue, &body.name, &TextureData::placeholder())?
        }
    };

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{}-uniform", body.name)),
        contents: bytemuck::bytes_of(&BodyUniform::zeroed()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{}-bind-group", body.name)),
        layout: &pipeline.body_bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    log::debug!(
        "Body '{}': {} vertices, {}x{} texture",
        body.name,
        mesh.vertex_count,
        body.texture.width,
        body.texture.height
    );
    Ok(GpuBody {
        name: body.name.clone(),
        mesh,
        texture,
        uniform_buffer,
        bind_group,
    })
}
