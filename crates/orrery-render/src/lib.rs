//! GPU side of the orrery: device setup, render targets, the body pipeline
//! and the per-frame draw.

pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod renderer;
pub mod shader;
pub mod surface;
pub mod texture;

pub use body_pipeline::{
    BODY_SHADER_SOURCE, BodyPipeline, BodyUniform, FLASHLIGHT_POWER, FrameUniform,
};
pub use buffer::{MeshBuffer, VertexPositionNormalUv, interleave};
pub use depth::{DepthBuffer, MsaaTarget};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    select_preferred_srgb_format, select_present_mode, select_sample_count,
};
pub use pass::{BLACK, FrameEncoder, RenderPassBuilder};
pub use renderer::{BodyAssets, GpuBody, RendererError, SceneRenderer};
pub use shader::{
    REQUIRED_ENTRY_POINTS, ShaderError, capture_validation, check_entry_points, compile_shader,
    read_shader_file, resolve_source,
};
pub use surface::{MIN_SURFACE_DIMENSION, SurfaceSize};
pub use texture::{GpuTexture, TextureBinder, TextureError, validate_rgba};
