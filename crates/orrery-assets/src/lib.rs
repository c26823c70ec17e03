//! Mesh and texture loading.
//!
//! Loaders return CPU-side data only; uploading is the renderer's job.
//! The `*_or_fallback` variants never fail: a missing or broken file is
//! logged and replaced with a stand-in that is obvious on screen.

mod error;
pub mod mesh;
pub mod texture;

pub use error::AssetError;
pub use mesh::{MeshData, load_mesh_or_fallback, load_obj, parse_obj, uv_sphere};
pub use texture::{TextureData, decode_texture, load_texture, load_texture_or_placeholder};
