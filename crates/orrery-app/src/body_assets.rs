//! Resolves each body's mesh and texture files and loads them.

use orrery_assets::{load_mesh_or_fallback, load_texture_or_placeholder};
use orrery_config::AssetConfig;
use orrery_render::BodyAssets;
use orrery_scene::BodyDescriptor;
use tracing::info;

/// Loads assets for every body, in descriptor order.
///
/// Each body gets its own copy even when files repeat. Missing files are
/// replaced with stand-ins, so this never fails.
pub fn load_body_assets(assets: &AssetConfig, bodies: &[BodyDescriptor]) -> Vec<BodyAssets> {
    bodies
        .iter()
        .map(|body| {
            let mesh = load_mesh_or_fallback(&assets.resolve(&body.mesh));
            let texture = load_texture_or_placeholder(&assets.resolve(&body.texture));
            info!(
                body = %body.name,
                vertices = mesh.vertex_count(),
                texture = %format!("{}x{}", texture.width, texture.height),
                "body assets ready"
            );
            BodyAssets {
                name: body.name.clone(),
                mesh,
                texture,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_assets::TextureData;
    use orrery_scene::default_solar_system;

    const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn test_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AssetConfig {
            directory: dir.path().to_path_buf(),
            shader: None,
        };
        let loaded = load_body_assets(&config, &default_solar_system());
        assert_eq!(loaded.len(), 6);
        assert_eq!(loaded[0].name, "sun");
        for body in &loaded {
            assert!(!body.mesh.is_empty());
            assert_eq!(body.texture, TextureData::placeholder());
        }
    }

    #[test]
    fn test_mesh_loaded_from_asset_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tri.obj"), TRIANGLE_OBJ).unwrap();
        let config = AssetConfig {
            directory: dir.path().to_path_buf(),
            shader: None,
        };
        let mut body = default_solar_system().remove(1);
        body.mesh = "tri.obj".to_string();
        let loaded = load_body_assets(&config, &[body]);
        assert_eq!(loaded[0].mesh.vertex_count(), 3);
    }

    #[test]
    fn test_empty_scene_loads_nothing() {
        let loaded = load_body_assets(&AssetConfig::default(), &[]);
        assert!(loaded.is_empty());
    }
}
