//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Solar system explorer.
///
/// Every flag overrides the matching value from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Textured solar system with a free-fly camera")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Initial vertical field of view in degrees.
    #[arg(long)]
    pub fov: Option<f32>,

    /// Directory holding meshes and textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// WGSL file replacing the built-in body shader.
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Applies CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fov) = args.fov {
            self.camera.fov = fov;
        }
        if let Some(ref dir) = args.assets {
            self.assets.directory = dir.clone();
        }
        if let Some(ref shader) = args.shader {
            self.assets.shader = Some(shader.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            fov: Some(45.0),
            assets: Some(PathBuf::from("/opt/orrery")),
            shader: Some(PathBuf::from("flat.wgsl")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.assets.directory, PathBuf::from("/opt/orrery"));
        assert_eq!(config.assets.shader, Some(PathBuf::from("flat.wgsl")));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 768);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--height",
            "600",
            "--log-level",
            "debug",
            "--config",
            "cfg",
        ]);
        assert_eq!(args.height, Some(600));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("cfg")));
        assert!(args.width.is_none());
    }
}
