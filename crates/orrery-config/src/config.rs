//! Configuration sections, their defaults and RON persistence.

use std::path::{Path, PathBuf};

use orrery_scene::{BodyDescriptor, CameraSettings, default_solar_system};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Initial camera pose and tuning.
    pub camera: CameraSettings,
    pub assets: AssetConfig,
    pub debug: DebugConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Inner width in physical pixels.
    pub width: u32,
    /// Inner height in physical pixels.
    pub height: u32,
    pub title: String,
    /// Present with `Fifo` when set, otherwise prefer `Mailbox`/`Immediate`.
    pub vsync: bool,
    /// Requested MSAA samples (1, 2, 4 or 8). Lowered at startup if the GPU
    /// does not support it.
    pub msaa_samples: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Space Explorer".to_string(),
            vsync: true,
            msaa_samples: 4,
        }
    }
}

/// Where meshes, textures and the optional shader override live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset directory. Relative paths resolve against the working directory.
    pub directory: PathBuf,
    /// WGSL file replacing the built-in body shader.
    pub shader: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            shader: None,
        }
    }
}

impl AssetConfig {
    /// Resolves a file name against [`directory`](Self::directory).
    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        self.directory.join(file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// `EnvFilter` directive string, e.g. `"info,wgpu=warn"`.
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info,wgpu=warn,naga=warn".to_string(),
        }
    }
}

/// The bodies to draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub bodies: Vec<BodyDescriptor>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bodies: default_solar_system(),
        }
    }
}

impl Config {
    /// Loads `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist.
    ///
    /// The result is not validated, so command-line overrides can still fix
    /// a bad stored value. Call [`Config::validate`] once they are applied.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            config
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            config
        };
        Ok(config)
    }

    /// Writes the config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Rejects values that would produce a degenerate surface or NaN rotation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            )));
        }
        if ![1, 2, 4, 8].contains(&self.window.msaa_samples) {
            return Err(ConfigError::Invalid(format!(
                "msaa_samples must be 1, 2, 4 or 8, got {}",
                self.window.msaa_samples
            )));
        }
        let near = self.camera.near;
        let far = self.camera.far;
        if !(near > 0.0 && far > near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip range near={near} far={far} must satisfy 0 < near < far"
            )));
        }
        for body in &self.scene.bodies {
            if !body.period_days.is_finite() || body.period_days == 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "body '{}' has rotation period {}",
                    body.name, body.period_days
                )));
            }
            if !(body.scale.is_finite() && body.scale > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "body '{}' has scale {}",
                    body.name, body.scale
                )));
            }
        }
        if self.scene.bodies.is_empty() {
            log::warn!("Scene has no bodies, only the background will be drawn");
        }
        Ok(())
    }
}
