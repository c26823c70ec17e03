//! Runtime settings persisted as `config.ron`, with command-line overrides.
//!
//! Every section uses `#[serde(default)]`, so a partial file fills in the rest
//! from defaults and unknown fields are ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AssetConfig, CONFIG_FILE_NAME, Config, DebugConfig, SceneConfig, WindowConfig};
pub use error::ConfigError;
