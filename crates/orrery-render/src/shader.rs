//! Shader module loading from embedded WGSL or a file on disk.

use log::{debug, info};
use std::{borrow::Cow, path::Path, path::PathBuf};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader '{name}' has no `fn {entry_point}`")]
    MissingEntryPoint { name: String, entry_point: String },

    #[error("shader '{name}' failed validation: {message}")]
    Compile { name: String, message: String },
}

/// Entry points every shader given to [`compile_shader`] must define.
pub const REQUIRED_ENTRY_POINTS: [&str; 2] = ["vs_main", "fs_main"];

/// Fails if `source` does not declare each of [`REQUIRED_ENTRY_POINTS`].
///
/// This is a textual check only. Full validation happens in
/// [`compile_shader`].
pub fn check_entry_points(name: &str, source: &str) -> Result<(), ShaderError> {
    for entry_point in REQUIRED_ENTRY_POINTS {
        let declared = source
            .match_indices("fn ")
            .filter_map(|(at, _)| source[at + 3..].trim_start().strip_prefix(entry_point))
            .any(|tail| tail.trim_start().starts_with('('));
        if !declared {
            return Err(ShaderError::MissingEntryPoint {
                name: name.to_string(),
                entry_point: entry_point.to_string(),
            });
        }
    }
    Ok(())
}

/// Reads WGSL from `path`.
pub fn read_shader_file(path: &Path) -> Result<String, ShaderError> {
    if !path.exists() {
        return Err(ShaderError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the override file if one is given, otherwise the built-in source.
pub fn resolve_source<'a>(
    builtin: &'a str,
    override_path: Option<&Path>,
) -> Result<Cow<'a, str>, ShaderError> {
    match override_path {
        Some(path) => {
            info!("Using shader override {}", path.display());
            Ok(Cow::Owned(read_shader_file(path)?))
        }
        None => Ok(Cow::Borrowed(builtin)),
    }
}

/// Runs `create` inside a validation error scope.
///
/// wgpu reports validation failures asynchronously. Without a scope they go
/// to the device's uncaptured-error handler, which panics by default.
pub fn capture_validation<T>(
    device: &wgpu::Device,
    create: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let error = pollster::block_on(scope.pop());
    (value, error)
}

/// Checks the entry points and compiles WGSL into a module.
pub fn compile_shader(
    device: &wgpu::Device,
    name: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    check_entry_points(name, source)?;
    debug!("Compiling shader '{name}'");

    let (module, error) = capture_validation(device, || {
        device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        })
    });
    if let Some(error) = error {
        return Err(ShaderError::Compile {
            name: name.to_string(),
            message: error.to_string(),
        });
    }
    info!("Loaded shader '{name}'");
    Ok(module)
}
