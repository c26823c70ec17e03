use std::path::PathBuf;

/// Failure to load a mesh or texture file.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} contains no triangles")]
    Empty { path: PathBuf },

    #[error("{path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}
