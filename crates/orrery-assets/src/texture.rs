//! Texture decoding to tightly packed RGBA8.
//!
//! DDS (BC1/BC2/BC3), PNG and JPEG are accepted. The format is detected from
//! the file contents, not the extension. Only the top mip level is kept.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use crate::error::AssetError;

const MAGENTA: [u8; 4] = [255, 0, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const PLACEHOLDER_SIZE: u32 = 8;
const PLACEHOLDER_CELL: u32 = 2;

/// Decoded pixels, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes of sRGB-encoded RGBA.
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Magenta and black checkerboard used in place of a missing texture.
    pub fn placeholder() -> Self {
        let mut rgba = Vec::with_capacity((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
        for y in 0..PLACEHOLDER_SIZE {
            for x in 0..PLACEHOLDER_SIZE {
                let cell = (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2;
                rgba.extend_from_slice(if cell == 0 { &MAGENTA } else { &BLACK });
            }
        }
        Self {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            rgba,
        }
    }

    /// Bytes per row of [`rgba`](Self::rgba).
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    fn from_image(image: image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }
}

/// Decodes an in-memory image.
pub fn decode_texture(bytes: &[u8], origin: &Path) -> Result<TextureData, AssetError> {
    let image_error = |source| AssetError::Image {
        path: origin.to_path_buf(),
        source,
    };
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| AssetError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
    let image = reader.decode().map_err(image_error)?;
    Ok(TextureData::from_image(image))
}

/// Reads and decodes an image file.
pub fn load_texture(path: &Path) -> Result<TextureData, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(&bytes, path)
}

/// Loads an image file, or logs a warning and returns the placeholder.
pub fn load_texture_or_placeholder(path: &Path) -> TextureData {
    match load_texture(path) {
        Ok(texture) => {
            tracing::debug!(
                path = %path.display(),
                width = texture.width,
                height = texture.height,
                "loaded texture"
            );
            texture
        }
        Err(err) => {
            tracing::warn!(error = %err, "using placeholder texture");
            TextureData::placeholder()
        }
    }
}
