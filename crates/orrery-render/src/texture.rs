//! Diffuse textures: upload and bind group creation.

use orrery_assets::TextureData;

/// Texture upload failures.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max_dimension}")]
    TooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
    },
}

/// Checks that `data` holds exactly `width * height` RGBA8 texels and that
/// neither side exceeds `max_dimension`.
pub fn validate_rgba(data: &TextureData, max_dimension: u32) -> Result<(), TextureError> {
    if data.width == 0 || data.height == 0 {
        return Err(TextureError::ZeroDimensions {
            width: data.width,
            height: data.height,
        });
    }
    if data.width > max_dimension || data.height > max_dimension {
        return Err(TextureError::TooLarge {
            width: data.width,
            height: data.height,
            max_dimension,
        });
    }
    let expected = data.width as usize * data.height as usize * 4;
    if data.rgba.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.rgba.len(),
            expected,
            width: data.width,
            height: data.height,
        });
    }
    Ok(())
}

/// A sampled texture with its bind group (group 2 of the body pipeline).
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
}

/// Owns the sampler and layout every diffuse texture binds with.
pub struct TextureBinder {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl TextureBinder {
    /// Stored texel format. Decoded images are sRGB.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("diffuse-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("diffuse-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self { layout, sampler }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Uploads `data` and builds its bind group.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &TextureData,
    ) -> Result<GpuTexture, TextureError> {
        validate_rgba(data, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_row()),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bind-group")),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        log::info!("Uploaded texture '{name}' ({}x{})", data.width, data.height);
        Ok(GpuTexture {
            texture,
            view,
            bind_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_MAX: u32 = 8192;

    #[test]
    fn test_placeholder_is_valid() {
        assert!(validate_rgba(&TextureData::placeholder(), DEFAULT_MAX).is_ok());
    }

    #[test]
    fn test_oversized_texture_rejected() {
        let data = TextureData {
            width: 9000,
            height: 1,
            rgba: vec![0; 9000 * 4],
        };
        assert!(matches!(
            validate_rgba(&data, DEFAULT_MAX),
            Err(TextureError::TooLarge {
                width: 9000,
                max_dimension: DEFAULT_MAX,
                ..
            })
        ));
        assert!(validate_rgba(&data, 16384).is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let data = TextureData {
            width: 0,
            height: 4,
            rgba: vec![],
        };
        assert!(matches!(
            validate_rgba(&data, DEFAULT_MAX),
            Err(TextureError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_short_data_rejected() {
        let data = TextureData {
            width: 2,
            height: 2,
            rgba: vec![0; 15],
        };
        let err = validate_rgba(&data, DEFAULT_MAX).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DataSizeMismatch {
                actual: 15,
                expected: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_upload_creates_srgb_texture() {
        let Some((device, queue)) = pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        }) else {
            return;
        };
        let binder = TextureBinder::new(&device);
        let tex = binder
            .upload(&device, &queue, "checker", &TextureData::placeholder())
            .unwrap();
        assert_eq!(tex.texture.format(), TextureBinder::FORMAT);
        assert_eq!(tex.texture.width(), 8);
    }

    #[test]
    fn test_upload_over_device_limit_is_an_error() {
        let Some((device, queue)) = pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        }) else {
            return;
        };
        let width = device.limits().max_texture_dimension_2d + 1;
        let data = TextureData {
            width,
            height: 1,
            rgba: vec![0; width as usize * 4],
        };
        let binder = TextureBinder::new(&device);
        let result = binder.upload(&device, &queue, "huge", &data);
        assert!(matches!(result, Err(TextureError::TooLarge { .. })));
    }
}
