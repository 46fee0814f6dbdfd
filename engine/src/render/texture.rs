//! Image Textures
//!
//! Decodes images with the `image` crate and uploads them as sRGB 2D
//! textures. A failed load degrades to a 1x1 white texel so the scene still
//! renders with vertex colors.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {path} is empty")]
    Empty { path: PathBuf },
    #[error("texture {path} is {width}x{height}, device limit is {max}")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Decode an image file into RGBA8, checking it fits on the device.
pub fn load_rgba(path: &Path, max_dimension: u32) -> Result<RgbaImage, TextureError> {
    let decoded = image::open(path)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty {
            path: path.to_path_buf(),
        });
    }
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(decoded)
}

/// A sampled 2D texture with its view and sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// False for the white placeholder
    pub is_loaded: bool,
}

impl Texture {
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &RgbaImage,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            is_loaded: true,
        }
    }

    /// 1x1 opaque white.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> Self {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self {
            is_loaded: false,
            ..Self::from_rgba(device, queue, label, &image)
        }
    }

    /// Load `path` if given, else (or on failure) the white placeholder.
    pub fn load_or_white(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        path: Option<&Path>,
    ) -> Self {
        match load_optional(path, device.limits().max_texture_dimension_2d) {
            Some(image) => Self::from_rgba(device, queue, label, &image),
            None => Self::white(device, queue, label),
        }
    }
}

/// The image behind an optional texture path. `None` when no path is set or
/// the file cannot be used; failures are logged.
pub fn load_optional(path: Option<&Path>, max_dimension: u32) -> Option<RgbaImage> {
    let path = path?;
    match load_rgba(path, max_dimension) {
        Ok(image) => {
            log::info!(
                "Loaded texture {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            Some(image)
        }
        Err(e) => {
            log::warn!("{e}; falling back to vertex colors");
            None
        }
    }
}
