//! Render Targets
//!
//! A color + depth pair that a pass draws into. Offscreen targets own both
//! textures and can be sampled afterwards (water reflection and refraction);
//! the screen target wraps the current swapchain image for one frame.

use thiserror::Error;

use super::gpu_context::DEPTH_FORMAT;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderTargetError {
    #[error("render target '{label}' has zero size ({width}x{height})")]
    ZeroSize {
        label: String,
        width: u32,
        height: u32,
    },
    #[error("render target '{label}' is {width}x{height}, device limit is {max}")]
    TooLarge {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },
    #[error("render target '{label}' creation failed: {message}")]
    Creation { label: String, message: String },
}

pub struct RenderTarget {
    label: String,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    color_texture: Option<wgpu::Texture>,
    color_view: wgpu::TextureView,
    depth_texture: Option<wgpu::Texture>,
    depth_view: wgpu::TextureView,
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("offscreen", &self.color_texture.is_some())
            .finish()
    }
}

/// Reject sizes the device cannot allocate before touching the GPU.
pub fn check_target_size(label: &str, width: u32, height: u32, max: u32) -> Result<(), RenderTargetError> {
    if width == 0 || height == 0 {
        return Err(RenderTargetError::ZeroSize {
            label: label.to_string(),
            width,
            height,
        });
    }
    if width > max || height > max {
        return Err(RenderTargetError::TooLarge {
            label: label.to_string(),
            width,
            height,
            max,
        });
    }
    Ok(())
}

impl RenderTarget {
    /// Create a sampleable offscreen target. Color and depth can both be
    /// bound as textures once the pass has finished.
    pub fn offscreen(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderTargetError> {
        check_target_size(label, width, height, device.limits().max_texture_dimension_2d)?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Color")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Depth")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(error) = validation.or(out_of_memory) {
            return Err(RenderTargetError::Creation {
                label: label.to_string(),
                message: error.to_string(),
            });
        }

        log::info!("Created render target '{}' ({}x{})", label, width, height);

        Ok(Self {
            label: label.to_string(),
            width,
            height,
            format,
            color_texture: Some(color_texture),
            color_view,
            depth_texture: Some(depth_texture),
            depth_view,
        })
    }

    /// Wrap the current swapchain image and the screen depth buffer.
    pub fn for_surface(
        color_view: wgpu::TextureView,
        depth_texture: &wgpu::Texture,
        format: wgpu::TextureFormat,
    ) -> Self {
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            label: "Screen".to_string(),
            width: depth_texture.width(),
            height: depth_texture.height(),
            format,
            color_texture: None,
            color_view,
            depth_texture: None,
            depth_view,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Whether this target owns textures that can be sampled later.
    pub fn is_offscreen(&self) -> bool {
        self.color_texture.is_some() && self.depth_texture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        let err = check_target_size("Reflection", 0, 180, 8192).unwrap_err();
        assert!(matches!(err, RenderTargetError::ZeroSize { width: 0, .. }));
    }

    #[test]
    fn test_oversize_rejected() {
        let err = check_target_size("Refraction", 16_384, 720, 8192).unwrap_err();
        assert_eq!(
            err.to_string(),
            "render target 'Refraction' is 16384x720, device limit is 8192"
        );
    }

    #[test]
    fn test_valid_size() {
        assert!(check_target_size("Reflection", 320, 180, 8192).is_ok());
    }
}
