//! Shader Loading Utilities
//!
//! Shaders are embedded at compile time. A runtime directory can override
//! them for iteration; a missing or unreadable override falls back to the
//! embedded copy.

use std::path::Path;

/// Shader source that can be either embedded at compile time or loaded at runtime.
pub enum ShaderSource {
    /// Embedded shader source (no file I/O at runtime)
    Embedded(&'static str),
    /// Runtime-loaded shader source
    Runtime(String),
}

impl ShaderSource {
    /// Get the shader source as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            ShaderSource::Embedded(s) => s,
            ShaderSource::Runtime(s) => s.as_str(),
        }
    }

    /// `<dir>/<file_name>` if `dir` is set and readable, else `embedded`.
    pub fn resolve(dir: Option<&Path>, file_name: &str, embedded: &'static str) -> Self {
        let Some(dir) = dir else {
            return ShaderSource::Embedded(embedded);
        };
        let path = dir.join(file_name);
        match load_shader_file(&path) {
            Ok(source) => {
                log::info!("Loaded shader override {}", path.display());
                source
            }
            Err(e) => {
                log::warn!(
                    "Shader override {} unavailable ({}), using embedded copy",
                    path.display(),
                    e
                );
                ShaderSource::Embedded(embedded)
            }
        }
    }
}

/// Load a shader from the filesystem at runtime.
pub fn load_shader_file(path: impl AsRef<Path>) -> Result<ShaderSource, std::io::Error> {
    let source = std::fs::read_to_string(path)?;
    Ok(ShaderSource::Runtime(source))
}

/// Create a wgpu shader module from the given source.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &ShaderSource,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.as_str().into()),
    })
}

/// Shader file names, relative to a shader directory.
pub mod paths {
    pub const TERRAIN: &str = "terrain.wgsl";
    pub const VEGETATION: &str = "vegetation.wgsl";
    pub const SUN: &str = "sun.wgsl";
    pub const WATER: &str = "water.wgsl";
}

/// Embedded shaders compiled into the binary.
pub mod embedded {
    pub const TERRAIN: &str = include_str!("../../../shaders/terrain.wgsl");
    pub const VEGETATION: &str = include_str!("../../../shaders/vegetation.wgsl");
    pub const SUN: &str = include_str!("../../../shaders/sun.wgsl");
    pub const WATER: &str = include_str!("../../../shaders/water.wgsl");

    /// Every embedded shader with its file name.
    pub const ALL: [(&str, &str); 4] = [
        (super::paths::TERRAIN, TERRAIN),
        (super::paths::VEGETATION, VEGETATION),
        (super::paths::SUN, SUN),
        (super::paths::WATER, WATER),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_source_embedded() {
        let source = ShaderSource::Embedded("fn main() {}");
        assert_eq!(source.as_str(), "fn main() {}");
    }

    #[test]
    fn test_resolve_without_dir_is_embedded() {
        let source = ShaderSource::resolve(None, paths::SUN, embedded::SUN);
        assert!(matches!(source, ShaderSource::Embedded(_)));
    }

    #[test]
    fn test_resolve_missing_override_falls_back() {
        let source = ShaderSource::resolve(
            Some(Path::new("/nonexistent/shader/dir")),
            paths::WATER,
            embedded::WATER,
        );
        assert_eq!(source.as_str(), embedded::WATER);
    }

    #[test]
    fn test_embedded_shaders_have_entry_points() {
        for (name, source) in embedded::ALL {
            assert!(source.contains("fn vs_main"), "{name} lacks vs_main");
            assert!(source.contains("fn fs_main"), "{name} lacks fs_main");
        }
    }
}
