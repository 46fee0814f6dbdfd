//! Mesh File Save/Load (.vmesh)
//!
//! Binary container for vegetation models.
//! Layout: fixed 32-byte header | raw vertex data | raw index data | metadata JSON.
//!
//! Geometry is stored as raw [`MeshVertex`] / `u32` bytes so loading is a
//! copy. Metadata is JSON and records the model's authored up axis, which
//! placement needs for surface alignment.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::mesh::{MeshData, MeshVertex};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes identifying a .vmesh file.
pub const VMESH_MAGIC: [u8; 4] = *b"VMSH";

/// Current file format version.
const VMESH_VERSION: u32 = 1;

/// Size of the header in bytes. Must always be 32.
const HEADER_SIZE: usize = 32;

// ============================================================================
// HEADER
// ============================================================================

/// `magic` (4) + `version` (4) + `vertex_count` (4) + `index_count` (4)
/// + `metadata_offset` (4) + `_reserved` (12) = 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VmeshHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    /// Byte offset from the start of the file to the metadata JSON.
    pub metadata_offset: u32,
    pub _reserved: [u8; 12],
}

static_assertions::assert_eq_size!(VmeshHeader, [u8; 32]);

// ============================================================================
// METADATA
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshMetadata {
    /// Display name (e.g. "Meadow Flower").
    pub name: String,
    /// Authored up axis of the model. Usually +Y.
    #[serde(default = "default_up_axis")]
    pub up_axis: [f32; 3],
}

fn default_up_axis() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

impl MeshMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up_axis: default_up_axis(),
        }
    }
}

/// A fully loaded .vmesh: geometry + metadata.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub mesh: MeshData,
    pub metadata: MeshMetadata,
}

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Debug, Error)]
pub enum MeshFileError {
    #[error("file too short for vmesh header")]
    FileTooShort,
    #[error("invalid magic bytes (expected VMSH)")]
    InvalidMagic,
    #[error("unsupported vmesh version: {0}")]
    UnsupportedVersion(u32),
    #[error("vmesh sections exceed the file size ({needed} > {actual} bytes)")]
    Truncated { needed: usize, actual: usize },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("up axis {0:?} is not a usable direction")]
    BadUpAxis([f32; 3]),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// SAVE
// ============================================================================

/// Serialize a mesh into .vmesh bytes.
pub fn encode_mesh(mesh: &MeshData, metadata: &MeshMetadata) -> Result<Vec<u8>, MeshFileError> {
    let vertex_bytes = bytemuck::cast_slice::<MeshVertex, u8>(&mesh.vertices);
    let index_bytes = bytemuck::cast_slice::<u32, u8>(&mesh.indices);
    let metadata_json = serde_json::to_vec(metadata)?;

    let metadata_offset = HEADER_SIZE + vertex_bytes.len() + index_bytes.len();
    let header = VmeshHeader {
        magic: VMESH_MAGIC,
        version: VMESH_VERSION,
        vertex_count: mesh.vertices.len() as u32,
        index_count: mesh.indices.len() as u32,
        metadata_offset: metadata_offset as u32,
        _reserved: [0u8; 12],
    };

    let mut bytes = Vec::with_capacity(metadata_offset + metadata_json.len());
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(vertex_bytes);
    bytes.extend_from_slice(index_bytes);
    bytes.extend_from_slice(&metadata_json);
    Ok(bytes)
}

/// Write a .vmesh file, creating parent directories as needed.
pub fn save_mesh(path: &Path, mesh: &MeshData, metadata: &MeshMetadata) -> Result<(), MeshFileError> {
    let bytes = encode_mesh(mesh, metadata)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

// ============================================================================
// LOAD
// ============================================================================

/// Parse .vmesh bytes, validating every section.
pub fn decode_mesh(data: &[u8]) -> Result<LoadedMesh, MeshFileError> {
    if data.len() < HEADER_SIZE {
        return Err(MeshFileError::FileTooShort);
    }

    let header: VmeshHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
    if header.magic != VMESH_MAGIC {
        return Err(MeshFileError::InvalidMagic);
    }
    if header.version != VMESH_VERSION {
        return Err(MeshFileError::UnsupportedVersion(header.version));
    }

    let vertex_start = HEADER_SIZE;
    let vertex_end = vertex_start + header.vertex_count as usize * std::mem::size_of::<MeshVertex>();
    let index_end = vertex_end + header.index_count as usize * std::mem::size_of::<u32>();
    let meta_start = header.metadata_offset as usize;
    let needed = index_end.max(meta_start);
    if data.len() < needed || meta_start < index_end {
        return Err(MeshFileError::Truncated {
            needed,
            actual: data.len(),
        });
    }

    // File bytes carry no alignment guarantee, so copy instead of casting.
    let vertices: Vec<MeshVertex> = data[vertex_start..vertex_end]
        .chunks_exact(std::mem::size_of::<MeshVertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    let indices: Vec<u32> = data[vertex_end..index_end]
        .chunks_exact(std::mem::size_of::<u32>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    let metadata: MeshMetadata = serde_json::from_slice(&data[meta_start..])?;

    let mesh = MeshData::new(vertices, indices);
    if let Some(index) = mesh.find_out_of_range_index() {
        return Err(MeshFileError::IndexOutOfRange {
            index,
            vertex_count: mesh.vertices.len(),
        });
    }
    let up = glam::Vec3::from_array(metadata.up_axis);
    if !up.is_finite() || up.length_squared() < 1e-6 {
        return Err(MeshFileError::BadUpAxis(metadata.up_axis));
    }

    Ok(LoadedMesh { mesh, metadata })
}

/// Read a .vmesh file from disk.
pub fn load_mesh(path: &Path) -> Result<LoadedMesh, MeshFileError> {
    let data = std::fs::read(path)?;
    decode_mesh(&data)
}

// ============================================================================
// TESTS
// ============================================================================
