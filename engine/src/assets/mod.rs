//! Asset Loading
//!
//! Binary model files for vegetation.

pub mod mesh_file;

pub use mesh_file::{
    LoadedMesh, MeshFileError, MeshMetadata, VMESH_MAGIC, decode_mesh, encode_mesh, load_mesh,
    save_mesh,
};
