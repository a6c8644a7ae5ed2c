//! Rendering system for the voxel world.
//!
//! This module turns chunks into meshes, caches them, and records draw calls
//! for the chunks in the world's render list. Pipeline and shader setup are
//! left to the embedding application.

pub mod headless;
pub mod meshing;
pub mod render_system;
mod vertex;

// Re-export commonly used types
pub use headless::request_headless_device;
pub use meshing::{CpuMeshBuilder, GpuMesh, Mesh, MeshBuilder, MeshManager, WgpuMeshBuilder};
pub use render_system::{ChunkDraw, VoxelRenderSystem};
pub use vertex::Vertex;
