//! # Engine State Module
//!
//! The voxel world and the systems that stream and draw it.
//!
//! ## Key Components
//!
//! * `config` - Runtime configuration of the world grid and per-frame budgets
//! * `error` - Error types for configuration, chunk storage and GPU resources
//! * `rendering` - Mesh generation, the mesh cache and the render system
//! * `voxels` - Voxels, chunks, the world grid and its staging pipeline
//!
//! ## Architecture
//!
//! The [`World`] owns every chunk and decides, once per frame, which chunks are
//! loaded, set up, rebuilt, unloaded and drawn. The
//! [`VoxelRenderSystem`] wraps the world, feeds the chunks in its render list
//! through a [`MeshBuilder`], and keeps the results in an LRU mesh cache.

pub mod config;
pub mod error;
pub mod rendering;
pub mod voxels;

pub use config::WorldConfig;
pub use error::{ChunkError, ConfigError, EngineError};
pub use rendering::{
    ChunkDraw, CpuMeshBuilder, GpuMesh, Mesh, MeshBuilder, MeshManager, Vertex, VoxelRenderSystem,
    WgpuMeshBuilder,
};
pub use voxels::{
    chunk::Chunk,
    tasks::{AsyncChunker, VoxelSource},
    voxel::{voxel_side::VoxelSide, voxel_type::VoxelType, Voxel},
    world::{
        grid::{ChunkId, WorldGrid},
        staging::RebuildRequest,
        FrameStats, World,
    },
};
