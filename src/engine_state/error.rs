//! # Engine Errors
//!
//! Error types surfaced by the voxel world. The per-frame chunk lifecycle never
//! fails; errors only come from configuration, chunk construction, voxel edits
//! and GPU resource creation.

use cgmath::Point3;
use thiserror::Error;

/// Errors raised while building or mutating a chunk's voxel storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// A chunk must be at least one voxel wide.
    #[error("chunk edge length must be non-zero")]
    ZeroEdge,

    /// The chunk edge exceeds the supported maximum.
    #[error("chunk edge {edge} exceeds the maximum of {max}")]
    EdgeTooLarge {
        /// Requested edge length
        edge: usize,
        /// Largest accepted edge length
        max: usize,
    },

    /// The voxel sequence does not hold exactly `edge³` cells.
    #[error("chunk of edge {edge} expects {expected} voxels, got {actual}")]
    VoxelCountMismatch {
        /// Edge length of the chunk
        edge: usize,
        /// `edge³`
        expected: usize,
        /// Length of the rejected sequence
        actual: usize,
    },

    /// Local voxel coordinates fall outside the chunk.
    #[error("voxel ({x}, {y}, {z}) is outside a chunk of edge {edge}")]
    OutOfBounds {
        /// Local x
        x: usize,
        /// Local y
        y: usize,
        /// Local z
        z: usize,
        /// Edge length of the chunk
        edge: usize,
    },

    /// Voxel storage is released while the chunk is unloaded.
    #[error("chunk is not loaded")]
    NotLoaded,
}

/// Errors raised while reading or validating a [`WorldConfig`](super::config::WorldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read world config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON for the expected schema.
    #[error("failed to parse world config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the world cannot run with.
    #[error("invalid world config: {0}")]
    Invalid(String),
}

/// Top level error for the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A chunk rejected an operation.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// A world-space voxel position lies outside the chunk grid.
    #[error("voxel position {0:?} lies outside the world")]
    OutsideWorld(Point3<i64>),

    /// The GPU refused to create a mesh buffer. Fatal, never retried.
    #[error("failed to create {label}: {reason}")]
    BufferCreation {
        /// Label of the buffer being created
        label: String,
        /// Message reported by the graphics API
        reason: String,
    },

    /// No graphics adapter or device could be acquired.
    #[error("graphics device unavailable: {0}")]
    DeviceUnavailable(String),
}
