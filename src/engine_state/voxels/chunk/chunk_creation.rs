//! # Chunk Creation Module
//!
//! A builder that fills a chunk cell by cell in storage order
//! (x fastest, then y, then z) and validates the result on completion.

use super::{Chunk, MAX_CHUNK_EDGE};
use crate::engine_state::{
    error::ChunkError,
    voxels::voxel::{voxel_type::VoxelType, Voxel},
};

/// Builds a [`Chunk`] one voxel at a time.
///
/// ```
/// use voxel_world::engine_state::voxels::{chunk::chunk_creation::ChunkCreationIterator, voxel::voxel_type::VoxelType};
///
/// let mut cci = ChunkCreationIterator::new(2);
/// for i in 0..8 {
///     cci.push_voxel_type(if i % 2 == 0 { VoxelType::Stone } else { VoxelType::Air });
/// }
/// let chunk = cci.return_chunk().unwrap();
/// assert_eq!(chunk.solid_count(), 4);
/// ```
pub struct ChunkCreationIterator {
    edge: usize,
    voxels: Vec<Voxel>,
}

impl ChunkCreationIterator {
    /// Starts a chunk of the given edge length.
    ///
    /// Edges [`Chunk::from_voxels`] would reject reserve nothing; the error
    /// surfaces from [`return_chunk`](Self::return_chunk).
    pub fn new(edge: usize) -> Self {
        let capacity = if edge <= MAX_CHUNK_EDGE {
            Chunk::volume(edge)
        } else {
            0
        };
        ChunkCreationIterator {
            edge,
            voxels: Vec::with_capacity(capacity),
        }
    }

    /// Appends a voxel of the given type at the next storage position.
    pub fn push_voxel_type(&mut self, voxel_type: VoxelType) {
        self.push_voxel(Voxel::new(voxel_type));
    }

    /// Appends a voxel at the next storage position.
    pub fn push_voxel(&mut self, voxel: Voxel) {
        self.voxels.push(voxel);
    }

    /// Number of voxels pushed so far.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Finishes the chunk.
    ///
    /// # Errors
    /// Fails unless exactly `edge³` voxels were pushed.
    pub fn return_chunk(self) -> Result<Chunk, ChunkError> {
        Chunk::from_voxels(self.edge, self.voxels)
    }
}
