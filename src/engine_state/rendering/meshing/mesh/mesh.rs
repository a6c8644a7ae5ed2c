//! Mesh data structures and operations for voxel rendering.
//!
//! This module turns chunk voxel data into flat vertex and index buffers ready
//! for upload.

use std::collections::HashMap;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{chunk::Chunk, voxel::voxel_side::VoxelSide},
};

use super::face::Face;

/// Vertices emitted per solid voxel (six quads of four corners).
pub const VERTICES_PER_VOXEL: usize = 24;
/// Indices emitted per solid voxel (six quads of two triangles).
pub const INDICES_PER_VOXEL: usize = 36;

/// Triangle geometry of one chunk in chunk-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Generates the geometry of a chunk.
    ///
    /// Every non-air voxel, visited in storage order, contributes all six faces
    /// as independent quads. Faces hidden by a solid neighbour are still emitted
    /// and no vertices are shared between quads, so a chunk with `K` solid voxels
    /// yields exactly `24 * K` vertices and `36 * K` indices.
    pub fn generate(chunk: &Chunk) -> Self {
        let solid = chunk.solid_count();
        let mut mesh = Mesh {
            vertices: Vec::with_capacity(solid * VERTICES_PER_VOXEL),
            indices: Vec::with_capacity(solid * INDICES_PER_VOXEL),
        };

        for (position, _voxel) in chunk.iter_solid() {
            for side in VoxelSide::all() {
                mesh.push_face(&Face::new(position.x, position.y, position.z, side));
            }
        }

        mesh
    }

    /// Appends one quad, offsetting its indices past the existing vertices.
    pub fn push_face(&mut self, face: &Face) {
        let base_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend_from_slice(&Face::indices(base_vertex));
    }

    /// Returns a copy with exactly-equal vertices merged and indices remapped.
    ///
    /// Vertices keep the order of their first occurrence.
    pub fn deduplicated(&self) -> Mesh {
        let mut unique: HashMap<[u32; 8], u32> = HashMap::with_capacity(self.vertices.len());
        let mut vertices = Vec::new();
        let remap: Vec<u32> = self
            .vertices
            .iter()
            .map(|vertex| {
                *unique.entry(vertex.bit_key()).or_insert_with(|| {
                    vertices.push(*vertex);
                    (vertices.len() - 1) as u32
                })
            })
            .collect();

        Mesh {
            vertices,
            indices: self
                .indices
                .iter()
                .map(|&index| remap[index as usize])
                .collect(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        chunk::chunk_creation::ChunkCreationIterator,
        voxel::{voxel_type::VoxelType, Voxel},
    };

    fn loaded(mut chunk: Chunk) -> Chunk {
        chunk.load();
        chunk
    }

    #[test]
    fn counts_scale_with_solid_voxels() {
        let mut builder = ChunkCreationIterator::new(2);
        for i in 0..8 {
            builder.push_voxel_type(if i % 3 == 0 { VoxelType::Stone } else { VoxelType::Air });
        }
        let chunk = loaded(builder.return_chunk().unwrap());
        assert_eq!(chunk.solid_count(), 3);

        let mesh = Mesh::generate(&chunk);
        assert_eq!(mesh.vertex_count(), 3 * VERTICES_PER_VOXEL);
        assert_eq!(mesh.index_count(), 3 * INDICES_PER_VOXEL);
    }

    #[test]
    fn all_air_chunk_is_empty() {
        let chunk = loaded(Chunk::from_voxels(2, vec![Voxel::AIR; 8]).unwrap());
        let mesh = Mesh::generate(&chunk);
        assert!(mesh.is_empty());
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn indices_run_past_previous_quads() {
        let chunk = loaded(Chunk::new(1).unwrap());
        let mesh = Mesh::generate(&chunk);
        assert_eq!(&mesh.indices[..12], &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert_eq!(*mesh.indices.iter().max().unwrap(), 23);
    }

    #[test]
    fn deduplication_collapses_cube_corners() {
        let chunk = loaded(Chunk::new(1).unwrap());
        let mesh = Mesh::generate(&chunk).deduplicated();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), INDICES_PER_VOXEL);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < 8));
    }
}
