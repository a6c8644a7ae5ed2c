//! # Chunk Iteration Module
//!
//! An iterator over the non-air voxels of a chunk, yielding each voxel with its
//! local position. Cells are visited in linear storage order.

use cgmath::Point3;

use super::Chunk;
use crate::engine_state::voxels::voxel::Voxel;

/// Iterator over the non-air voxels of a [`Chunk`].
pub struct ChunkVoxelIterator<'a> {
    /// Chunk being iterated
    chunk_ref: &'a Chunk,
    /// Next storage index to inspect
    current_offset: usize,
}

impl<'a> ChunkVoxelIterator<'a> {
    /// Creates an iterator positioned at the first cell of the chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkVoxelIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl<'a> Iterator for ChunkVoxelIterator<'a> {
    type Item = (Point3<usize>, &'a Voxel);

    fn next(&mut self) -> Option<Self::Item> {
        let voxels = self.chunk_ref.voxels();
        while self.current_offset < voxels.len() {
            let index = self.current_offset;
            self.current_offset += 1;

            let voxel = &voxels[index];
            if voxel.is_air() {
                continue;
            }
            return Some((self.chunk_ref.position_of(index), voxel));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.chunk_ref.voxels().len() - self.current_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

    #[test]
    fn skips_air_and_reports_positions() {
        let mut voxels = vec![Voxel::AIR; 8];
        voxels[1] = Voxel::new(VoxelType::Stone);
        voxels[6] = Voxel::new(VoxelType::Sand);
        let chunk = Chunk::from_voxels(2, voxels).unwrap();

        let found: Vec<_> = chunk
            .iter_solid()
            .map(|(position, voxel)| (position, voxel.id))
            .collect();
        assert_eq!(
            found,
            vec![(Point3::new(1, 0, 0), 3), (Point3::new(0, 1, 1), 5)]
        );
    }

    #[test]
    fn released_storage_yields_nothing() {
        let mut chunk = Chunk::new(2).unwrap();
        chunk.load();
        chunk.unload();
        assert_eq!(chunk.iter_solid().count(), 0);
    }
}
