use cgmath::Point3;

use crate::engine_state::{rendering::Vertex, voxels::voxel::voxel_side::VoxelSide};

/// Index pattern of a quad: two counter-clockwise triangles over its four corners.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A single unit quad on one side of a voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Minimum corner of the voxel in chunk coordinates
    pub origin: Point3<usize>,
    /// Which side of the voxel this face represents
    pub side: VoxelSide,
}

impl Face {
    /// Creates the face on `side` of the voxel at `(i, j, k)`.
    pub fn new(i: usize, j: usize, k: usize, side: VoxelSide) -> Self {
        Face {
            origin: Point3::new(i, j, k),
            side,
        }
    }

    /// The four corner vertices of the face, in emission order.
    pub fn vertices(&self) -> [Vertex; 4] {
        let origin = Point3::new(
            self.origin.x as f32,
            self.origin.y as f32,
            self.origin.z as f32,
        );
        self.side.corner_offsets().map(|offset| Vertex::new(origin + offset))
    }

    /// The six indices of the face, offset by the vertices already emitted.
    pub fn indices(base_vertex: u32) -> [u32; 6] {
        QUAD_INDICES.map(|index| index + base_vertex)
    }
}
