//! # Voxel Side Module
//!
//! The six faces of a unit voxel cube, with the corner offsets used when a face
//! is emitted as a quad and the outward offset used to find the adjacent cell.

use cgmath::Vector3;

/// One of the six faces of a voxel.
///
/// The discriminants follow mesh emission order:
/// FRONT, BACK, LEFT, RIGHT, TOP, BOTTOM.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

impl VoxelSide {
    /// All six sides in emission order.
    pub fn all() -> [VoxelSide; 6] {
        [
            VoxelSide::FRONT,
            VoxelSide::BACK,
            VoxelSide::LEFT,
            VoxelSide::RIGHT,
            VoxelSide::TOP,
            VoxelSide::BOTTOM,
        ]
    }

    /// Corner offsets of this face relative to the voxel's minimum corner,
    /// in the order the quad's four vertices are emitted.
    pub fn corner_offsets(self) -> [Vector3<f32>; 4] {
        match self {
            VoxelSide::FRONT => [
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(1.0, 0.0, 1.0),
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(0.0, 1.0, 1.0),
            ],
            VoxelSide::BACK => [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            VoxelSide::LEFT => [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(0.0, 1.0, 1.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            VoxelSide::RIGHT => [
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 1.0),
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(1.0, 1.0, 0.0),
            ],
            VoxelSide::TOP => [
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(0.0, 1.0, 1.0),
            ],
            VoxelSide::BOTTOM => [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 1.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
        }
    }

    /// Unit offset pointing out of this face, towards the neighbouring cell.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            VoxelSide::FRONT => Vector3::new(0, 0, 1),
            VoxelSide::BACK => Vector3::new(0, 0, -1),
            VoxelSide::LEFT => Vector3::new(-1, 0, 0),
            VoxelSide::RIGHT => Vector3::new(1, 0, 0),
            VoxelSide::TOP => Vector3::new(0, 1, 0),
            VoxelSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }
}
