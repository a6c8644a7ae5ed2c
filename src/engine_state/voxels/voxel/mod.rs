//! # Voxel Module
//!
//! The smallest unit of world data: a cell carrying only a material id.

use voxel_type::VoxelType;

pub mod voxel_side;
pub mod voxel_type;

/// The underlying integer type used to store a voxel's material id.
pub type VoxelTypeSize = u16;

/// A single voxel cell.
///
/// Stored by value and contiguously inside its chunk. Id 0 is air.
///
/// # Memory Layout
/// `#[repr(C)]` keeps the layout stable so voxel storage can be handed to the GPU as bytes.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Voxel {
    /// The material of this voxel, encoded as a [`VoxelTypeSize`].
    pub id: VoxelTypeSize,
}

impl Voxel {
    /// Empty space.
    pub const AIR: Voxel = Voxel { id: 0 };

    /// Creates a voxel of the given material.
    pub fn new(voxel_type: VoxelType) -> Self {
        Voxel {
            id: voxel_type.id(),
        }
    }

    /// The material of this voxel, or `None` if the stored id is unassigned.
    pub fn voxel_type(&self) -> Option<VoxelType> {
        VoxelType::from_id(self.id)
    }

    /// Whether this cell is empty and must not be rendered.
    pub fn is_air(&self) -> bool {
        self.id == VoxelType::Air.id()
    }
}

impl Default for Voxel {
    /// A freshly allocated voxel is dirt.
    fn default() -> Self {
        Voxel::new(VoxelType::Dirt)
    }
}

impl From<VoxelType> for Voxel {
    fn from(voxel_type: VoxelType) -> Self {
        Voxel::new(voxel_type)
    }
}
