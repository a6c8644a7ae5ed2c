//! # Voxel Type Module
//!
//! This module defines the material types a voxel can hold and the conversion
//! from the compact integer id stored in each [`Voxel`](super::Voxel).

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::VoxelTypeSize;

/// Enumerates all possible voxel materials.
///
/// The discriminants are the ids stored in voxel storage. Id 4 is unassigned.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelType {
    /// Empty space. Never rendered.
    Air = 0,

    /// Plain dirt, the default material of a freshly allocated chunk.
    Dirt = 1,

    /// Grass-covered dirt.
    Grass = 2,

    /// Stone.
    Stone = 3,

    /// Sand.
    Sand = 5,
}

impl VoxelType {
    /// Converts a raw voxel id to its type, or `None` for an unassigned id.
    pub fn from_id(id: VoxelTypeSize) -> Option<Self> {
        FromPrimitive::from_u16(id)
    }

    /// The raw id stored in voxel storage.
    pub fn id(self) -> VoxelTypeSize {
        self as VoxelTypeSize
    }
}
