//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cube of voxels plus the
//! lifecycle flags the world's staged pipeline drives.
//!
//! ## Storage
//!
//! Voxels are stored by value in one flat vector of `edge³` cells, indexed
//! `x + y * edge + z * edge²`. Storage is only meaningful while the chunk is
//! loaded; unloading releases it and loading allocates it again.
//!
//! ## Lifecycle
//!
//! ```text
//! unloaded ──load()──▶ loaded ──setup()──▶ loaded + setup ──rebuild()──┐
//!    ▲                                         │    ▲                  │
//!    └──────────────── unload() ───────────────┘    └──────────────────┘
//! ```
//!
//! `is_setup` implies `is_loaded` at all times. None of the transitions can fail;
//! a transition requested in the wrong state leaves the chunk untouched.

use cgmath::Point3;
use chunk_iteration::ChunkVoxelIterator;

use super::voxel::Voxel;
use crate::engine_state::error::ChunkError;

pub mod chunk_creation;
pub mod chunk_iteration;

/// Largest accepted chunk edge. Keeps `edge³` well inside `usize` on every target.
pub const MAX_CHUNK_EDGE: usize = 1024;

/// A cubic block of voxels with its lifecycle state.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Voxels along one edge.
    edge: usize,
    /// Flat voxel storage, empty while unloaded.
    voxels: Vec<Voxel>,
    is_loaded: bool,
    is_setup: bool,
    should_render: bool,
    /// Bumped whenever previously generated geometry becomes stale.
    mesh_revision: u64,
}

impl Chunk {
    /// Creates an unloaded chunk whose storage holds `edge³` default (dirt) voxels.
    pub fn new(edge: usize) -> Result<Self, ChunkError> {
        Self::check_edge(edge)?;
        Ok(Chunk {
            edge,
            voxels: vec![Voxel::default(); Self::volume(edge)],
            is_loaded: false,
            is_setup: false,
            should_render: false,
            mesh_revision: 0,
        })
    }

    /// Creates an unloaded chunk from explicit voxel data.
    ///
    /// # Errors
    /// Rejects a zero or oversized edge, or a sequence whose length is not `edge³`.
    pub fn from_voxels(edge: usize, voxels: Vec<Voxel>) -> Result<Self, ChunkError> {
        Self::check_edge(edge)?;
        Self::check_len(edge, voxels.len())?;
        Ok(Chunk {
            edge,
            voxels,
            is_loaded: false,
            is_setup: false,
            should_render: false,
            mesh_revision: 0,
        })
    }

    /// Number of cells in a chunk of the given edge.
    ///
    /// Only meaningful for edges up to [`MAX_CHUNK_EDGE`].
    pub fn volume(edge: usize) -> usize {
        edge * edge * edge
    }

    fn check_edge(edge: usize) -> Result<(), ChunkError> {
        if edge == 0 {
            return Err(ChunkError::ZeroEdge);
        }
        if edge > MAX_CHUNK_EDGE {
            return Err(ChunkError::EdgeTooLarge {
                edge,
                max: MAX_CHUNK_EDGE,
            });
        }
        Ok(())
    }

    fn check_len(edge: usize, actual: usize) -> Result<(), ChunkError> {
        let expected = Self::volume(edge);
        if actual != expected {
            return Err(ChunkError::VoxelCountMismatch {
                edge,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Marks the chunk loaded, allocating default storage if it was released.
    pub fn load(&mut self) {
        if self.voxels.is_empty() {
            self.voxels = vec![Voxel::default(); Self::volume(self.edge)];
        }
        self.is_loaded = true;
    }

    /// Marks the chunk mesh-ready. Ignored while unloaded.
    pub fn setup(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.is_setup = true;
        self.should_render = self.has_solid_voxels();
    }

    /// Flags the chunk's geometry as stale so it is regenerated before the next draw.
    pub fn rebuild(&mut self) {
        self.mesh_revision += 1;
        self.should_render = self.is_setup && self.has_solid_voxels();
    }

    /// Returns the chunk to the unloaded state and releases its voxel storage.
    pub fn unload(&mut self) {
        self.is_loaded = false;
        self.is_setup = false;
        self.should_render = false;
        self.voxels = Vec::new();
        self.mesh_revision += 1;
    }

    /// Voxels along one edge.
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Whether voxel data is resident.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Whether the chunk is mesh-ready.
    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    /// Whether the chunk has anything to draw.
    pub fn should_render(&self) -> bool {
        self.should_render
    }

    /// Revision of the chunk's geometry. Meshes built at an older revision are stale.
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    /// The flat voxel storage (empty while unloaded).
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Linear storage index of local coordinates, or `None` if outside the chunk.
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x >= self.edge || y >= self.edge || z >= self.edge {
            return None;
        }
        Some(x + y * self.edge + z * self.edge * self.edge)
    }

    /// Local coordinates of a linear storage index.
    pub fn position_of(&self, index: usize) -> Point3<usize> {
        Point3::new(
            index % self.edge,
            (index / self.edge) % self.edge,
            (index / (self.edge * self.edge)) % self.edge,
        )
    }

    /// The voxel at local coordinates, or `None` if outside the chunk or unloaded.
    pub fn voxel_at(&self, x: usize, y: usize, z: usize) -> Option<&Voxel> {
        self.index_of(x, y, z).and_then(|index| self.voxels.get(index))
    }

    /// Overwrites one voxel.
    ///
    /// Geometry is not regenerated here; callers queue a rebuild.
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) -> Result<(), ChunkError> {
        let index = self.index_of(x, y, z).ok_or(ChunkError::OutOfBounds {
            x,
            y,
            z,
            edge: self.edge,
        })?;
        if !self.is_loaded {
            return Err(ChunkError::NotLoaded);
        }
        self.voxels[index] = voxel;
        Ok(())
    }

    /// Replaces the whole voxel storage of a loaded chunk.
    pub fn fill_voxels(&mut self, voxels: Vec<Voxel>) -> Result<(), ChunkError> {
        if !self.is_loaded {
            return Err(ChunkError::NotLoaded);
        }
        Self::check_len(self.edge, voxels.len())?;
        self.voxels = voxels;
        Ok(())
    }

    /// Whether any cell holds a non-air voxel.
    pub fn has_solid_voxels(&self) -> bool {
        self.voxels.iter().any(|voxel| !voxel.is_air())
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|voxel| !voxel.is_air()).count()
    }

    /// Iterates the non-air voxels with their local positions, in storage order.
    pub fn iter_solid(&self) -> ChunkVoxelIterator<'_> {
        ChunkVoxelIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

    #[test]
    fn new_chunk_starts_unloaded_with_dirt() {
        let chunk = Chunk::new(2).unwrap();
        assert!(!chunk.is_loaded());
        assert!(!chunk.is_setup());
        assert!(!chunk.should_render());
        assert_eq!(chunk.voxels().len(), 8);
        assert!(chunk.voxels().iter().all(|v| v.voxel_type() == Some(VoxelType::Dirt)));
    }

    #[test]
    fn zero_edge_is_rejected() {
        assert_eq!(Chunk::new(0).unwrap_err(), ChunkError::ZeroEdge);
        assert_eq!(Chunk::from_voxels(0, Vec::new()).unwrap_err(), ChunkError::ZeroEdge);
    }

    #[test]
    fn oversized_edge_is_rejected_before_allocating() {
        let expected = ChunkError::EdgeTooLarge {
            edge: 3_000_000,
            max: MAX_CHUNK_EDGE,
        };
        assert_eq!(Chunk::new(3_000_000).unwrap_err(), expected);
        assert_eq!(Chunk::from_voxels(3_000_000, Vec::new()).unwrap_err(), expected);
    }

    #[test]
    fn mismatched_voxel_count_is_rejected() {
        let err = Chunk::from_voxels(2, vec![Voxel::default(); 7]).unwrap_err();
        assert_eq!(
            err,
            ChunkError::VoxelCountMismatch {
                edge: 2,
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn load_is_idempotent() {
        let mut chunk = Chunk::new(1).unwrap();
        chunk.load();
        let revision = chunk.mesh_revision();
        chunk.load();
        assert!(chunk.is_loaded());
        assert!(!chunk.is_setup());
        assert_eq!(chunk.mesh_revision(), revision);
    }

    #[test]
    fn setup_requires_loaded() {
        let mut chunk = Chunk::new(1).unwrap();
        chunk.setup();
        assert!(!chunk.is_setup());

        chunk.load();
        chunk.setup();
        assert!(chunk.is_setup());
        assert!(chunk.should_render());
    }

    #[test]
    fn all_air_chunk_does_not_render() {
        let mut chunk = Chunk::from_voxels(1, vec![Voxel::AIR]).unwrap();
        chunk.load();
        chunk.setup();
        assert!(chunk.is_setup());
        assert!(!chunk.should_render());
    }

    #[test]
    fn unload_clears_setup_and_releases_storage() {
        let mut chunk = Chunk::new(2).unwrap();
        chunk.load();
        chunk.setup();
        chunk.unload();
        assert!(!chunk.is_loaded());
        assert!(!chunk.is_setup());
        assert!(!chunk.should_render());
        assert!(chunk.voxels().is_empty());
        assert_eq!(chunk.voxel_at(0, 0, 0), None);

        chunk.load();
        assert_eq!(chunk.voxels().len(), 8);
    }

    #[test]
    fn rebuild_bumps_revision() {
        let mut chunk = Chunk::new(1).unwrap();
        chunk.load();
        chunk.setup();
        let before = chunk.mesh_revision();
        chunk.rebuild();
        assert_eq!(chunk.mesh_revision(), before + 1);
    }

    #[test]
    fn set_voxel_checks_bounds_and_state() {
        let mut chunk = Chunk::new(2).unwrap();
        assert_eq!(
            chunk.set_voxel(0, 0, 0, Voxel::AIR).unwrap_err(),
            ChunkError::NotLoaded
        );

        chunk.load();
        chunk.set_voxel(1, 0, 1, Voxel::AIR).unwrap();
        assert_eq!(chunk.voxel_at(1, 0, 1), Some(&Voxel::AIR));
        assert_eq!(chunk.solid_count(), 7);
        assert!(matches!(
            chunk.set_voxel(2, 0, 0, Voxel::AIR),
            Err(ChunkError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn index_and_position_agree() {
        let chunk = Chunk::new(3).unwrap();
        for index in 0..27 {
            let p = chunk.position_of(index);
            assert_eq!(chunk.index_of(p.x, p.y, p.z), Some(index));
        }
    }
}
