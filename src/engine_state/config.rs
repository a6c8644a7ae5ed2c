//! # World Configuration
//!
//! Runtime configuration for the voxel world. Grid dimensions are passed into
//! [`World::new`](super::voxels::world::World::new) instead of being baked in,
//! so small worlds can be built in tests and larger ones loaded from JSON.
//!
//! ```json
//! {
//!     "chunk_edge": 16,
//!     "world_edge": 8,
//!     "visibility_radius": 4.0,
//!     "max_loads_per_frame": 4
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{error::ConfigError, voxels::chunk::MAX_CHUNK_EDGE};

/// Default number of voxels along one chunk edge.
pub const DEFAULT_CHUNK_EDGE: usize = 1;
/// Default number of chunks along one world edge.
pub const DEFAULT_WORLD_EDGE: usize = 2;
/// Default distance (in grid units) within which chunks are kept loaded.
pub const DEFAULT_VISIBILITY_RADIUS: f32 = 4.0;
/// Default number of chunk meshes kept resident by the mesh cache.
pub const DEFAULT_MESH_CACHE_CAPACITY: usize = 1024;
/// Largest accepted world, in voxels across all chunks.
pub const MAX_WORLD_VOXELS: usize = 1 << 30;

/// Configuration for a [`World`](super::voxels::world::World) and its render system.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels along one edge of a chunk.
    pub chunk_edge: usize,
    /// Chunks along one edge of the world grid.
    pub world_edge: usize,
    /// Chunks strictly closer than this (grid units) to the camera are kept active.
    pub visibility_radius: f32,
    /// Upper bound on chunk loads per frame. `None` processes the whole list.
    pub max_loads_per_frame: Option<usize>,
    /// Upper bound on chunk setups per frame. `None` processes the whole list.
    pub max_setups_per_frame: Option<usize>,
    /// Upper bound on chunk rebuilds per frame. `None` processes the whole list.
    pub max_rebuilds_per_frame: Option<usize>,
    /// Number of chunk meshes the render system keeps before evicting the least recently drawn.
    pub mesh_cache_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_edge: DEFAULT_CHUNK_EDGE,
            world_edge: DEFAULT_WORLD_EDGE,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            max_loads_per_frame: None,
            max_setups_per_frame: None,
            max_rebuilds_per_frame: None,
            mesh_cache_capacity: DEFAULT_MESH_CACHE_CAPACITY,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded world config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Checks that the configuration describes a world that can run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_edge == 0 {
            return Err(ConfigError::Invalid("chunk_edge must be non-zero".into()));
        }
        if self.world_edge == 0 {
            return Err(ConfigError::Invalid("world_edge must be non-zero".into()));
        }
        if self.chunk_edge > MAX_CHUNK_EDGE {
            return Err(ConfigError::Invalid(format!(
                "chunk_edge {} exceeds the maximum of {MAX_CHUNK_EDGE}",
                self.chunk_edge
            )));
        }
        let world_voxels = self
            .chunk_count()
            .zip(self.voxels_per_chunk())
            .and_then(|(chunks, voxels)| chunks.checked_mul(voxels))
            .filter(|&total| total <= MAX_WORLD_VOXELS);
        if world_voxels.is_none() {
            return Err(ConfigError::Invalid(format!(
                "a world of {}³ chunks of edge {} exceeds {MAX_WORLD_VOXELS} voxels",
                self.world_edge, self.chunk_edge
            )));
        }
        if !self.visibility_radius.is_finite() || self.visibility_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "visibility_radius must be positive and finite, got {}",
                self.visibility_radius
            )));
        }
        for (name, budget) in [
            ("max_loads_per_frame", self.max_loads_per_frame),
            ("max_setups_per_frame", self.max_setups_per_frame),
            ("max_rebuilds_per_frame", self.max_rebuilds_per_frame),
        ] {
            if budget == Some(0) {
                return Err(ConfigError::Invalid(format!("{name} must be non-zero when set")));
            }
        }
        if self.mesh_cache_capacity == 0 {
            return Err(ConfigError::Invalid("mesh_cache_capacity must be non-zero".into()));
        }
        Ok(())
    }

    /// Total number of chunks in the grid (`world_edge³`), `None` on overflow.
    pub fn chunk_count(&self) -> Option<usize> {
        self.world_edge.checked_pow(3)
    }

    /// Total number of voxels in one chunk (`chunk_edge³`), `None` on overflow.
    pub fn voxels_per_chunk(&self) -> Option<usize> {
        self.chunk_edge.checked_pow(3)
    }
}
