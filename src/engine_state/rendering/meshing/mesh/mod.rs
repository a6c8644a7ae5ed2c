//! Geometry generation for voxel chunks.
//!
//! # Architecture
//! - [`Mesh`]: Flat vertex and index buffers for one chunk
//! - [`Face`]: A single unit quad on one side of a voxel
//!
//! # Usage
//! ```
//! use voxel_world::engine_state::{
//!     rendering::meshing::Mesh,
//!     voxels::chunk::Chunk,
//! };
//!
//! let mut chunk = Chunk::new(2).unwrap();
//! chunk.load();
//! let mesh = Mesh::generate(&chunk);
//! assert_eq!(mesh.vertex_count(), 8 * 24);
//! ```

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::{Face, QUAD_INDICES};
pub use mesh::*;
