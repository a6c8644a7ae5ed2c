//! # Voxel World Core
//!
//! Representation and streaming of the voxel world.
//!
//! ## Architecture
//!
//! * **Voxel**: The cell value type and its face geometry
//! * **Chunk**: A fixed-size cube of voxels with load/setup lifecycle flags
//! * **World**: The chunk grid and the per-frame staging pipeline
//! * **Tasks**: Off-thread population of freshly loaded chunks
//!
//! ## Data Flow
//!
//! 1. The visibility scan queues chunks near the camera for loading and setup
//! 2. Loading may publish a population request to the async chunker
//! 3. Rebuilds bump a chunk's mesh revision, which the mesh cache notices
//! 4. The render list names the chunks the renderer draws this frame

pub mod chunk;
pub mod tasks;
pub mod voxel;
pub mod world;
