//! # Voxel Task System
//!
//! Background population of chunk voxel data. The world publishes a request
//! when it loads a chunk, a worker thread asks a [`VoxelSource`] for the data,
//! and the world collects finished results at the start of the next frame, on
//! its own thread. Chunk state is never touched by the worker.

pub mod async_chunker;

pub use async_chunker::{AsyncChunker, ChunkPopulation, VoxelSource};
