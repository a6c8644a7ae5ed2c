//! Mesh generation and management for voxel rendering.
//!
//! # Architecture
//! - `mesh/`: Converts chunk voxel data into vertex and index buffers
//! - [`MeshBuilder`]: Turns a chunk into whatever mesh representation a backend draws
//! - [`CpuMeshBuilder`]: Keeps meshes in host memory
//! - [`WgpuMeshBuilder`]: Uploads meshes into GPU buffers
//! - [`MeshManager`]: Caches built meshes per chunk and rebuilds them when stale
//!
//! # Caching
//! Each cached mesh is tagged with the chunk's mesh revision at build time.
//! A chunk whose revision moved on (it was rebuilt or unloaded since) gets a
//! fresh mesh the next time it is drawn. The cache is an LRU bounded by
//! `mesh_cache_capacity`, so chunks that have not been drawn for a while give
//! their memory back first.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::engine_state::{
    error::EngineError,
    voxels::{chunk::Chunk, world::grid::ChunkId},
};

mod gpu_mesh;
pub mod mesh;

pub use gpu_mesh::{GpuMesh, WgpuMeshBuilder, CHUNK_INDEX_BUFFER, CHUNK_VERTEX_BUFFER};
pub use mesh::{Face, Mesh, INDICES_PER_VOXEL, VERTICES_PER_VOXEL};

/// Produces a drawable mesh from a chunk.
pub trait MeshBuilder {
    /// The mesh representation this builder produces.
    type Mesh;

    /// Builds the mesh of `chunk`.
    ///
    /// # Errors
    /// Resource creation failures are fatal for the frame and are not retried.
    fn build_mesh(&mut self, chunk: &Chunk) -> Result<Self::Mesh, EngineError>;
}

/// Builds host-memory meshes. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuMeshBuilder;

impl MeshBuilder for CpuMeshBuilder {
    type Mesh = Mesh;

    fn build_mesh(&mut self, chunk: &Chunk) -> Result<Mesh, EngineError> {
        Ok(Mesh::generate(chunk))
    }
}

struct CachedMesh<M> {
    revision: u64,
    mesh: M,
}

/// LRU cache of chunk meshes keyed by [`ChunkId`].
pub struct MeshManager<B: MeshBuilder> {
    builder: B,
    /// Meshes tagged with the chunk revision they were built from
    least_recently_drawn_chunks: LruCache<ChunkId, CachedMesh<B::Mesh>>,
    meshes_built: u64,
}

impl<B: MeshBuilder> MeshManager<B> {
    /// Creates an empty cache holding at most `capacity` meshes (at least one).
    pub fn new(builder: B, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MeshManager {
            builder,
            least_recently_drawn_chunks: LruCache::new(capacity),
            meshes_built: 0,
        }
    }

    /// Makes sure a current mesh of `chunk` is cached, building it if missing or stale.
    ///
    /// Returns `true` if a mesh was built.
    pub fn prepare(&mut self, id: ChunkId, chunk: &Chunk) -> Result<bool, EngineError> {
        let revision = chunk.mesh_revision();
        if let Some(cached) = self.least_recently_drawn_chunks.get(&id) {
            if cached.revision == revision {
                return Ok(false);
            }
        }

        let mesh = self.builder.build_mesh(chunk)?;
        if let Some((evicted, _)) = self
            .least_recently_drawn_chunks
            .push(id, CachedMesh { revision, mesh })
            .filter(|(evicted, _)| *evicted != id)
        {
            log::trace!("Mesh cache full, evicted chunk {evicted:?}");
        }
        self.meshes_built += 1;
        Ok(true)
    }

    /// Drops the meshes of chunks that are no longer set up. Returns how many were dropped.
    pub fn evict_stale(&mut self, chunks: &[Chunk]) -> usize {
        let stale: Vec<ChunkId> = self
            .least_recently_drawn_chunks
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !chunks.get(id.index()).is_some_and(Chunk::is_setup))
            .collect();

        for id in &stale {
            self.least_recently_drawn_chunks.pop(id);
        }
        if !stale.is_empty() {
            log::debug!("Evicted {} meshes of chunks no longer set up", stale.len());
        }
        stale.len()
    }

    /// The cached mesh of a chunk, without touching its recency.
    pub fn mesh(&self, id: ChunkId) -> Option<&B::Mesh> {
        self.least_recently_drawn_chunks
            .peek(&id)
            .map(|cached| &cached.mesh)
    }

    /// Whether a mesh of the chunk is cached.
    pub fn contains(&self, id: ChunkId) -> bool {
        self.least_recently_drawn_chunks.contains(&id)
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.least_recently_drawn_chunks.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.least_recently_drawn_chunks.is_empty()
    }

    /// Total number of meshes built since creation.
    pub fn meshes_built(&self) -> u64 {
        self.meshes_built
    }

    /// The builder backing this cache.
    pub fn builder(&self) -> &B {
        &self.builder
    }
}
