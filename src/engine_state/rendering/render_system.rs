//! # Voxel Render System
//!
//! Drives a [`World`] once per frame and turns its render list into draw
//! commands. Meshes come from a [`MeshManager`], so a chunk is only re-meshed
//! after it was rebuilt.
//!
//! The render pipeline, bind groups and camera uniforms belong to the caller.
//! [`VoxelRenderSystem::render`] only binds chunk buffers and issues draws,
//! handing each chunk's model transform to a callback first.

use cgmath::{Matrix4, Point3, Vector3};

use crate::engine_state::{
    config::WorldConfig,
    error::EngineError,
    voxels::world::{grid::ChunkId, FrameStats, World},
};

use super::meshing::{MeshBuilder, MeshManager, WgpuMeshBuilder};

/// One chunk to draw this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkDraw {
    /// The chunk being drawn
    pub chunk: ChunkId,
    /// Chunk-local to world transform
    pub transform: Matrix4<f32>,
}

/// Owns the world and the mesh cache, and prepares per-frame draws.
pub struct VoxelRenderSystem<B: MeshBuilder> {
    world: World,
    mesh_manager: MeshManager<B>,
    draws: Vec<ChunkDraw>,
}

impl<B: MeshBuilder> VoxelRenderSystem<B> {
    /// Creates the world described by `config`, meshing through `builder`.
    pub fn new(config: WorldConfig, builder: B) -> Result<Self, EngineError> {
        let world = World::new(config)?;
        Ok(Self::with_world(world, builder))
    }

    /// Wraps an existing world.
    pub fn with_world(world: World, builder: B) -> Self {
        let capacity = world.config().mesh_cache_capacity;
        VoxelRenderSystem {
            world,
            mesh_manager: MeshManager::new(builder, capacity),
            draws: Vec::new(),
        }
    }

    /// Advances the world and prepares the draws of this frame.
    ///
    /// # Errors
    /// Mesh resource creation failures are propagated as-is and not retried.
    pub fn update(
        &mut self,
        delta_time: f32,
        camera_position: Point3<f32>,
        camera_view: Vector3<f32>,
    ) -> Result<FrameStats, EngineError> {
        let stats = self.world.update(delta_time, camera_position, camera_view);

        if stats.unloaded > 0 {
            self.mesh_manager.evict_stale(self.world.chunks());
        }

        self.draws.clear();
        for (id, chunk) in self.world.render_chunks() {
            self.mesh_manager.prepare(id, chunk)?;
            self.draws.push(ChunkDraw {
                chunk: id,
                transform: self.world.chunk_transform(id),
            });
        }

        Ok(stats)
    }

    /// Draws prepared by the latest update, in render-list order.
    pub fn draws(&self) -> &[ChunkDraw] {
        &self.draws
    }

    /// Each prepared draw with its cached mesh.
    pub fn meshes(&self) -> impl Iterator<Item = (&ChunkDraw, &B::Mesh)> + '_ {
        self.draws.iter().filter_map(move |draw| {
            self.mesh_manager
                .mesh(draw.chunk)
                .map(|mesh| (draw, mesh))
        })
    }

    /// The streamed world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for edits and queue requests between frames.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The mesh cache.
    pub fn mesh_manager(&self) -> &MeshManager<B> {
        &self.mesh_manager
    }
}

impl VoxelRenderSystem<WgpuMeshBuilder> {
    /// Records the draw calls of every prepared chunk into `render_pass`.
    ///
    /// `set_transform` is called before each chunk's draw so the caller can
    /// write the model matrix (push constants, a uniform, a dynamic offset).
    pub fn render<F>(&self, render_pass: &mut wgpu::RenderPass<'_>, mut set_transform: F)
    where
        F: FnMut(&mut wgpu::RenderPass<'_>, &Matrix4<f32>),
    {
        for (draw, mesh) in self.meshes() {
            if mesh.is_empty() {
                continue;
            }
            set_transform(&mut *render_pass, &draw.transform);
            mesh.draw(render_pass);
        }
    }
}
