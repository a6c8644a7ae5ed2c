//! # World Module
//!
//! This module provides the `World` struct, which owns a fixed cubic grid of
//! chunks and runs the per-frame staged pipeline deciding which chunks are
//! loaded, set up, rebuilt, unloaded and drawn.
//!
//! ## Frame Pipeline
//!
//! [`World::update`] runs the stages in a fixed order:
//!
//! 1. async chunker: collect voxel data finished off-thread
//! 2. load list
//! 3. setup list
//! 4. rebuild list
//! 5. flags list: dirty the neighbours of rebuilt chunks
//! 6. unload list
//! 7. visibility scan (only when forced)
//!
//! and finally rebuilds the render list if the camera moved or the scan ran.
//!
//! Each list stage drains its list completely. A chunk whose transition does
//! not apply is dropped without being requeued; the next visibility scan picks
//! it up again. Any transition forces the next scan.
//!
//! Per-frame budgets hold back the farthest entries. Held-back loads and setups
//! are dropped and re-queued by the forced scan; held-back rebuilds stay in the
//! rebuild list for the next frame.
//!
//! ## Storage
//!
//! Chunks live in one vector indexed by [`ChunkId`]. Staging lists only hold ids,
//! so every lifecycle call lands on the grid-resident chunk.

use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};

use crate::engine_state::{
    config::WorldConfig,
    error::{ConfigError, EngineError},
    voxels::{
        chunk::Chunk,
        tasks::{AsyncChunker, VoxelSource},
        voxel::Voxel,
    },
};

use grid::{ChunkId, WorldGrid};
use staging::{apply_budget, push_unique, RebuildRequest, StagingLists};

pub mod grid;
pub mod staging;

/// What a single [`World::update`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Voxel populations applied by the async stage
    pub populated: usize,
    /// Chunks loaded
    pub loaded: usize,
    /// Chunks set up
    pub setup: usize,
    /// Chunks rebuilt
    pub rebuilt: usize,
    /// Neighbour rebuilds queued by the flags stage
    pub flagged: usize,
    /// Chunks unloaded
    pub unloaded: usize,
    /// Queue entries held back by per-frame budgets
    pub deferred: usize,
    /// Whether the visibility scan ran
    pub visibility_scanned: bool,
    /// Whether the render list was rebuilt
    pub render_list_updated: bool,
}

/// A cubic grid of chunks plus the pipeline that streams them in and out.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_world::{World, WorldConfig};
///
/// let mut world = World::new(WorldConfig::default()).unwrap();
/// let camera = Point3::new(0.0, 0.0, 0.0);
/// let view = Vector3::new(0.0, 0.0, -1.0);
///
/// // Scan, load, set up: three frames until the first chunks are drawable.
/// for _ in 0..3 {
///     world.update(0.016, camera, view);
/// }
/// assert!(!world.render_list().is_empty());
/// ```
pub struct World {
    config: WorldConfig,
    grid: WorldGrid,
    /// Authoritative chunk storage, indexed by `ChunkId`.
    chunks: Vec<Chunk>,
    /// Chunks eligible for drawing, valid until the next `update`.
    render_list: Vec<ChunkId>,
    staging: StagingLists,
    /// Which chunks were inside the radius at the latest scan.
    in_radius: Vec<bool>,
    camera_position: Option<Point3<f32>>,
    camera_view: Option<Vector3<f32>>,
    force_visibility_update: bool,
    async_chunker: Option<AsyncChunker>,
    last_frame: FrameStats,
}

impl World {
    /// Creates a world of `world_edge³` unloaded chunks.
    ///
    /// # Errors
    /// Fails if the configuration does not validate.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = WorldGrid::new(config.world_edge, config.chunk_edge);
        let chunks = (0..grid.chunk_count())
            .map(|_| Chunk::new(config.chunk_edge))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        log::info!(
            "Created world of {} chunks ({}³ grid, chunk edge {}, visibility radius {})",
            grid.chunk_count(),
            config.world_edge,
            config.chunk_edge,
            config.visibility_radius
        );

        Ok(World {
            in_radius: vec![false; grid.chunk_count()],
            config,
            grid,
            chunks,
            render_list: Vec::new(),
            staging: StagingLists::default(),
            camera_position: None,
            camera_view: None,
            force_visibility_update: true,
            async_chunker: None,
            last_frame: FrameStats::default(),
        })
    }

    /// Routes voxel population of newly loaded chunks through `source` on a worker thread.
    pub fn attach_source(&mut self, source: Arc<dyn VoxelSource>) {
        self.async_chunker = Some(AsyncChunker::new(source));
    }

    /// Advances the world by one frame.
    ///
    /// Must be called once per rendered frame, after the camera has been
    /// updated and before the render pass reads [`World::render_list`].
    pub fn update(
        &mut self,
        delta_time: f32,
        camera_position: Point3<f32>,
        camera_view: Vector3<f32>,
    ) -> FrameStats {
        let mut stats = FrameStats::default();

        let camera_moved = self.camera_position != Some(camera_position);
        let camera_changed = camera_moved || self.camera_view != Some(camera_view);
        if camera_moved {
            self.force_visibility_update = true;
        }

        self.update_async_chunker(&mut stats);
        self.update_load_list(camera_position, &mut stats);
        self.update_setup_list(camera_position, &mut stats);
        self.update_rebuild_list(camera_position, &mut stats);
        self.update_flags_list(&mut stats);
        self.update_unload_list(&mut stats);
        stats.visibility_scanned = self.update_visibility_list(camera_position);

        if camera_changed || stats.visibility_scanned {
            self.update_render_list();
            stats.render_list_updated = true;
        }

        self.camera_position = Some(camera_position);
        self.camera_view = Some(camera_view);

        log::trace!("World update (dt {delta_time:.4}s): {stats:?}");
        self.last_frame = stats;
        stats
    }

    /// Applies voxel data produced off-thread to chunks that are still loaded.
    fn update_async_chunker(&mut self, stats: &mut FrameStats) {
        let completed = match self.async_chunker.as_mut() {
            Some(chunker) => chunker.poll_completed(),
            None => return,
        };

        for population in completed {
            let id = population.chunk;
            let chunk = &mut self.chunks[id.index()];
            if !chunk.is_loaded() {
                log::trace!("Discarding population for unloaded chunk {id:?}");
                continue;
            }
            if let Err(err) = chunk.fill_voxels(population.voxels) {
                log::warn!("Dropping population for chunk {id:?}: {err}");
                continue;
            }

            let needs_rebuild = chunk.is_setup();
            if needs_rebuild {
                self.staging.queue_rebuild(id, true);
            }
            stats.populated += 1;
            self.force_visibility_update = true;
        }
    }

    /// Loads every queued chunk that is not loaded yet.
    fn update_load_list(&mut self, camera_position: Point3<f32>, stats: &mut FrameStats) {
        let mut load_list = std::mem::take(&mut self.staging.load);
        let deferred = self.defer_over_budget(
            &mut load_list,
            self.config.max_loads_per_frame,
            |id| *id,
            camera_position,
            stats,
        );
        if !deferred.is_empty() {
            // The next scan queues them again.
            self.force_visibility_update = true;
        }

        for id in load_list {
            let chunk = &mut self.chunks[id.index()];
            if chunk.is_loaded() {
                continue;
            }
            chunk.load();
            log::trace!("Loaded chunk {id:?}");
            stats.loaded += 1;
            self.force_visibility_update = true;

            if let Some(chunker) = self.async_chunker.as_mut() {
                chunker.request(id, self.grid.position_of(id), self.grid.chunk_edge());
            }
        }
    }

    /// Sets up every queued chunk that is loaded but not set up.
    fn update_setup_list(&mut self, camera_position: Point3<f32>, stats: &mut FrameStats) {
        let mut setup_list = std::mem::take(&mut self.staging.setup);
        let deferred = self.defer_over_budget(
            &mut setup_list,
            self.config.max_setups_per_frame,
            |id| *id,
            camera_position,
            stats,
        );
        if !deferred.is_empty() {
            self.force_visibility_update = true;
        }

        for id in setup_list {
            let chunk = &mut self.chunks[id.index()];
            if !chunk.is_loaded() || chunk.is_setup() {
                continue;
            }
            chunk.setup();
            if chunk.is_setup() {
                log::trace!("Set up chunk {id:?}");
                stats.setup += 1;
                self.force_visibility_update = true;
            }
        }
    }

    /// Rebuilds every queued chunk that is loaded and set up.
    ///
    /// Requests over the rebuild budget stay queued for the next frame. The
    /// scan never produces rebuilds, so they cannot be dropped like loads.
    fn update_rebuild_list(&mut self, camera_position: Point3<f32>, stats: &mut FrameStats) {
        let mut rebuild_list = std::mem::take(&mut self.staging.rebuild);
        let deferred = self.defer_over_budget(
            &mut rebuild_list,
            self.config.max_rebuilds_per_frame,
            |request: &RebuildRequest| request.chunk,
            camera_position,
            stats,
        );

        for RebuildRequest { chunk: id, propagate } in rebuild_list {
            let chunk = &mut self.chunks[id.index()];
            if !(chunk.is_loaded() && chunk.is_setup()) {
                continue;
            }
            chunk.rebuild();
            if propagate {
                push_unique(&mut self.staging.flags, id);
            }
            log::trace!("Rebuilt chunk {id:?}");
            stats.rebuilt += 1;
            self.force_visibility_update = true;
        }

        for RebuildRequest { chunk, propagate } in deferred {
            self.staging.queue_rebuild(chunk, propagate);
        }
    }

    /// Queues a non-propagating rebuild for the live neighbours of every flagged chunk.
    fn update_flags_list(&mut self, stats: &mut FrameStats) {
        let flags_list = std::mem::take(&mut self.staging.flags);

        for id in flags_list {
            let neighbors: Vec<ChunkId> = self.grid.neighbors(id).collect();
            for neighbor in neighbors {
                let chunk = &self.chunks[neighbor.index()];
                if chunk.is_loaded() && chunk.is_setup() {
                    self.staging.queue_rebuild(neighbor, false);
                    stats.flagged += 1;
                }
            }
        }
    }

    /// Unloads every queued chunk that is still loaded.
    fn update_unload_list(&mut self, stats: &mut FrameStats) {
        let unload_list = std::mem::take(&mut self.staging.unload);

        for id in unload_list {
            let chunk = &mut self.chunks[id.index()];
            if !chunk.is_loaded() {
                continue;
            }
            chunk.unload();
            log::trace!("Unloaded chunk {id:?}");
            stats.unloaded += 1;
            self.force_visibility_update = true;
        }
    }

    /// Re-scans the grid against the camera when forced.
    ///
    /// In-radius chunks are routed by state into the load, setup or visibility
    /// list. Loaded chunks that were in radius at the previous scan and are not
    /// anymore are queued for unload. Returns whether the scan ran.
    fn update_visibility_list(&mut self, camera_position: Point3<f32>) -> bool {
        if !self.force_visibility_update {
            return false;
        }
        self.force_visibility_update = false;
        self.staging.visibility.clear();

        let radius = self.config.visibility_radius;
        for id in self.grid.ids() {
            let inside = self.grid.distance_to(id, camera_position) < radius;
            let was_inside = std::mem::replace(&mut self.in_radius[id.index()], inside);
            let chunk = &self.chunks[id.index()];

            if inside {
                if !chunk.is_loaded() {
                    push_unique(&mut self.staging.load, id);
                } else if !chunk.is_setup() {
                    push_unique(&mut self.staging.setup, id);
                } else {
                    self.staging.visibility.push(id);
                }
            } else if was_inside && chunk.is_loaded() {
                push_unique(&mut self.staging.unload, id);
            }
        }

        log::debug!(
            "Visibility scan: {} to load, {} to setup, {} visible, {} exited radius",
            self.staging.load.len(),
            self.staging.setup.len(),
            self.staging.visibility.len(),
            self.staging.unload.len()
        );
        true
    }

    /// Rebuilds the render list from the visibility list.
    fn update_render_list(&mut self) {
        self.render_list.clear();
        for &id in &self.staging.visibility {
            let chunk = &self.chunks[id.index()];
            // Frustum culling would filter here.
            if chunk.is_loaded() && chunk.is_setup() && chunk.should_render() {
                self.render_list.push(id);
            }
        }
    }

    /// Cuts an over-budget list down to its nearest entries and returns the rest.
    fn defer_over_budget<T>(
        &self,
        list: &mut Vec<T>,
        budget: Option<usize>,
        chunk_of: impl Fn(&T) -> ChunkId,
        camera_position: Point3<f32>,
        stats: &mut FrameStats,
    ) -> Vec<T> {
        let grid = self.grid;
        let deferred = apply_budget(list, budget, chunk_of, |id| {
            grid.distance_to(id, camera_position)
        });
        if !deferred.is_empty() {
            log::debug!("Deferred {} chunks over the per-frame budget", deferred.len());
            stats.deferred += deferred.len();
        }
        deferred
    }

    /// Queues a chunk for loading on the next frame.
    pub fn queue_load(&mut self, id: ChunkId) -> bool {
        if !self.grid.contains(id) {
            return false;
        }
        push_unique(&mut self.staging.load, id);
        true
    }

    /// Queues a chunk for setup on the next frame.
    pub fn queue_setup(&mut self, id: ChunkId) -> bool {
        if !self.grid.contains(id) {
            return false;
        }
        push_unique(&mut self.staging.setup, id);
        true
    }

    /// Queues a chunk for unloading on the next frame.
    pub fn queue_unload(&mut self, id: ChunkId) -> bool {
        if !self.grid.contains(id) {
            return false;
        }
        push_unique(&mut self.staging.unload, id);
        true
    }

    /// Queues a geometry rebuild that also dirties the chunk's neighbours.
    pub fn request_rebuild(&mut self, id: ChunkId) -> bool {
        if !self.grid.contains(id) {
            return false;
        }
        self.staging.queue_rebuild(id, true);
        true
    }

    /// Writes a voxel at a world-space voxel position and queues the owning chunk
    /// for rebuild if it is set up.
    ///
    /// # Errors
    /// Fails if the position is outside the world or the chunk is not loaded.
    pub fn set_voxel(&mut self, position: Point3<i64>, voxel: Voxel) -> Result<(), EngineError> {
        let (id, local) = self
            .grid
            .locate_voxel(position)
            .ok_or(EngineError::OutsideWorld(position))?;
        let chunk = &mut self.chunks[id.index()];
        chunk.set_voxel(local.x, local.y, local.z, voxel)?;
        if chunk.is_setup() {
            self.staging.queue_rebuild(id, true);
        }
        Ok(())
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Grid dimensions and index conversions.
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// All chunks, indexed by [`ChunkId`].
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The chunk with the given id.
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.index())
    }

    /// Chunks to draw this frame. Valid until the next [`World::update`].
    pub fn render_list(&self) -> &[ChunkId] {
        &self.render_list
    }

    /// The render list paired with the chunks it refers to.
    pub fn render_chunks(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> + '_ {
        self.render_list
            .iter()
            .map(move |&id| (id, &self.chunks[id.index()]))
    }

    /// Model transform of a chunk: its grid position scaled by the chunk edge.
    pub fn chunk_transform(&self, id: ChunkId) -> Matrix4<f32> {
        self.grid.chunk_transform(id)
    }

    /// Chunks queued for loading.
    pub fn load_list(&self) -> &[ChunkId] {
        &self.staging.load
    }

    /// Chunks queued for setup.
    pub fn setup_list(&self) -> &[ChunkId] {
        &self.staging.setup
    }

    /// Queued rebuilds.
    pub fn rebuild_list(&self) -> &[RebuildRequest] {
        &self.staging.rebuild
    }

    /// Chunks whose neighbours will be dirtied.
    pub fn flags_list(&self) -> &[ChunkId] {
        &self.staging.flags
    }

    /// Chunks queued for unloading.
    pub fn unload_list(&self) -> &[ChunkId] {
        &self.staging.unload
    }

    /// Loaded and set-up chunks inside the radius at the latest scan.
    pub fn visibility_list(&self) -> &[ChunkId] {
        &self.staging.visibility
    }

    /// Whether the next update will re-scan visibility regardless of camera motion.
    pub fn is_visibility_update_forced(&self) -> bool {
        self.force_visibility_update
    }

    /// Statistics of the most recent update.
    pub fn frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    /// Whether the next update has nothing to do for an unchanged camera.
    pub fn is_idle(&self) -> bool {
        self.staging.is_drained() && !self.force_visibility_update && self.pending_populations() == 0
    }

    /// Population requests still being processed off-thread.
    pub fn pending_populations(&self) -> usize {
        self.async_chunker
            .as_ref()
            .map_or(0, |chunker| chunker.in_flight())
    }
}
