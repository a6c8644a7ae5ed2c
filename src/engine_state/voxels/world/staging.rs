//! # Staging Lists
//!
//! Per-frame work queues of the world pipeline. Every list holds [`ChunkId`]s
//! into the world's chunk storage, so a lifecycle call made while draining a
//! list always lands on the grid-resident chunk.

use super::grid::ChunkId;

/// A queued geometry rebuild.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RebuildRequest {
    /// Chunk to rebuild
    pub chunk: ChunkId,
    /// Whether the rebuild should dirty the chunk's neighbours once done.
    /// Rebuilds caused by a neighbour never propagate further.
    pub propagate: bool,
}

/// The transient lists the world drains each frame.
#[derive(Debug, Default)]
pub struct StagingLists {
    /// Chunks to load
    pub load: Vec<ChunkId>,
    /// Loaded chunks to set up
    pub setup: Vec<ChunkId>,
    /// Setup chunks whose geometry must be regenerated
    pub rebuild: Vec<RebuildRequest>,
    /// Rebuilt chunks whose neighbours must be dirtied
    pub flags: Vec<ChunkId>,
    /// Chunks that left the visibility radius
    pub unload: Vec<ChunkId>,
    /// Loaded and setup chunks inside the radius at the latest scan
    pub visibility: Vec<ChunkId>,
}

impl StagingLists {
    /// Queues a rebuild, merging with an already queued request for the same chunk.
    pub fn queue_rebuild(&mut self, chunk: ChunkId, propagate: bool) {
        match self.rebuild.iter_mut().find(|request| request.chunk == chunk) {
            Some(existing) => existing.propagate |= propagate,
            None => self.rebuild.push(RebuildRequest { chunk, propagate }),
        }
    }

    /// Whether the lists drained every frame are all empty.
    pub fn is_drained(&self) -> bool {
        self.load.is_empty()
            && self.setup.is_empty()
            && self.rebuild.is_empty()
            && self.flags.is_empty()
            && self.unload.is_empty()
    }
}

/// Pushes `id` unless it is already queued.
pub fn push_unique(list: &mut Vec<ChunkId>, id: ChunkId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// Splits `list` at `budget` entries, keeping the ones nearest to the camera.
///
/// Lists within budget keep their queue order. Over-budget lists are ordered by
/// `distance` (ascending, ties broken by lower chunk id) before the split.
/// Returns the entries past the budget, nearest first.
pub fn apply_budget<T>(
    list: &mut Vec<T>,
    budget: Option<usize>,
    chunk_of: impl Fn(&T) -> ChunkId,
    distance: impl Fn(ChunkId) -> f32,
) -> Vec<T> {
    let Some(budget) = budget else {
        return Vec::new();
    };
    if list.len() <= budget {
        return Vec::new();
    }

    list.sort_by(|a, b| {
        let (a, b) = (chunk_of(a), chunk_of(b));
        distance(a)
            .total_cmp(&distance(b))
            .then_with(|| a.cmp(&b))
    });
    list.split_off(budget)
}
