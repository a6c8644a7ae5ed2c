//! # World Grid
//!
//! Index arithmetic for the cubic chunk grid. A chunk is identified by its
//! linear index `x + y * edge + z * edge²`, wrapped in [`ChunkId`] so staging
//! lists can refer to grid-resident chunks without copying them.

use cgmath::{Matrix4, MetricSpace, Point3, Vector3};

use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;

/// Stable identifier of a chunk: its linear index in the world grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub usize);

impl ChunkId {
    /// The linear grid index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dimensions of the chunk grid and the conversions between ids and positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldGrid {
    /// Chunks along one world edge
    edge: usize,
    /// Voxels along one chunk edge
    chunk_edge: usize,
}

impl WorldGrid {
    /// Creates a grid of `edge³` chunks of `chunk_edge³` voxels.
    pub fn new(edge: usize, chunk_edge: usize) -> Self {
        WorldGrid { edge, chunk_edge }
    }

    /// Chunks along one world edge.
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Voxels along one chunk edge.
    pub fn chunk_edge(&self) -> usize {
        self.chunk_edge
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.edge * self.edge * self.edge
    }

    /// Whether the id addresses a chunk of this grid.
    pub fn contains(&self, id: ChunkId) -> bool {
        id.index() < self.chunk_count()
    }

    /// Every chunk id in linear order.
    pub fn ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        (0..self.chunk_count()).map(ChunkId)
    }

    /// Grid-space position of a chunk.
    pub fn position_of(&self, id: ChunkId) -> Point3<i32> {
        let index = id.index();
        Point3::new(
            (index % self.edge) as i32,
            ((index / self.edge) % self.edge) as i32,
            ((index / (self.edge * self.edge)) % self.edge) as i32,
        )
    }

    /// The chunk at a grid-space position, if inside the grid.
    pub fn id_at(&self, position: Point3<i32>) -> Option<ChunkId> {
        let edge = self.edge as i32;
        let inside = |c: i32| (0..edge).contains(&c);
        if !(inside(position.x) && inside(position.y) && inside(position.z)) {
            return None;
        }
        Some(ChunkId(
            position.x as usize
                + position.y as usize * self.edge
                + position.z as usize * self.edge * self.edge,
        ))
    }

    /// The face-adjacent chunks of `id` that exist in the grid.
    pub fn neighbors(&self, id: ChunkId) -> impl Iterator<Item = ChunkId> + '_ {
        let position = self.position_of(id);
        VoxelSide::all()
            .into_iter()
            .filter_map(move |side| self.id_at(position + side.normal()))
    }

    /// Euclidean distance in grid units between a chunk's grid position and `point`.
    pub fn distance_to(&self, id: ChunkId, point: Point3<f32>) -> f32 {
        let position = self.position_of(id);
        Point3::new(position.x as f32, position.y as f32, position.z as f32).distance(point)
    }

    /// World-space origin of a chunk (`gridPosition * chunkEdge`).
    pub fn chunk_origin(&self, id: ChunkId) -> Vector3<f32> {
        let position = self.position_of(id);
        Vector3::new(position.x as f32, position.y as f32, position.z as f32)
            * self.chunk_edge as f32
    }

    /// Model transform placing a chunk's local geometry in world space.
    pub fn chunk_transform(&self, id: ChunkId) -> Matrix4<f32> {
        Matrix4::from_translation(self.chunk_origin(id))
    }

    /// Splits a world-space voxel position into its chunk and local coordinates.
    pub fn locate_voxel(&self, position: Point3<i64>) -> Option<(ChunkId, Point3<usize>)> {
        let chunk_edge = self.chunk_edge as i64;
        let world_extent = chunk_edge * self.edge as i64;
        let inside = |c: i64| (0..world_extent).contains(&c);
        if !(inside(position.x) && inside(position.y) && inside(position.z)) {
            return None;
        }
        let chunk_position = Point3::new(
            position.x.div_euclid(chunk_edge) as i32,
            position.y.div_euclid(chunk_edge) as i32,
            position.z.div_euclid(chunk_edge) as i32,
        );
        let local = Point3::new(
            position.x.rem_euclid(chunk_edge) as usize,
            position.y.rem_euclid(chunk_edge) as usize,
            position.z.rem_euclid(chunk_edge) as usize,
        );
        self.id_at(chunk_position).map(|id| (id, local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn linear_index_round_trips() {
        let grid = WorldGrid::new(3, 1);
        for id in grid.ids() {
            assert_eq!(grid.id_at(grid.position_of(id)), Some(id));
        }
        assert_eq!(grid.position_of(ChunkId(0)), Point3::new(0, 0, 0));
        assert_eq!(grid.position_of(ChunkId(1)), Point3::new(1, 0, 0));
        assert_eq!(grid.position_of(ChunkId(3)), Point3::new(0, 1, 0));
        assert_eq!(grid.position_of(ChunkId(9)), Point3::new(0, 0, 1));
    }

    #[test]
    fn out_of_grid_positions_have_no_id() {
        let grid = WorldGrid::new(2, 1);
        assert_eq!(grid.id_at(Point3::new(-1, 0, 0)), None);
        assert_eq!(grid.id_at(Point3::new(0, 2, 0)), None);
        assert!(!grid.contains(ChunkId(8)));
    }

    #[test]
    fn corner_has_three_neighbors_and_centre_six() {
        let grid = WorldGrid::new(3, 1);
        let mut corner: Vec<_> = grid.neighbors(ChunkId(0)).collect();
        corner.sort();
        assert_eq!(corner, vec![ChunkId(1), ChunkId(3), ChunkId(9)]);

        let centre = grid.id_at(Point3::new(1, 1, 1)).unwrap();
        assert_eq!(grid.neighbors(centre).count(), 6);
    }

    #[test]
    fn transform_translates_by_scaled_grid_position() {
        let grid = WorldGrid::new(2, 16);
        let id = grid.id_at(Point3::new(1, 0, 1)).unwrap();
        let transform = grid.chunk_transform(id);
        let origin = transform * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vector4::new(16.0, 0.0, 16.0, 1.0));
        assert_eq!(grid.chunk_transform(ChunkId(0)), Matrix4::identity());
    }

    #[test]
    fn distance_is_euclidean_in_grid_units() {
        let grid = WorldGrid::new(2, 4);
        let id = grid.id_at(Point3::new(1, 1, 1)).unwrap();
        let d = grid.distance_to(id, Point3::new(0.0, 0.0, 0.0));
        assert!((d - 3f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn locate_voxel_splits_world_position() {
        let grid = WorldGrid::new(2, 4);
        let (id, local) = grid.locate_voxel(Point3::new(5, 2, 7)).unwrap();
        assert_eq!(grid.position_of(id), Point3::new(1, 0, 1));
        assert_eq!(local, Point3::new(1, 2, 3));
        assert_eq!(grid.locate_voxel(Point3::new(8, 0, 0)), None);
        assert_eq!(grid.locate_voxel(Point3::new(-1, 0, 0)), None);
    }
}
