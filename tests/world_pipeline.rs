use std::collections::BTreeSet;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cgmath::{MetricSpace, Point3, Vector3};
use voxel_world::{
    Chunk, ChunkId, ConfigError, RebuildRequest, Voxel, VoxelSource, VoxelType, World, WorldConfig,
};

const DT: f32 = 0.016;

fn view() -> Vector3<f32> {
    Vector3::new(0.0, 0.0, -1.0)
}

fn origin() -> Point3<f32> {
    Point3::new(0.0, 0.0, 0.0)
}

fn world_of(world_edge: usize) -> World {
    World::new(WorldConfig {
        world_edge,
        ..WorldConfig::default()
    })
    .unwrap()
}

fn assert_setup_implies_loaded(world: &World) {
    for (index, chunk) in world.chunks().iter().enumerate() {
        assert!(
            !chunk.is_setup() || chunk.is_loaded(),
            "chunk {index} is set up but not loaded"
        );
    }
}

#[test]
fn setup_never_outruns_load_during_a_sweep() {
    let mut world = world_of(4);
    let stops = (0..10).chain((0..10).rev());
    for x in stops {
        for _ in 0..3 {
            world.update(DT, Point3::new(x as f32, 1.0, 1.0), view());
            assert_setup_implies_loaded(&world);
        }
    }
}

#[test]
fn staging_lists_are_drained_every_update() {
    let mut world = world_of(3);
    let far = Point3::new(100.0, 100.0, 100.0);
    world.update(DT, far, view());

    let ids: Vec<ChunkId> = world.grid().ids().collect();
    for &id in &ids {
        assert!(world.queue_load(id));
        assert!(world.queue_setup(id));
        assert!(world.queue_unload(id));
        assert!(world.request_rebuild(id));
    }
    assert!(!world.queue_load(ChunkId(ids.len())));

    world.update(DT, far, view());
    assert!(world.load_list().is_empty());
    assert!(world.setup_list().is_empty());
    assert!(world.flags_list().is_empty());
    assert!(world.unload_list().is_empty());
    // Only the neighbour rebuilds queued by this frame's flags stage remain.
    assert!(!world.rebuild_list().is_empty());
    assert!(world.rebuild_list().iter().all(|request| !request.propagate));
    // Loaded, then set up, then unloaded within the same frame.
    assert!(world.chunks().iter().all(|c| !c.is_loaded() && !c.is_setup()));

    let stats = world.update(DT, far, view());
    assert_eq!(stats.rebuilt, 0);
    assert!(world.rebuild_list().is_empty());
}

#[test]
fn visibility_scan_routes_exactly_the_chunks_inside_the_radius() {
    let mut world = world_of(8);
    let camera = Point3::new(3.5, 2.0, 1.0);
    world.update(DT, camera, view());

    let expected: BTreeSet<ChunkId> = world
        .grid()
        .ids()
        .filter(|&id| {
            let p = world.grid().position_of(id);
            Point3::new(p.x as f32, p.y as f32, p.z as f32).distance(camera) < 4.0
        })
        .collect();
    let queued: BTreeSet<ChunkId> = world.load_list().iter().copied().collect();

    assert!(!expected.is_empty());
    assert!(expected.len() < world.chunks().len());
    assert_eq!(queued, expected);
    assert_eq!(world.load_list().len(), expected.len());
}

#[test]
fn render_list_keeps_only_renderable_chunks_in_order() {
    let mut world = world_of(2);
    for _ in 0..3 {
        world.update(DT, origin(), view());
    }
    assert_eq!(
        world.render_list(),
        (0..8).map(ChunkId).collect::<Vec<_>>().as_slice()
    );

    // Chunk 3 sits at (1, 1, 0) and becomes all air; chunk 5 is unloaded.
    world.set_voxel(Point3::new(1, 1, 0), Voxel::AIR).unwrap();
    world.queue_unload(ChunkId(5));
    world.update(DT, origin(), view());

    assert!(world.chunk(ChunkId(3)).unwrap().is_setup());
    assert!(!world.chunk(ChunkId(3)).unwrap().should_render());
    assert_eq!(
        world.render_list(),
        &[ChunkId(0), ChunkId(1), ChunkId(2), ChunkId(4), ChunkId(6), ChunkId(7)]
    );
    for (id, chunk) in world.render_chunks() {
        assert!(chunk.is_loaded() && chunk.is_setup() && chunk.should_render(), "{id:?}");
    }
}

#[test]
fn first_chunk_loads_then_becomes_eligible_for_setup() {
    let mut world = world_of(2);
    world.queue_load(ChunkId(0));

    let stats = world.update(DT, origin(), view());
    let chunk: &Chunk = world.chunk(ChunkId(0)).unwrap();
    assert!(chunk.is_loaded());
    assert!(!chunk.is_setup());
    assert!(stats.visibility_scanned);
    assert!(world.setup_list().contains(&ChunkId(0)));

    world.update(DT, origin(), view());
    assert!(world.chunk(ChunkId(0)).unwrap().is_setup());
}

#[test]
fn idle_frames_leave_the_render_list_alone() {
    let mut world = world_of(2);
    for _ in 0..3 {
        world.update(DT, origin(), view());
    }

    assert!(world.is_idle());
    let stats = world.update(DT, origin(), view());
    assert!(!stats.visibility_scanned);
    assert!(!stats.render_list_updated);
    let stats = world.update(DT, origin(), view());
    assert!(!stats.render_list_updated);
    assert_eq!(world.frame_stats(), stats);

    // Turning the camera refreshes the render list without a scan.
    let stats = world.update(DT, origin(), Vector3::new(1.0, 0.0, 0.0));
    assert!(stats.render_list_updated);
    assert!(!stats.visibility_scanned);
    assert_eq!(world.render_list().len(), 8);
}

#[test]
fn budgets_spread_work_over_frames_but_finish_it() {
    let mut world = World::new(WorldConfig {
        world_edge: 3,
        max_loads_per_frame: Some(4),
        max_setups_per_frame: Some(2),
        max_rebuilds_per_frame: Some(1),
        ..WorldConfig::default()
    })
    .unwrap();

    let mut frames = 0;
    while world.render_list().len() < 27 {
        let stats = world.update(DT, Point3::new(1.0, 1.0, 1.0), view());
        assert!(stats.loaded <= 4);
        assert!(stats.setup <= 2);
        frames += 1;
        assert!(frames < 100, "world never settled");
    }
    assert!(frames > 3);
    assert!(world.chunks().iter().all(Chunk::is_setup));
}

struct GroundSource;

impl VoxelSource for GroundSource {
    fn populate(&self, position: Point3<i32>, chunk_edge: usize) -> Vec<Voxel> {
        let voxel_type = if position.y == 0 {
            VoxelType::Grass
        } else {
            VoxelType::Air
        };
        vec![Voxel::new(voxel_type); chunk_edge * chunk_edge * chunk_edge]
    }
}

#[test]
fn async_population_reaches_the_render_list() {
    let mut world = World::new(WorldConfig {
        chunk_edge: 2,
        ..WorldConfig::default()
    })
    .unwrap();
    world.attach_source(Arc::new(GroundSource));

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut frames = 0;
    while frames < 3 || world.pending_populations() > 0 {
        world.update(DT, origin(), view());
        frames += 1;
        assert!(Instant::now() < deadline, "populations never arrived");
        thread::sleep(Duration::from_millis(1));
    }
    for _ in 0..3 {
        world.update(DT, origin(), view());
    }

    assert_eq!(world.render_list().len(), 4);
    for (id, chunk) in world.render_chunks() {
        assert_eq!(world.grid().position_of(id).y, 0);
        assert_eq!(
            chunk.voxel_at(0, 0, 0).and_then(Voxel::voxel_type),
            Some(VoxelType::Grass)
        );
    }
}

#[test]
fn oversized_worlds_are_rejected_at_construction() {
    let result = World::new(WorldConfig {
        world_edge: 3_000_000,
        ..WorldConfig::default()
    });
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let result = World::new(WorldConfig {
        chunk_edge: 3_000_000,
        ..WorldConfig::default()
    });
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn rebuilds_over_budget_stay_queued_until_done() {
    let mut world = World::new(WorldConfig {
        chunk_edge: 2,
        max_rebuilds_per_frame: Some(1),
        ..WorldConfig::default()
    })
    .unwrap();
    for _ in 0..3 {
        world.update(DT, origin(), view());
    }
    let far_corner = ChunkId(7);
    let revision = world.chunk(far_corner).unwrap().mesh_revision();

    world.set_voxel(Point3::new(0, 0, 0), Voxel::AIR).unwrap();
    world.set_voxel(Point3::new(3, 3, 3), Voxel::AIR).unwrap();
    let stats = world.update(DT, origin(), view());
    assert_eq!(stats.rebuilt, 1);
    assert_eq!(stats.deferred, 1);
    assert!(world.rebuild_list().contains(&RebuildRequest {
        chunk: far_corner,
        propagate: true,
    }));

    let mut frames = 0;
    while !world.rebuild_list().is_empty() {
        world.update(DT, origin(), view());
        frames += 1;
        assert!(frames < 20, "rebuild list never drained");
    }
    let chunk = world.chunk(far_corner).unwrap();
    assert!(chunk.mesh_revision() > revision);
    assert_eq!(chunk.voxel_at(1, 1, 1), Some(&Voxel::AIR));
}

/// Runs frames at `camera` until at least `min_frames` ran and no population is pending.
fn settle(world: &mut World, camera: Point3<f32>, min_frames: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut frames = 0;
    let mut populated = 0;
    while frames < min_frames || world.pending_populations() > 0 {
        populated += world.update(DT, camera, view()).populated;
        frames += 1;
        assert!(Instant::now() < deadline, "populations never arrived");
        thread::sleep(Duration::from_millis(1));
    }
    populated
}

struct ShortSource;

impl VoxelSource for ShortSource {
    fn populate(&self, _position: Point3<i32>, chunk_edge: usize) -> Vec<Voxel> {
        vec![Voxel::new(VoxelType::Stone); chunk_edge * chunk_edge * chunk_edge - 1]
    }
}

#[test]
fn populations_of_the_wrong_length_are_dropped() {
    let mut world = World::new(WorldConfig {
        chunk_edge: 2,
        ..WorldConfig::default()
    })
    .unwrap();
    world.attach_source(Arc::new(ShortSource));

    let populated = settle(&mut world, origin(), 3) + settle(&mut world, origin(), 3);
    assert_eq!(populated, 0);
    assert_eq!(world.render_list().len(), 8);
    for chunk in world.chunks() {
        assert!(chunk.is_setup());
        assert_eq!(chunk.voxels().len(), 8);
        assert!(chunk.voxels().iter().all(|v| *v == Voxel::default()));
    }
}

/// Blocks every population until the test lets it through.
struct GatedSource {
    gate: Mutex<Receiver<()>>,
}

impl VoxelSource for GatedSource {
    fn populate(&self, _position: Point3<i32>, chunk_edge: usize) -> Vec<Voxel> {
        if let Ok(gate) = self.gate.lock() {
            let _ = gate.recv();
        }
        vec![Voxel::new(VoxelType::Stone); chunk_edge * chunk_edge * chunk_edge]
    }
}

#[test]
fn populations_for_unloaded_chunks_are_discarded() {
    let (open, gate) = channel();
    let mut world = World::new(WorldConfig {
        chunk_edge: 2,
        ..WorldConfig::default()
    })
    .unwrap();
    world.attach_source(Arc::new(GatedSource {
        gate: Mutex::new(gate),
    }));

    // Scan, then load: every chunk now has a population on its way.
    world.update(DT, origin(), view());
    let stats = world.update(DT, origin(), view());
    assert_eq!(stats.loaded, 8);
    assert_eq!(world.pending_populations(), 8);

    // Leave the radius and let the unloads run before any result arrives.
    let far = Point3::new(50.0, 50.0, 50.0);
    world.update(DT, far, view());
    let stats = world.update(DT, far, view());
    assert_eq!(stats.unloaded, 8);

    for _ in 0..8 {
        open.send(()).unwrap();
    }
    let populated = settle(&mut world, far, 1);

    assert_eq!(populated, 0);
    assert_eq!(world.pending_populations(), 0);
    for chunk in world.chunks() {
        assert!(!chunk.is_loaded() && !chunk.is_setup());
        assert!(chunk.voxels().is_empty());
    }
}
