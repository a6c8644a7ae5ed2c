#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! Chunk streaming and meshing for a fixed-size voxel world, built with Rust and WGPU.
//!
//! The world is a cubic grid of chunks. Once per frame it scans the grid around
//! the camera and moves chunks through a staged lifecycle (load, setup, rebuild,
//! unload) so that only chunks near the camera hold voxel data and geometry.
//!
//! ## Key Modules
//!
//! * `engine_state::voxels` - Voxels, chunks, the world grid and its staging pipeline
//! * `engine_state::rendering` - Mesh generation, GPU upload and the render system
//! * `engine_state::config` - Runtime configuration loaded from JSON
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Point3, Vector3};
//! use voxel_world::{CpuMeshBuilder, VoxelRenderSystem, WorldConfig};
//!
//! let mut system = VoxelRenderSystem::new(WorldConfig::default(), CpuMeshBuilder).unwrap();
//! for _ in 0..3 {
//!     system
//!         .update(0.016, Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
//!         .unwrap();
//! }
//! for (draw, mesh) in system.meshes() {
//!     println!("{:?}: {} vertices", draw.chunk, mesh.vertex_count());
//! }
//! ```

use cgmath::{Point3, Vector3};
use log::{debug, info, warn};

pub mod engine_state;

pub use engine_state::*;

/// Frames spent at each camera stop of the driver's scripted path.
const FRAMES_PER_STOP: usize = 4;

/// Headless driver used by the binary.
///
/// Initializes logging, loads the configuration named by the first command line
/// argument (defaults otherwise), and flies a camera across the world and back,
/// logging what the streaming pipeline does each frame. Meshes are uploaded to a
/// GPU device when one is available and kept on the CPU otherwise.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => {
            info!("No config path given, using defaults");
            WorldConfig::default()
        }
    };
    config.validate()?;

    match pollster::block_on(rendering::request_headless_device()) {
        Ok((device, _queue)) => {
            let system = VoxelRenderSystem::new(config, WgpuMeshBuilder::new(device))?;
            drive(system, |mesh: &GpuMesh| mesh.vertex_count() as usize)
        }
        Err(err) => {
            warn!("{err}; meshing on the CPU instead");
            let system = VoxelRenderSystem::new(config, CpuMeshBuilder)?;
            drive(system, Mesh::vertex_count)
        }
    }
}

fn drive<B: MeshBuilder>(
    mut system: VoxelRenderSystem<B>,
    vertex_count: impl Fn(&B::Mesh) -> usize,
) -> Result<(), EngineError> {
    let camera_view = Vector3::new(0.0, 0.0, -1.0);
    let path = camera_path(system.world().config());

    let start = web_time::Instant::now();
    let mut last_frame = start;

    for (frame, camera_position) in path.into_iter().enumerate() {
        let now = web_time::Instant::now();
        let delta_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let stats = system.update(delta_time, camera_position, camera_view)?;
        let vertices: usize = system.meshes().map(|(_, mesh)| vertex_count(mesh)).sum();

        debug!(
            "Frame {frame} at {:?}: {} chunks drawn, {vertices} vertices, {stats:?}",
            camera_position,
            system.draws().len()
        );
    }

    info!(
        "Drove {} chunks through the camera path in {:.2?}, {} meshes built",
        system.world().chunks().len(),
        start.elapsed(),
        system.mesh_manager().meshes_built()
    );
    Ok(())
}

/// Camera positions (grid units) sweeping along +x out of the visibility radius and back.
fn camera_path(config: &WorldConfig) -> Vec<Point3<f32>> {
    let far = (config.world_edge as f32 + config.visibility_radius).ceil() as usize;
    let stops = (0..=far).chain((0..far).rev());

    stops
        .flat_map(|x| std::iter::repeat(Point3::new(x as f32, 0.0, 0.0)).take(FRAMES_PER_STOP))
        .collect()
}
