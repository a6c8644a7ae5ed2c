//! # Voxel World Driver
//!
//! Native entry point. Runs the library's headless driver and exits non-zero
//! if it fails.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- world.json
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
