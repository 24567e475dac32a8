#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streaming voxel world: procedural terrain in chunk columns, face meshing
//! with per-vertex ambient occlusion, raycasting, box collision and a small
//! multiplayer relay model.
//!
//! The crate has no window or GPU of its own. It produces vertex and index
//! buffers plus a model matrix for every visible chunk, and leaves drawing to
//! the embedding application.
//!
//! ## Key Modules
//!
//! * `config` - Load-time tunables with defaults and JSON loading
//! * `engine_state` - The world, the player and the per-tick update that ties them together
//!
//! ## Architecture
//!
//! The engine is single-threaded and tick-driven:
//! * The player moves and edits blocks through the world
//! * The world streams chunks around the player, bounded by a per-tick budget
//! * The renderer asks for visible chunks between ticks
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::{GenerationMethod, WorldConfig};
//! use voxel_world::engine_state::{entity::PlayerInput, EngineState};
//!
//! let config = WorldConfig {
//!     generation: GenerationMethod::Flat { height: 32 },
//!     ..WorldConfig::default()
//! };
//! let mut engine_state = EngineState::new(config);
//! engine_state.tick(1.0 / 60.0, &PlayerInput::default());
//! let meshes = engine_state.visible_chunks(16.0 / 9.0);
//! # let _ = meshes;
//! ```

use log::info;

pub mod config;
pub mod engine_state;

/// Initializes logging to stdout, filtered by `RUST_LOG`.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
}
