//! # Voxel World Headless Runner
//!
//! Streams a world around a player for a fixed number of ticks and logs what
//! happened. Useful for profiling generation and meshing without a renderer.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [ticks]
//! ```

use std::process::ExitCode;

use log::{error, info};
use voxel_world::{
    config::WorldConfig,
    engine_state::{entity::PlayerInput, EngineState},
};

const TICK_SECONDS: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: u32 = 600;

fn main() -> ExitCode {
    voxel_world::init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("Could not load {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };
    let ticks = args
        .next()
        .and_then(|ticks| ticks.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut engine_state = EngineState::new(config);
    let input = PlayerInput {
        move_forward: true,
        ..PlayerInput::default()
    };

    let start = web_time::Instant::now();
    for _ in 0..ticks {
        engine_state.tick(TICK_SECONDS, &input);
    }

    let world = engine_state.world();
    info!(
        "{ticks} ticks in {:?}: {} chunks loaded, {} meshed, player at {:?}",
        start.elapsed(),
        world.chunk_count(),
        world.chunks().filter(|chunk| chunk.is_meshed()).count(),
        engine_state.player().position(),
    );
    ExitCode::SUCCESS
}
