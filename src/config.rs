//! # World Configuration
//!
//! Load-time tunables for terrain generation, streaming and physics.
//!
//! Every value has a default, so a configuration file only needs to name the
//! values it overrides. Chunk dimensions are not configurable: they are
//! compile-time constants in the chunk module.
//!
//! ```json
//! {
//!     "render_distance": 128.0,
//!     "terrain": { "seed": 7, "tree_density": 0.05 }
//! }
//! ```

use std::{fmt, fs, path::Path};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::chunk::CHUNK_HEIGHT;

/// How new chunks are filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Noise terrain with trees
    #[default]
    Terrain,
    /// A flat stone/dirt/grass slab of the given height, no trees
    Flat { height: u32 },
    /// Nothing but air
    Empty,
}

/// Parameters of the height-map generator.
///
/// Octave weights must sum to 1. Scales are in blocks per noise period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for every noise octave.
    pub seed: u32,
    /// Lowest possible surface elevation.
    pub min_height: u32,

    /// Scale of the biome noise that blends flat land and mountains.
    pub land_scale: f32,
    /// Mountain multiplier in the flattest biome.
    pub land_min_mult: f32,
    /// How quickly the biome noise transitions between flat and mountainous.
    pub land_transition_sharpness: f32,
    /// -1 (mostly flat) to 1 (mostly mountains).
    pub land_mountain_bias: f32,

    pub mountain_scale: f32,
    pub mountain_weight: f32,
    pub mountain_max_height: u32,

    pub detail_scale: f32,
    pub detail_weight: f32,
    pub detail_max_height: u32,

    /// Probability that any given column anchors a tree.
    pub tree_density: f32,

    /// Whether heights are interpolated from a coarser sample grid.
    pub interpolate: bool,
    /// Spacing of the interpolation grid, in blocks.
    pub interpolation_grid: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_height: 1,
            land_scale: 2048.0,
            land_min_mult: 0.1,
            land_transition_sharpness: 2.0,
            land_mountain_bias: 0.2,
            mountain_scale: 256.0,
            mountain_weight: 0.8,
            mountain_max_height: 250,
            detail_scale: 32.0,
            detail_weight: 0.2,
            detail_max_height: 100,
            tree_density: 0.03,
            interpolate: true,
            interpolation_grid: 4,
        }
    }
}

/// Top-level world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Streaming radius, in blocks, measured horizontally to chunk centers.
    pub render_distance: f32,
    /// Chunks generated or meshed per streaming tick.
    pub chunks_per_tick: u32,
    /// Minimum number of the 8 surrounding chunks that must already be meshed
    /// before a chunk is meshed.
    pub mesh_neighbor_threshold: u32,
    /// Downward acceleration applied to moving bodies.
    pub gravity: f32,
    /// How far below its resting place a chunk starts its load animation.
    pub chunk_float_distance: f32,
    /// Load animation progress per second while rising.
    pub chunk_float_in_speed: f32,
    /// Load animation progress per second while sinking.
    pub chunk_float_out_speed: f32,
    /// How new chunks are filled.
    pub generation: GenerationMethod,
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let (render_distance, chunks_per_tick) = if cfg!(debug_assertions) {
            (64.0, 1)
        } else {
            (400.0, 2)
        };

        Self {
            render_distance,
            chunks_per_tick,
            mesh_neighbor_threshold: 1,
            gravity: 20.0,
            chunk_float_distance: CHUNK_HEIGHT as f32 / 2.0,
            chunk_float_in_speed: 1.0,
            chunk_float_out_speed: 0.25,
            generation: GenerationMethod::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config
            .validate()
            .inspect_err(|err| warn!("Rejected world config: {err}"))?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The streaming radius squared, for square-root-free range tests.
    pub fn render_distance_squared(&self) -> f32 {
        self.render_distance * self.render_distance
    }

    /// Rejects values the generator or streamer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let terrain = &self.terrain;

        if self.render_distance.is_nan() || self.render_distance < 0.0 {
            return Err(ConfigError::Invalid("render_distance must be non-negative"));
        }
        if self.chunks_per_tick == 0 {
            return Err(ConfigError::Invalid("chunks_per_tick must be at least 1"));
        }
        if self.mesh_neighbor_threshold > 8 {
            return Err(ConfigError::Invalid("mesh_neighbor_threshold cannot exceed 8"));
        }
        if self.chunk_float_in_speed <= 0.0 || self.chunk_float_out_speed <= 0.0 {
            return Err(ConfigError::Invalid("chunk float speeds must be positive"));
        }
        if terrain.land_scale <= 0.0 || terrain.mountain_scale <= 0.0 || terrain.detail_scale <= 0.0
        {
            return Err(ConfigError::Invalid("noise scales must be positive"));
        }
        if (terrain.mountain_weight + terrain.detail_weight - 1.0).abs() > 1e-3 {
            return Err(ConfigError::Invalid("octave weights must sum to 1"));
        }
        if terrain.min_height == 0 {
            return Err(ConfigError::Invalid("min_height must be at least 1"));
        }
        if terrain.interpolation_grid <= 0 {
            return Err(ConfigError::Invalid("interpolation_grid must be positive"));
        }
        if let GenerationMethod::Flat { height } = self.generation {
            if height > CHUNK_HEIGHT as u32 {
                return Err(ConfigError::Invalid("flat height exceeds chunk height"));
            }
        }

        Ok(())
    }
}

/// Errors produced while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// The configuration parsed but a value is out of range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read world config: {err}"),
            ConfigError::Parse(err) => write!(f, "failed to parse world config: {err}"),
            ConfigError::Invalid(reason) => write!(f, "invalid world config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
