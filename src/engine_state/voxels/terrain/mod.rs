//! # Terrain Generation
//!
//! Deterministic height-map terrain and tree placement.
//!
//! Heights are a pure function of the column position and the terrain
//! configuration, so independently generating peers always agree on the world.
//! The generator keeps a small cache of recent heights; the cache only changes
//! how often noise is evaluated, never what a query returns.
//!
//! ## Height Model
//!
//! * A large-scale mountain octave and a small-scale detail octave, each
//!   remapped from `[-1, 1]` to `[0, 1]`, weighted and scaled to its maximum height
//! * A very large-scale biome octave that multiplies the mountain octave,
//!   blending between flat land and mountains
//! * A fixed floor added on top
//!
//! Optionally, noise is only sampled on a coarse grid and heights in between
//! are interpolated bilinearly.

use cgmath::Point2;
use noise::{NoiseFn, Perlin};

use crate::config::TerrainConfig;

pub use height_cache::{HeightCache, HEIGHT_CACHE_CAPACITY};
pub use tree::{TREE_HEIGHT, TREE_RADIUS, TREE_TEMPLATE, TREE_WIDTH};

mod height_cache;
mod tree;

/// Produces column heights and tree anchor points.
pub struct TerrainGenerator {
    config: TerrainConfig,
    mountain_noise: Perlin,
    detail_noise: Perlin,
    biome_noise: Perlin,
    cache: HeightCache,
}

impl TerrainGenerator {
    /// Creates a generator for the given terrain parameters.
    ///
    /// Each octave gets its own seed derived from `config.seed` so the octaves
    /// are not correlated with each other.
    pub fn new(config: TerrainConfig) -> Self {
        let seed = config.seed;
        Self {
            mountain_noise: Perlin::new(seed),
            detail_noise: Perlin::new(seed.wrapping_add(1)),
            biome_noise: Perlin::new(seed.wrapping_add(2)),
            config,
            cache: HeightCache::new(),
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Surface height of the column at `position`.
    ///
    /// A column of height `h` is solid for `0 <= y < h`.
    ///
    /// # Arguments
    /// * `position` - World block coordinates `(x, z)` of the column
    pub fn get_height(&mut self, position: Point2<i32>) -> i32 {
        let height = if self.config.interpolate && self.config.interpolation_grid > 1 {
            self.interpolated_height(position)
        } else {
            self.cached_height(position)
        };
        height.floor() as i32
    }

    /// Forgets all cached heights.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Every position in the half-open region `[min, max)` that anchors a tree.
    ///
    /// Whether a position anchors a tree depends only on the position and the
    /// seed, so overlapping regions always agree on their shared trees.
    pub fn generate_tree_points(&self, min: Point2<i32>, max: Point2<i32>) -> Vec<Point2<i32>> {
        let mut points = Vec::new();
        for y in min.y..max.y {
            for x in min.x..max.x {
                let position = Point2::new(x, y);
                if self.is_tree_point(position) {
                    points.push(position);
                }
            }
        }
        points
    }

    /// Whether a single column anchors a tree.
    pub fn is_tree_point(&self, position: Point2<i32>) -> bool {
        let mut rng = fastrand::Rng::with_seed(position_seed(self.config.seed, position));
        rng.f32() < self.config.tree_density
    }

    /// Interpolates between the noise samples of the grid cell containing
    /// `position`, sampling noise directly when it sits on grid lines.
    fn interpolated_height(&mut self, position: Point2<i32>) -> f32 {
        let grid = self.config.interpolation_grid;
        let x0 = position.x.div_euclid(grid) * grid;
        let y0 = position.y.div_euclid(grid) * grid;
        let fx = (position.x - x0) as f32 / grid as f32;
        let fy = (position.y - y0) as f32 / grid as f32;

        match (position.x == x0, position.y == y0) {
            (true, true) => self.cached_height(position),
            (true, false) => {
                let low = self.cached_height(Point2::new(x0, y0));
                let high = self.cached_height(Point2::new(x0, y0 + grid));
                lerp(low, high, fy)
            }
            (false, true) => {
                let low = self.cached_height(Point2::new(x0, y0));
                let high = self.cached_height(Point2::new(x0 + grid, y0));
                lerp(low, high, fx)
            }
            (false, false) => {
                let h00 = self.cached_height(Point2::new(x0, y0));
                let h10 = self.cached_height(Point2::new(x0 + grid, y0));
                let h01 = self.cached_height(Point2::new(x0, y0 + grid));
                let h11 = self.cached_height(Point2::new(x0 + grid, y0 + grid));
                lerp(lerp(h00, h10, fx), lerp(h01, h11, fx), fy)
            }
        }
    }

    fn cached_height(&mut self, position: Point2<i32>) -> f32 {
        if let Some(height) = self.cache.get(position) {
            return height;
        }

        let height = self.noise_height(position);
        self.cache.insert(position, height);
        height
    }

    /// Raw, uncached height from the noise octaves.
    fn noise_height(&self, position: Point2<i32>) -> f32 {
        let config = &self.config;

        let mountain = sample(&self.mountain_noise, position, config.mountain_scale);
        let detail = sample(&self.detail_noise, position, config.detail_scale);

        let mountain_height = mountain
            * config.mountain_weight
            * config.mountain_max_height as f32
            * self.biome_multiplier(position);
        let detail_height = detail * config.detail_weight * config.detail_max_height as f32;

        mountain_height + detail_height + config.min_height as f32
    }

    /// Mountain multiplier from the biome octave: `land_min_mult` on flat land,
    /// 1 in the mountains.
    fn biome_multiplier(&self, position: Point2<i32>) -> f32 {
        let config = &self.config;
        let biome = sample(&self.biome_noise, position, config.land_scale) * 2.0 - 1.0;
        let blend = ((biome + config.land_mountain_bias) * config.land_transition_sharpness)
            .clamp(-1.0, 1.0);
        lerp(config.land_min_mult, 1.0, (blend + 1.0) / 2.0)
    }
}

/// Noise at `position / scale`, remapped to `[0, 1]`.
fn sample(noise: &Perlin, position: Point2<i32>, scale: f32) -> f32 {
    let scale = scale as f64;
    let value = noise.get([position.x as f64 / scale, position.y as f64 / scale]) as f32;
    ((value + 1.0) / 2.0).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Mixes a seed and a column position into a well-distributed 64-bit value.
fn position_seed(seed: u32, position: Point2<i32>) -> u64 {
    let packed = ((position.x as u32 as u64) << 32) | position.y as u32 as u64;
    let mut z = packed ^ (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
