//! # Chunk Creation Module
//!
//! Fills freshly allocated chunks according to the configured generation method.
//!
//! Terrain chunks are built in two passes:
//! 1. Every column is filled bottom-up: stone, then dirt, then a single grass block on top
//! 2. Trees are stamped from the tree template at every tree point near the chunk
//!
//! Trees anchored in a neighboring chunk can overhang this one, so tree points
//! are gathered from the chunk footprint expanded by the tree radius and each
//! tree block is clipped to the chunk. Leaves never replace existing blocks.

use cgmath::{Point2, Point3};
use log::debug;
use web_time::Instant;

use super::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::config::GenerationMethod;
use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::terrain::{TerrainGenerator, TREE_RADIUS, TREE_TEMPLATE};

/// Depth of the dirt layer under the grass, including the grass block.
const DIRT_DEPTH: i32 = 8;

impl Chunk {
    /// Creates and fills the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `method` - How the chunk should be filled
    /// * `terrain` - Height and tree source for `GenerationMethod::Terrain`
    ///
    /// # Returns
    /// A populated chunk without a mesh.
    pub fn generate(
        position: Point2<i32>,
        method: GenerationMethod,
        terrain: &mut TerrainGenerator,
    ) -> Self {
        let start = Instant::now();
        let mut chunk = Chunk::new(position);

        match method {
            GenerationMethod::Terrain => {
                chunk.fill_terrain(terrain);
                chunk.plant_trees(terrain);
            }
            GenerationMethod::Flat { height } => chunk.fill_flat(height as i32),
            GenerationMethod::Empty => {}
        }

        debug!(
            "Generated chunk ({}, {}) in {:?}",
            position.x,
            position.y,
            start.elapsed()
        );
        chunk
    }

    /// Fills every column up to the terrain height.
    fn fill_terrain(&mut self, terrain: &mut TerrainGenerator) {
        let origin = self.world_origin();
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let height = terrain.get_height(Point2::new(origin.x + x, origin.z + z));
                self.fill_column(x, z, height);
            }
        }
    }

    /// Fills every column to the same height.
    fn fill_flat(&mut self, height: i32) {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                self.fill_column(x, z, height);
            }
        }
    }

    /// Layers one column: stone below `height - 8`, dirt up to `height - 2`
    /// and grass at `height - 1`.
    fn fill_column(&mut self, x: i32, z: i32, height: i32) {
        let height = height.min(CHUNK_HEIGHT);
        for y in 0..height {
            let block_type = if y < height - DIRT_DEPTH {
                BlockType::Stone
            } else if y < height - 1 {
                BlockType::Dirt
            } else {
                BlockType::Grass
            };
            self.set_local(Point3::new(x, y, z), Block::new(block_type));
        }
    }

    /// Stamps the tree template at every tree point whose canopy reaches this chunk.
    fn plant_trees(&mut self, terrain: &mut TerrainGenerator) {
        let origin = self.world_origin();
        let min = Point2::new(origin.x - TREE_RADIUS, origin.z - TREE_RADIUS);
        let max = Point2::new(
            origin.x + CHUNK_SIZE + TREE_RADIUS,
            origin.z + CHUNK_SIZE + TREE_RADIUS,
        );

        for point in terrain.generate_tree_points(min, max) {
            let base_y = terrain.get_height(point);
            self.place_tree(Point3::new(point.x, base_y, point.y));
        }
    }

    /// Writes the tree template with its trunk base at world position `base`.
    fn place_tree(&mut self, base: Point3<i32>) {
        for (y, layer) in TREE_TEMPLATE.iter().enumerate() {
            for (x, row) in layer.iter().enumerate() {
                for (z, &block_type) in row.iter().enumerate() {
                    if block_type == BlockType::Air {
                        continue;
                    }

                    let world = Point3::new(
                        base.x + x as i32 - TREE_RADIUS,
                        base.y + y as i32,
                        base.z + z as i32 - TREE_RADIUS,
                    );
                    let existing = self.get_world(world);
                    if existing.is_error() {
                        continue;
                    }
                    if block_type == BlockType::Leaves && !existing.is_air() {
                        continue;
                    }
                    self.set_world(world, Block::new(block_type));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;

    fn generator() -> TerrainGenerator {
        TerrainGenerator::new(TerrainConfig::default())
    }

    #[test]
    fn flat_chunk_is_layered() {
        let chunk = Chunk::generate(Point2::new(3, -2), GenerationMethod::Flat { height: 12 }, &mut generator());
        let block_at = |y| chunk.get_local(Point3::new(5, y, 9)).block_type;

        assert_eq!(block_at(0), BlockType::Stone);
        assert_eq!(block_at(3), BlockType::Stone);
        assert_eq!(block_at(4), BlockType::Dirt);
        assert_eq!(block_at(10), BlockType::Dirt);
        assert_eq!(block_at(11), BlockType::Grass);
        assert_eq!(block_at(12), BlockType::Air);
        assert_eq!(chunk.highest_occupied(), 11);
    }

    #[test]
    fn empty_chunk_is_all_air() {
        let chunk = Chunk::generate(Point2::new(0, 0), GenerationMethod::Empty, &mut generator());
        assert!(chunk.get_local(Point3::new(0, 0, 0)).is_air());
        assert_eq!(chunk.highest_occupied(), 0);
    }

    #[test]
    fn terrain_columns_match_generator_heights() {
        let mut terrain = generator();
        let chunk = Chunk::generate(Point2::new(1, 1), GenerationMethod::Terrain, &mut terrain);

        for (x, z) in [(0, 0), (7, 3), (15, 15)] {
            let world = chunk.local_to_world(Point3::new(x, 0, z));
            let height = terrain.get_height(Point2::new(world.x, world.z));
            assert!(chunk.get_local(Point3::new(x, 0, z)).is_solid());
            assert!(chunk.get_local(Point3::new(x, height - 1, z)).is_solid());
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = Chunk::generate(Point2::new(-4, 9), GenerationMethod::Terrain, &mut generator());
        let b = Chunk::generate(Point2::new(-4, 9), GenerationMethod::Terrain, &mut generator());
        assert_eq!(a.highest_occupied(), b.highest_occupied());
        for y in 0..=a.highest_occupied() {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let local = Point3::new(x, y, z);
                    assert_eq!(a.get_local(local), b.get_local(local));
                }
            }
        }
    }

    #[test]
    fn trees_are_planted_on_the_surface() {
        let mut terrain = TerrainGenerator::new(TerrainConfig {
            tree_density: 0.2,
            ..TerrainConfig::default()
        });
        let chunk = Chunk::generate(Point2::new(0, 0), GenerationMethod::Terrain, &mut terrain);
        let origin = chunk.world_origin();

        let points = terrain.generate_tree_points(
            Point2::new(origin.x, origin.z),
            Point2::new(origin.x + CHUNK_SIZE, origin.z + CHUNK_SIZE),
        );
        assert!(!points.is_empty());
        for point in points {
            let base = Point3::new(point.x, terrain.get_height(point), point.y);
            assert_eq!(chunk.get_world(base).block_type, BlockType::Log);
        }
    }

    #[test]
    fn leaves_do_not_replace_blocks() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        let blocker = Point3::new(7, 13, 8);
        chunk.set_world(blocker, Block::new(BlockType::Stone));
        chunk.place_tree(Point3::new(8, 10, 8));

        assert_eq!(chunk.get_world(blocker).block_type, BlockType::Stone);
        assert_eq!(chunk.get_world(Point3::new(9, 13, 8)).block_type, BlockType::Leaves);
        assert_eq!(chunk.get_world(Point3::new(8, 13, 8)).block_type, BlockType::Log);
    }
}
