//! # World Module
//!
//! This module provides the `World` struct, which owns every loaded chunk and
//! is the single entry point for reading and editing blocks.
//!
//! ## Chunk Lifecycle
//!
//! A chunk coordinate is in one of these states:
//! - **Absent**: no entry in the chunk map
//! - **Generated**: blocks filled, no mesh
//! - **Meshed**: blocks filled and drawable
//! - **Stale**: meshed, but a neighbor loaded after the mesh was built
//! - **Unmeshing**: meshed, out of range and sinking out of view
//!
//! `update_streaming` in the `streaming` module drives these transitions around
//! an observer. Block queries, volume queries and raycasts live in `queries`.
//!
//! ## Edits
//!
//! Editing a block re-meshes its chunk and every meshed chunk whose faces or
//! corner shading can see the edited cell. Edits to unloaded chunks, or edits
//! that do not change the block, do nothing.

use std::collections::HashMap;

use cgmath::{EuclideanSpace, Matrix4, Point2, Point3, Vector3};

use super::block::Block;
use super::chunk::{to_chunk_position, BlockLookup, Chunk, CHUNK_HEIGHT, CHUNK_SIZE};
use super::terrain::TerrainGenerator;
use crate::config::WorldConfig;
use crate::engine_state::rendering::{ChunkMesh, Frustum};

mod queries;
mod streaming;

pub use queries::RaycastHit;
pub use streaming::StreamingStats;

/// Offsets of the 8 chunks surrounding a chunk.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The 8 chunk coordinates surrounding `position`.
pub fn neighbors_of(position: Point2<i32>) -> impl Iterator<Item = Point2<i32>> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .map(move |(dx, dz)| Point2::new(position.x + dx, position.y + dz))
}

/// A chunk the camera can see, ready to draw.
pub struct VisibleChunk<'a> {
    pub position: Point2<i32>,
    /// Places the chunk-local mesh at the chunk's animated render position.
    pub model: Matrix4<f32>,
    pub mesh: &'a ChunkMesh,
}

/// A voxel world made of chunk columns keyed by chunk coordinate.
pub struct World {
    config: WorldConfig,
    terrain: TerrainGenerator,
    chunks: HashMap<Point2<i32>, Chunk>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `config` - Streaming, generation and terrain parameters
    pub fn new(config: WorldConfig) -> Self {
        World {
            terrain: TerrainGenerator::new(config.terrain.clone()),
            config,
            chunks: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn chunk(&self, position: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, position: Point2<i32>) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn is_meshed(&self, position: Point2<i32>) -> bool {
        self.chunks.get(&position).is_some_and(Chunk::is_meshed)
    }

    /// Whether the chunk is meshed but was built before a neighbor loaded.
    pub fn is_stale(&self, position: Point2<i32>) -> bool {
        self.chunks.get(&position).is_some_and(Chunk::is_stale)
    }

    /// Number of the 8 surrounding chunks that are meshed.
    pub fn meshed_neighbor_count(&self, position: Point2<i32>) -> u32 {
        neighbors_of(position)
            .filter(|neighbor| self.is_meshed(*neighbor))
            .count() as u32
    }

    /// Generates the chunk at `position` if it is absent.
    ///
    /// Meshed neighbors are marked stale, since their boundary faces were
    /// built while this chunk was missing. Streaming rebuilds them within its
    /// per-tick budget.
    ///
    /// # Returns
    /// `true` if a chunk was generated.
    pub fn load_chunk(&mut self, position: Point2<i32>) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }

        let chunk = Chunk::generate(position, self.config.generation, &mut self.terrain);
        self.chunks.insert(position, chunk);

        for neighbor in neighbors_of(position) {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_stale();
            }
        }
        true
    }

    /// Inserts an already populated chunk, replacing any chunk at its position.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position(), chunk);
    }

    /// Removes a chunk and its mesh.
    pub fn unload_chunk(&mut self, position: Point2<i32>) -> Option<Chunk> {
        self.chunks.remove(&position)
    }

    /// Builds and installs the mesh of the chunk at `position`.
    ///
    /// # Returns
    /// `false` if no chunk is loaded there.
    pub fn mesh_chunk(&mut self, position: Point2<i32>) -> bool {
        let Some(chunk) = self.chunks.get(&position) else {
            return false;
        };
        let mesh = ChunkMesh::build(chunk, &*self);

        if let Some(chunk) = self.chunks.get_mut(&position) {
            chunk.set_mesh(mesh);
        }
        true
    }

    /// Gets the block at a world position.
    ///
    /// # Returns
    /// The block, or `Block::ERROR` if its chunk is not loaded or `y` is
    /// outside `0..CHUNK_HEIGHT`.
    pub fn get_block(&self, position: Point3<i32>) -> Block {
        if !(0..CHUNK_HEIGHT).contains(&position.y) {
            return Block::ERROR;
        }
        match self.chunks.get(&to_chunk_position(position)) {
            Some(chunk) => chunk.get_world(position),
            None => Block::ERROR,
        }
    }

    /// Replaces the block at a world position and re-meshes what it affects.
    ///
    /// Does nothing if the chunk is not loaded, `y` is out of range, or the
    /// block is already there.
    ///
    /// # Arguments
    /// * `position` - World position of the block
    /// * `block` - The new block
    ///
    /// # Returns
    /// `true` if the world changed.
    pub fn set_block(&mut self, position: Point3<i32>, block: Block) -> bool {
        if block.is_error() || !(0..CHUNK_HEIGHT).contains(&position.y) {
            return false;
        }
        let chunk_position = to_chunk_position(position);
        let Some(chunk) = self.chunks.get_mut(&chunk_position) else {
            return false;
        };
        if chunk.get_world(position) == block {
            return false;
        }
        chunk.set_world(position, block);

        for affected in Self::chunks_touching(position) {
            if self.is_meshed(affected) {
                self.mesh_chunk(affected);
            }
        }
        true
    }

    /// Chunks containing `position` or any cell horizontally adjacent to it,
    /// diagonals included, without duplicates.
    fn chunks_touching(position: Point3<i32>) -> Vec<Point2<i32>> {
        let mut touched = Vec::with_capacity(4);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let chunk =
                    to_chunk_position(Point3::new(position.x + dx, position.y, position.z + dz));
                if !touched.contains(&chunk) {
                    touched.push(chunk);
                }
            }
        }
        touched
    }

    /// Meshed chunks whose animated bounds intersect the camera frustum.
    ///
    /// # Arguments
    /// * `view_projection` - Projection matrix multiplied by the view matrix
    pub fn visible_chunks(&self, view_projection: Matrix4<f32>) -> Vec<VisibleChunk<'_>> {
        let frustum = Frustum::from_matrix(view_projection);
        let extent = Vector3::new(CHUNK_SIZE as f32, CHUNK_HEIGHT as f32, CHUNK_SIZE as f32);

        self.chunks
            .values()
            .filter_map(|chunk| {
                let mesh = chunk.mesh()?;
                let min = chunk.render_position(self.config.chunk_float_distance);
                if !frustum.intersects_aabb(min, min + extent) {
                    return None;
                }
                Some(VisibleChunk {
                    position: chunk.position(),
                    model: Matrix4::from_translation(min.to_vec()),
                    mesh,
                })
            })
            .collect()
    }
}

impl BlockLookup for World {
    fn get_block(&self, position: Point3<i32>) -> Block {
        World::get_block(self, position)
    }
}
