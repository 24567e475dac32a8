//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed 16x256x16 column of blocks
//! that is the unit of generation, meshing and streaming.
//!
//! ## Storage
//!
//! Blocks are stored densely, one `Block` per cell, in a single boxed slice.
//! A local position `(x, y, z)` maps to the flat index `x + y * CHUNK_AREA + z * CHUNK_SIZE`.
//!
//! Chunks also track `highest_occupied`, the highest row ever written. It only
//! grows, even when air is written, and bounds how far up the mesher scans.
//!
//! ## Coordinates
//!
//! * **Chunk coordinates** are 2D and count chunks, not blocks
//! * **Local coordinates** are relative to the chunk's world origin
//! * **World coordinates** are absolute block positions
//!
//! Local reads outside the chunk return `Block::ERROR`; local writes outside
//! the chunk are ignored.

use cgmath::{Point2, Point3, Vector3};

use super::block::Block;
use crate::config::WorldConfig;
use crate::engine_state::rendering::meshing::ChunkMesh;

pub mod chunk_creation;

/// Horizontal dimension (X and Z) of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// Vertical dimension of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// Number of blocks in one horizontal layer of a chunk.
pub const CHUNK_AREA: i32 = CHUNK_SIZE * CHUNK_SIZE;
/// Total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_AREA * CHUNK_HEIGHT) as usize;

/// Read access to blocks by world position, across chunk boundaries.
///
/// Implemented by the world so that a chunk can look into its neighbors while
/// meshing without owning them.
pub trait BlockLookup {
    /// Returns the block at `position`, or `Block::ERROR` when no loaded data covers it.
    fn get_block(&self, position: Point3<i32>) -> Block;
}

/// A lookup with nothing loaded around the chunk being inspected.
///
/// Every query answers `Block::ERROR`, so a lone chunk meshes as if surrounded by air.
pub struct NoNeighbors;

impl BlockLookup for NoNeighbors {
    fn get_block(&self, _position: Point3<i32>) -> Block {
        Block::ERROR
    }
}

/// World origin (minimum corner, y = 0) of the chunk at `chunk`.
pub fn chunk_origin(chunk: Point2<i32>) -> Point3<i32> {
    Point3::new(chunk.x * CHUNK_SIZE, 0, chunk.y * CHUNK_SIZE)
}

/// Chunk coordinate owning the world block at `position`.
pub fn to_chunk_position(position: Point3<i32>) -> Point2<i32> {
    Point2::new(
        position.x.div_euclid(CHUNK_SIZE),
        position.z.div_euclid(CHUNK_SIZE),
    )
}

/// Converts a world position to a position local to the chunk at `chunk`.
///
/// The result may be out of the chunk's bounds when `world` lies elsewhere.
pub fn world_to_local(world: Point3<i32>, chunk: Point2<i32>) -> Point3<i32> {
    let origin = chunk_origin(chunk);
    Point3::new(world.x - origin.x, world.y, world.z - origin.z)
}

/// Converts a position local to the chunk at `chunk` to a world position.
pub fn local_to_world(local: Point3<i32>, chunk: Point2<i32>) -> Point3<i32> {
    let origin = chunk_origin(chunk);
    Point3::new(local.x + origin.x, local.y, local.z + origin.z)
}

/// Whether a local position lies outside `(0, 0, 0)..(CHUNK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE)`.
pub fn out_of_bounds(local: Point3<i32>) -> bool {
    !(0..CHUNK_SIZE).contains(&local.x)
        || !(0..CHUNK_HEIGHT).contains(&local.y)
        || !(0..CHUNK_SIZE).contains(&local.z)
}

fn index(local: Point3<i32>) -> usize {
    (local.x + local.y * CHUNK_AREA + local.z * CHUNK_SIZE) as usize
}

/// A full-height column of blocks.
pub struct Chunk {
    /// Position of this chunk in chunk coordinates.
    position: Point2<i32>,
    /// Dense block storage, see the module docs for the layout.
    blocks: Box<[Block]>,
    /// Highest row ever written.
    highest_occupied: i32,
    /// Drawable geometry, present while the chunk is meshed.
    mesh: Option<ChunkMesh>,
    /// How many times a mesh has been built for this chunk.
    mesh_builds: u32,
    /// The mesh was built before a neighbor it borders was loaded.
    stale: bool,
    /// Load animation progress in `[0, 1]`.
    height_timer: f32,
    /// Whether the load animation is currently moving toward 1.
    rising: bool,
}

impl Chunk {
    /// Creates a new chunk filled with air.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn new(position: Point2<i32>) -> Self {
        Self {
            position,
            blocks: vec![Block::AIR; CHUNK_VOLUME].into_boxed_slice(),
            highest_occupied: 0,
            mesh: None,
            mesh_builds: 0,
            stale: false,
            height_timer: 0.0,
            rising: true,
        }
    }

    pub fn position(&self) -> Point2<i32> {
        self.position
    }

    /// The world position of local `(0, 0, 0)`.
    pub fn world_origin(&self) -> Point3<i32> {
        chunk_origin(self.position)
    }

    pub fn world_to_local(&self, world: Point3<i32>) -> Point3<i32> {
        world_to_local(world, self.position)
    }

    pub fn local_to_world(&self, local: Point3<i32>) -> Point3<i32> {
        local_to_world(local, self.position)
    }

    /// Highest row that has ever been written; an upper bound on occupied rows.
    pub fn highest_occupied(&self) -> i32 {
        self.highest_occupied
    }

    /// Gets the block at a local position without a bounds check.
    ///
    /// # Panics
    /// Panics if `local` is out of bounds.
    pub fn get_local(&self, local: Point3<i32>) -> Block {
        debug_assert!(!out_of_bounds(local), "local position {local:?} out of bounds");
        self.blocks[index(local)]
    }

    /// Gets the block at a local position, or `Block::ERROR` if out of bounds.
    pub fn try_get_local(&self, local: Point3<i32>) -> Block {
        if out_of_bounds(local) {
            return Block::ERROR;
        }
        self.get_local(local)
    }

    /// Writes a block at a local position and raises the occupancy watermark.
    ///
    /// Writes outside the chunk are ignored.
    pub fn set_local(&mut self, local: Point3<i32>, block: Block) {
        if out_of_bounds(local) {
            return;
        }
        self.blocks[index(local)] = block;
        self.highest_occupied = self.highest_occupied.max(local.y);
    }

    /// Gets the block at a world position if this chunk contains it.
    ///
    /// # Returns
    /// The block, or `Block::ERROR` if the position lies outside this chunk.
    /// Neighboring chunks are never consulted.
    pub fn get_world(&self, world: Point3<i32>) -> Block {
        self.try_get_local(self.world_to_local(world))
    }

    /// Writes a block at a world position if this chunk contains it.
    pub fn set_world(&mut self, world: Point3<i32>, block: Block) {
        self.set_local(self.world_to_local(world), block);
    }

    /// Whether the cell at a local position, possibly outside this chunk, holds a real block.
    ///
    /// Rows above or below the chunk are never occupied. Horizontally outside
    /// positions are resolved through `neighbors`; unloaded neighbors count as
    /// empty so that edge chunks can mesh before their neighbors exist.
    ///
    /// # Arguments
    /// * `local` - Position relative to this chunk's origin
    /// * `neighbors` - Lookup for blocks in other chunks
    pub fn is_occupied<L: BlockLookup + ?Sized>(&self, local: Point3<i32>, neighbors: &L) -> bool {
        if !(0..CHUNK_HEIGHT).contains(&local.y) {
            return false;
        }
        if out_of_bounds(local) {
            return neighbors.get_block(self.local_to_world(local)).is_solid();
        }
        self.get_local(local).is_solid()
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    pub fn is_meshed(&self) -> bool {
        self.mesh.is_some()
    }

    /// Installs freshly built geometry, replacing any previous mesh.
    pub fn set_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = Some(mesh);
        self.mesh_builds += 1;
        self.stale = false;
    }

    /// Drops the geometry; block data is kept.
    pub fn clear_mesh(&mut self) {
        self.mesh = None;
        self.stale = false;
    }

    /// Whether the mesh needs rebuilding because a neighbor has since loaded.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Flags the mesh for a rebuild. Unmeshed chunks are left alone.
    pub fn mark_stale(&mut self) {
        self.stale = self.is_meshed();
    }

    /// Number of meshes built for this chunk since it was created.
    pub fn mesh_builds(&self) -> u32 {
        self.mesh_builds
    }

    /// Load animation progress, 0 fully sunk, 1 fully in place.
    pub fn height_timer(&self) -> f32 {
        self.height_timer
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// Whether the chunk has finished sinking out of range.
    pub fn is_sunk(&self) -> bool {
        !self.rising && self.height_timer <= 0.0
    }

    /// Advances the load animation.
    ///
    /// The direction follows `in_range` every tick, but the timer itself only
    /// moves while the chunk has a mesh.
    ///
    /// # Arguments
    /// * `in_range` - Whether the chunk is within streaming range of the observer
    /// * `dt` - Seconds since the last tick
    /// * `config` - Supplies the float-in and float-out speeds
    pub fn update_height_timer(&mut self, in_range: bool, dt: f32, config: &WorldConfig) {
        self.rising = in_range;
        if !self.is_meshed() {
            return;
        }

        let step = if in_range {
            dt * config.chunk_float_in_speed
        } else {
            -dt * config.chunk_float_out_speed
        };
        self.height_timer = (self.height_timer + step).clamp(0.0, 1.0);
    }

    /// Where the chunk should be drawn this frame.
    ///
    /// # Arguments
    /// * `float_distance` - How far below its origin a fully sunk chunk sits
    ///
    /// # Returns
    /// The world origin lowered by `float_distance * (1 - t)^3`.
    pub fn render_position(&self, float_distance: f32) -> Point3<f32> {
        let origin = self.world_origin();
        let sink = float_distance * (1.0 - self.height_timer).powi(3);
        Point3::new(origin.x as f32, origin.y as f32, origin.z as f32) - Vector3::new(0.0, sink, 0.0)
    }

    /// Whether this chunk's horizontal center is within `radius_squared` of `observer`.
    pub fn in_range(&self, observer: Point3<f32>, radius_squared: f32) -> bool {
        let origin = self.world_origin();
        let half = CHUNK_SIZE as f32 / 2.0;
        let dx = origin.x as f32 + half - observer.x;
        let dz = origin.z as f32 + half - observer.z;
        dx * dx + dz * dz <= radius_squared
    }
}
