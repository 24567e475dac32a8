//! # Voxel Engine Core
//!
//! This module contains the voxel data model and everything that operates
//! directly on it.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, block faces and the texture atlas catalog
//! * **Chunk**: Fixed-size columns of blocks and their population
//! * **Terrain**: Deterministic heights and tree placement
//! * **World**: The chunk map, streaming, edits and spatial queries
//!
//! ## Data Flow
//!
//! 1. The world decides a chunk coordinate should be loaded
//! 2. A chunk is allocated and filled from the terrain generator
//! 3. Once enough neighbors are meshed, the chunk is meshed
//! 4. Block edits go through the world, which re-meshes affected chunks
//!
//! Everything runs on the caller's thread. Work per tick is bounded by the
//! streaming budget rather than by moving generation elsewhere.

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;
