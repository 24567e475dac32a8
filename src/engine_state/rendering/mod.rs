//! Rendering-facing side of the voxel engine.
//!
//! This module turns chunk data into drawable geometry and decides which
//! chunks a camera can see. It does not talk to a graphics API: an external
//! renderer uploads the produced vertex and index buffers and draws each
//! visible chunk with the model transform handed out here.
//!
//! # Architecture
//! - `meshing`: Face extraction, ambient occlusion and atlas texturing
//! - `culling`: View frustum extraction and box tests
//! - `Vertex`: The vertex format shared with the renderer

pub mod culling;
pub mod meshing;
mod vertex;

pub use culling::Frustum;
pub use meshing::ChunkMesh;
pub use vertex::Vertex;
