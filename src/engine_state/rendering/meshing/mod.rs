//! Mesh generation for chunks.
//!
//! This module converts a chunk's blocks into a vertex/index buffer of
//! textured, ambient-occluded quads. One quad is emitted for every block face
//! whose neighboring cell is not occupied; faces between two solid blocks are
//! culled, including across chunk boundaries when the neighbor is loaded.
//!
//! # Ambient Occlusion
//! Each quad corner gets a level from 0 (darkest) to 3 (unoccluded) computed
//! from the two edge cells and the diagonal cell touching that corner in front
//! of the face. When both edge cells are occupied the corner is fully dark
//! regardless of the diagonal.
//!
//! Quads are split along whichever diagonal interpolates the occlusion
//! levels correctly, so a quad's vertex order depends on its corner levels.

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{
        block::{
            block_side::{BlockSide, Corner},
            Block,
        },
        chunk::{BlockLookup, Chunk, CHUNK_SIZE},
    },
};

pub mod quad;

use quad::{atlas_uv, corner_direction, corner_offset, QUAD_INDICES};

/// Drawable geometry of one chunk, in chunk-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Builds the mesh of `chunk`.
    ///
    /// Scans every row from 0 up to the chunk's highest occupied row.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to mesh
    /// * `neighbors` - Lookup used for faces and corners on the chunk boundary
    ///
    /// # Returns
    /// A new `ChunkMesh` with four vertices and six indices per visible face.
    pub fn build<L: BlockLookup + ?Sized>(chunk: &Chunk, neighbors: &L) -> Self {
        let start = Instant::now();
        let mut mesh = ChunkMesh::default();

        for y in 0..=chunk.highest_occupied() {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let local = Point3::new(x, y, z);
                    let block = chunk.get_local(local);
                    if !block.is_solid() {
                        continue;
                    }

                    for side in BlockSide::all() {
                        if !chunk.is_occupied(local + side.offset(), neighbors) {
                            mesh.push_face(chunk, neighbors, local, block, side);
                        }
                    }
                }
            }
        }

        debug!(
            "Meshed chunk ({}, {}): {} quads in {:?}",
            chunk.position().x,
            chunk.position().y,
            mesh.quad_count(),
            start.elapsed()
        );
        mesh
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw vertex data, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index data, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Appends the quad for one face of the block at `local`.
    fn push_face<L: BlockLookup + ?Sized>(
        &mut self,
        chunk: &Chunk,
        neighbors: &L,
        local: Point3<i32>,
        block: Block,
        side: BlockSide,
    ) {
        let front = local + side.offset();
        let normal = side.normal();
        let center = Point3::new(local.x as f32, local.y as f32, local.z as f32)
            + Vector3::new(0.5, 0.5, 0.5)
            + normal * 0.5;
        let texture_index = block.texture_index(side);

        let ambient = Corner::all()
            .map(|corner| corner_ambient(chunk, neighbors, front, corner_direction(side, corner)));
        let mut vertices = Corner::all().map(|corner| {
            Vertex::new(
                center + corner_offset(side, corner),
                atlas_uv(texture_index, corner),
                normal,
                ambient[corner as usize],
            )
        });

        if ambient[0] + ambient[3] > ambient[1] + ambient[2] {
            vertices.swap(0, 2);
            vertices.swap(1, 3);
            vertices.swap(1, 2);
        }

        let first = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        self.indices.extend(QUAD_INDICES.iter().map(|index| first + index));
    }
}

/// Occlusion level of one quad corner.
///
/// # Arguments
/// * `front` - The cell the face looks into
/// * `direction` - Direction from the face center to the corner, with two nonzero axes
fn corner_ambient<L: BlockLookup + ?Sized>(
    chunk: &Chunk,
    neighbors: &L,
    front: Point3<i32>,
    direction: Vector3<i32>,
) -> u8 {
    let mut edges = [direction; 2];
    let mut edge = 0;
    for axis in 0..3 {
        if direction[axis] != 0 && edge < edges.len() {
            edges[edge][axis] = 0;
            edge += 1;
        }
    }

    let side0 = chunk.is_occupied(front + edges[0], neighbors);
    let side1 = chunk.is_occupied(front + edges[1], neighbors);
    if side0 && side1 {
        return 0;
    }
    let corner = chunk.is_occupied(front + direction, neighbors);
    3 - (u8::from(side0) + u8::from(side1) + u8::from(corner))
}
