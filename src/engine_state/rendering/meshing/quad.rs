//! Unit quads for the six block faces.
//!
//! Each face is described by its four corners in the order bottom-left,
//! bottom-right, top-left, top-right as seen from outside the block. Corners
//! are stored in half-block units relative to the face center, so doubling is
//! not needed to get the direction toward the cells touching a corner.
//!
//! Triangles `(0, 1, 2)` and `(2, 1, 3)` of every quad wind counter-clockwise
//! when viewed from the side the normal points to.

use cgmath::{Vector2, Vector3};

use crate::engine_state::voxels::block::block_side::{BlockSide, Corner};

/// Width of the texture atlas in tiles. The atlas is square.
pub const ATLAS_TILES: u32 = 8;

/// Index pattern for one quad, relative to its first vertex.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// Texture coordinates of the four corners within one atlas tile, before scaling.
pub const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Face corners in half-block units, indexed `[side][corner]`.
#[rustfmt::skip]
const QUAD_CORNERS: [[[i32; 3]; 4]; 6] = [
    // Right (+X)
    [[0, -1,  1], [0, -1, -1], [0,  1,  1], [0,  1, -1]],
    // Left (-X)
    [[0, -1, -1], [0, -1,  1], [0,  1, -1], [0,  1,  1]],
    // Top (+Y)
    [[1, 0, -1], [-1, 0, -1], [1, 0,  1], [-1, 0,  1]],
    // Bottom (-Y)
    [[1, 0,  1], [-1, 0,  1], [1, 0, -1], [-1, 0, -1]],
    // Front (+Z)
    [[-1, -1, 0], [1, -1, 0], [-1,  1, 0], [1,  1, 0]],
    // Back (-Z)
    [[1, -1, 0], [-1, -1, 0], [1,  1, 0], [-1,  1, 0]],
];

/// Direction from the face center toward `corner`, one block per nonzero axis.
///
/// Added to the cell in front of the face, this is the diagonal cell touching the corner.
pub fn corner_direction(side: BlockSide, corner: Corner) -> Vector3<i32> {
    QUAD_CORNERS[side as usize][corner as usize].into()
}

/// Offset of `corner` from the face center, in blocks.
pub fn corner_offset(side: BlockSide, corner: Corner) -> Vector3<f32> {
    let [x, y, z] = QUAD_CORNERS[side as usize][corner as usize];
    Vector3::new(x as f32, y as f32, z as f32) * 0.5
}

/// Atlas coordinates of `corner` for the tile at `texture_index`.
///
/// Tiles are numbered left to right, top to bottom, while texture coordinates
/// grow upward, so rows are flipped.
pub fn atlas_uv(texture_index: u32, corner: Corner) -> Vector2<f32> {
    let tile = 1.0 / ATLAS_TILES as f32;
    let column = (texture_index % ATLAS_TILES) as f32;
    let row = (texture_index / ATLAS_TILES) as f32;
    let offset = Vector2::new(column * tile, 1.0 - row * tile - tile);
    let [u, v] = CORNER_UVS[corner as usize];
    Vector2::new(u, v) * tile + offset
}
