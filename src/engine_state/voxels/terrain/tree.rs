//! The tree stamped onto the terrain at every tree point.

use crate::engine_state::voxels::block::block_type::BlockType;

const A: BlockType = BlockType::Air;
const L: BlockType = BlockType::Log;
const V: BlockType = BlockType::Leaves;

/// Horizontal extent of the tree on either side of its trunk.
pub const TREE_RADIUS: i32 = 2;
/// Width of the tree template along X and Z.
pub const TREE_WIDTH: usize = (TREE_RADIUS * 2 + 1) as usize;
/// Number of layers in the tree template.
pub const TREE_HEIGHT: usize = 7;

/// Tree blocks indexed `[y][x][z]`, with the trunk at the horizontal center and
/// layer 0 resting directly on the surface block.
#[rustfmt::skip]
pub static TREE_TEMPLATE: [[[BlockType; TREE_WIDTH]; TREE_WIDTH]; TREE_HEIGHT] = [
    [
        [A, A, A, A, A],
        [A, A, A, A, A],
        [A, A, L, A, A],
        [A, A, A, A, A],
        [A, A, A, A, A],
    ],
    [
        [A, A, A, A, A],
        [A, A, A, A, A],
        [A, A, L, A, A],
        [A, A, A, A, A],
        [A, A, A, A, A],
    ],
    [
        [A, A, A, A, A],
        [A, A, A, A, A],
        [A, A, L, A, A],
        [A, A, A, A, A],
        [A, A, A, A, A],
    ],
    [
        [A, V, V, V, A],
        [V, V, V, V, V],
        [V, V, L, V, V],
        [V, V, V, V, V],
        [A, V, V, V, A],
    ],
    [
        [A, V, V, V, A],
        [V, V, V, V, V],
        [V, V, L, V, V],
        [V, V, V, V, V],
        [A, V, V, V, A],
    ],
    [
        [A, A, A, A, A],
        [A, V, V, V, A],
        [A, V, V, V, A],
        [A, V, V, V, A],
        [A, A, A, A, A],
    ],
    [
        [A, A, A, A, A],
        [A, A, V, A, A],
        [A, V, V, V, A],
        [A, A, V, A, A],
        [A, A, A, A, A],
    ],
];
