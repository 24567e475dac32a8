//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the static
//! block catalog that maps each block type to its texture atlas tiles.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory and on the wire.
pub type BlockTypeSize = u8;

/// Texture atlas tiles used by the three kinds of face of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SideTextureIndices {
    pub top: u32,
    pub side: u32,
    pub bottom: u32,
}

impl SideTextureIndices {
    /// Every face uses the same tile.
    pub const fn uniform(index: u32) -> Self {
        Self {
            top: index,
            side: index,
            bottom: index,
        }
    }

    pub const fn new(top: u32, side: u32, bottom: u32) -> Self {
        Self { top, side, bottom }
    }
}

/// Maps each block type to its texture atlas tiles.
///
/// Indexed by `BlockType` as a `usize`; the order matches the sprite sheet.
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [SideTextureIndices; BlockType::COUNT] = [
    SideTextureIndices::uniform(0),    // AIR (never meshed)
    SideTextureIndices::new(2, 1, 0),  // GRASS (top: 2, sides: 1, bottom: dirt)
    SideTextureIndices::uniform(0),    // DIRT
    SideTextureIndices::uniform(3),    // STONE
    SideTextureIndices::new(5, 4, 5),  // LOG (end grain top and bottom)
    SideTextureIndices::uniform(6),    // LEAVES
];

/// Represents a single voxel block in the world.
///
/// Equality is defined by block type only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block.
    pub block_type: BlockType,
}

impl Block {
    /// An air block.
    pub const AIR: Block = Block {
        block_type: BlockType::Air,
    };

    /// The "no data here" sentinel block.
    pub const ERROR: Block = Block {
        block_type: BlockType::Error,
    };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block { block_type }
    }

    /// Whether this block is air.
    pub fn is_air(&self) -> bool {
        self.block_type.is_air()
    }

    /// Whether this block is the sentinel for unloaded data.
    pub fn is_error(&self) -> bool {
        self.block_type.is_error()
    }

    /// Whether this block is real, non-air data.
    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }

    /// Gets the texture atlas tile for one face of this block.
    ///
    /// # Arguments
    /// * `side` - The face being textured
    ///
    /// # Returns
    /// The atlas tile index. The `Error` sentinel has no tiles and maps to tile 0.
    pub fn texture_index(&self, side: BlockSide) -> u32 {
        let Some(indices) = BLOCK_TYPE_TO_TEXTURE_INDICES.get(self.block_type as usize) else {
            return 0;
        };
        match side {
            BlockSide::Top => indices.top,
            BlockSide::Bottom => indices.bottom,
            BlockSide::Right | BlockSide::Left | BlockSide::Front | BlockSide::Back => {
                indices.side
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_uses_distinct_top_side_and_bottom_tiles() {
        let grass = Block::new(BlockType::Grass);
        assert_eq!(grass.texture_index(BlockSide::Top), 2);
        assert_eq!(grass.texture_index(BlockSide::Front), 1);
        assert_eq!(grass.texture_index(BlockSide::Bottom), 0);
    }

    #[test]
    fn error_block_falls_back_to_first_tile() {
        assert_eq!(Block::ERROR.texture_index(BlockSide::Top), 0);
    }
}
