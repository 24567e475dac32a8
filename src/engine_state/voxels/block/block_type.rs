//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion
//! from the compact wire/storage tag.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants match the order of the tiles in the texture atlas and
/// are the tags carried by block change records on the network.
/// `FromPrimitive` allows conversion back from the compact tag.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never rendered, never collides.
    #[default]
    Air = 0,

    /// Dirt with a grass top. Surface layer of generated terrain.
    Grass = 1,

    /// Plain dirt. Also what the player places.
    Dirt = 2,

    /// Stone, filling everything deeper than a few blocks below the surface.
    Stone = 3,

    /// Tree trunk, with distinct end-grain on top and bottom.
    Log = 4,

    /// Tree canopy.
    Leaves = 5,

    /// Sentinel returned for any query outside currently loaded data.
    ///
    /// This is neither solid nor air: callers should treat it as "unknown".
    Error = 255,
}

impl BlockType {
    /// Number of real (renderable or air) block types, excluding `Error`.
    pub const COUNT: usize = 6;

    /// Converts a `BlockTypeSize` tag back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the tag does not name a known block type.
    pub fn from_tag(tag: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(tag)
    }

    /// The compact tag for this block type.
    pub fn tag(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this is air.
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    /// Whether this is the "no data here" sentinel.
    pub fn is_error(self) -> bool {
        self == BlockType::Error
    }

    /// Whether this is real, non-air block data.
    pub fn is_solid(self) -> bool {
        !self.is_air() && !self.is_error()
    }
}
