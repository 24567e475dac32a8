//! # Wire Records
//!
//! Fixed-layout, little-endian records exchanged between peers, encoded with
//! `bincode`'s default fixed-width options.
//!
//! | Record             | Layout                                    | Bytes |
//! |--------------------|-------------------------------------------|-------|
//! | `BlockUpdate`      | tag `u8`, x `i32`, y `i32`, z `i32`       | 13    |
//! | `PlayerPose`       | x `f32`, y `f32`, z `f32`, pitch, yaw     | 20    |
//! | `PlayerPacket`     | `PlayerPose`, `BlockUpdate`               | 33    |
//! | `IdentifiedPacket` | player id `u8`, `PlayerPacket`            | 34    |
//!
//! A `BlockUpdate` tagged `Error` means "no block changed" and is how a pose
//! is sent without an edit.

use std::fmt;

use cgmath::Point3;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

/// Why a record could not be encoded or decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// The buffer is not exactly one record long.
    WrongLength { expected: usize, actual: usize },
    /// The block tag names no known block type.
    UnknownBlockType(u8),
    /// `bincode` rejected the record.
    Codec(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::WrongLength { expected, actual } => {
                write!(f, "expected a {expected} byte record, got {actual} bytes")
            }
            RecordError::UnknownBlockType(tag) => write!(f, "unknown block type tag {tag}"),
            RecordError::Codec(message) => write!(f, "record codec error: {message}"),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<bincode::Error> for RecordError {
    fn from(error: bincode::Error) -> Self {
        RecordError::Codec(error.to_string())
    }
}

fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, RecordError> {
    Ok(bincode::serialize(record)?)
}

/// Decodes exactly one record of `size` bytes.
fn decode_record<T: DeserializeOwned>(bytes: &[u8], size: usize) -> Result<T, RecordError> {
    if bytes.len() != size {
        return Err(RecordError::WrongLength {
            expected: size,
            actual: bytes.len(),
        });
    }
    Ok(bincode::deserialize(bytes)?)
}

/// Wire form of `BlockUpdate`, with the block type as its raw tag.
#[derive(Copy, Clone, Serialize, Deserialize)]
struct BlockUpdateRecord {
    tag: u8,
    position: Point3<i32>,
}

impl From<BlockUpdate> for BlockUpdateRecord {
    fn from(update: BlockUpdate) -> Self {
        BlockUpdateRecord {
            tag: update.block_type.tag(),
            position: update.position,
        }
    }
}

impl TryFrom<BlockUpdateRecord> for BlockUpdate {
    type Error = RecordError;

    fn try_from(record: BlockUpdateRecord) -> Result<Self, RecordError> {
        let block_type =
            BlockType::from_tag(record.tag).ok_or(RecordError::UnknownBlockType(record.tag))?;
        Ok(BlockUpdate {
            block_type,
            position: record.position,
        })
    }
}

/// One block change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BlockUpdateRecord", try_from = "BlockUpdateRecord")]
pub struct BlockUpdate {
    pub block_type: BlockType,
    pub position: Point3<i32>,
}

impl BlockUpdate {
    pub const SIZE: usize = 13;

    pub fn new(position: Point3<i32>, block: Block) -> Self {
        BlockUpdate {
            block_type: block.block_type,
            position,
        }
    }

    /// The "nothing changed" record.
    pub fn none() -> Self {
        BlockUpdate {
            block_type: BlockType::Error,
            position: Point3::new(0, 0, 0),
        }
    }

    /// Whether this record carries an actual edit.
    pub fn is_some(&self) -> bool {
        !self.block_type.is_error()
    }

    pub fn block(&self) -> Block {
        Block::new(self.block_type)
    }

    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        encode_record(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        decode_record::<BlockUpdateRecord>(bytes, Self::SIZE)?.try_into()
    }
}

impl Default for BlockUpdate {
    fn default() -> Self {
        Self::none()
    }
}

/// Where a remote player is and where it is looking.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    /// Eye position.
    pub position: Point3<f32>,
    /// Radians.
    pub pitch: f32,
    /// Radians.
    pub yaw: f32,
}

impl Default for PlayerPose {
    fn default() -> Self {
        PlayerPose {
            position: Point3::new(0.0, 0.0, 0.0),
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl PlayerPose {
    pub const SIZE: usize = 20;

    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        encode_record(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        decode_record(bytes, Self::SIZE)
    }
}

#[derive(Copy, Clone, Serialize, Deserialize)]
struct PlayerPacketRecord {
    pose: PlayerPose,
    block: BlockUpdateRecord,
}

impl TryFrom<PlayerPacketRecord> for PlayerPacket {
    type Error = RecordError;

    fn try_from(record: PlayerPacketRecord) -> Result<Self, RecordError> {
        Ok(PlayerPacket {
            pose: record.pose,
            block: record.block.try_into()?,
        })
    }
}

/// What a peer sends each tick: its pose and at most one block edit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPacket {
    pub pose: PlayerPose,
    pub block: BlockUpdate,
}

impl PlayerPacket {
    pub const SIZE: usize = PlayerPose::SIZE + BlockUpdate::SIZE;

    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        encode_record(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        decode_record::<PlayerPacketRecord>(bytes, Self::SIZE)?.try_into()
    }
}

#[derive(Copy, Clone, Serialize, Deserialize)]
struct IdentifiedPacketRecord {
    player_id: u8,
    packet: PlayerPacketRecord,
}

/// A `PlayerPacket` relayed by the host, tagged with the sender's id as seen
/// by the recipient.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPacket {
    pub player_id: u8,
    pub packet: PlayerPacket,
}

impl IdentifiedPacket {
    pub const SIZE: usize = 1 + PlayerPacket::SIZE;

    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        encode_record(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let record: IdentifiedPacketRecord = decode_record(bytes, Self::SIZE)?;
        Ok(IdentifiedPacket {
            player_id: record.player_id,
            packet: record.packet.try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_update_layout_is_little_endian() {
        let update = BlockUpdate::new(Point3::new(1, -2, 258), Block::new(BlockType::Stone));
        let bytes = update.encode().unwrap();
        assert_eq!(bytes.len(), BlockUpdate::SIZE);
        assert_eq!(bytes[0], 3);
        assert_eq!(&bytes[1..5], &[1, 0, 0, 0]);
        assert_eq!(&bytes[5..9], &[0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[9..13], &[2, 1, 0, 0]);
        assert_eq!(BlockUpdate::decode(&bytes), Ok(update));
    }

    #[test]
    fn pose_fields_are_in_order() {
        let pose = PlayerPose {
            position: Point3::new(1.0, 2.0, 3.0),
            pitch: 0.5,
            yaw: -1.0,
        };
        let bytes = pose.encode().unwrap();
        assert_eq!(bytes.len(), PlayerPose::SIZE);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[16..20], &(-1.0f32).to_le_bytes());
        assert_eq!(PlayerPose::decode(&bytes), Ok(pose));
    }

    #[test]
    fn player_packet_is_pose_then_block() {
        let packet = PlayerPacket {
            pose: PlayerPose::default(),
            block: BlockUpdate::new(Point3::new(4, 5, 6), Block::new(BlockType::Dirt)),
        };
        let bytes = packet.encode().unwrap();
        assert_eq!(bytes.len(), PlayerPacket::SIZE);
        assert_eq!(bytes[PlayerPose::SIZE], BlockType::Dirt.tag());
        assert_eq!(&bytes[PlayerPose::SIZE + 1..PlayerPose::SIZE + 5], &[4, 0, 0, 0]);
        assert_eq!(PlayerPacket::decode(&bytes), Ok(packet));
    }

    #[test]
    fn identified_packet_prefixes_the_id() {
        let packet = IdentifiedPacket {
            player_id: 7,
            packet: PlayerPacket::default(),
        };
        let bytes = packet.encode().unwrap();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes[1 + PlayerPose::SIZE], BlockType::Error.tag());
        assert_eq!(IdentifiedPacket::decode(&bytes), Ok(packet));
    }

    #[test]
    fn bad_records_are_rejected() {
        assert_eq!(
            BlockUpdate::decode(&[0; 12]),
            Err(RecordError::WrongLength {
                expected: 13,
                actual: 12
            })
        );
        let mut bytes = BlockUpdate::none().encode().unwrap();
        bytes[0] = 42;
        assert_eq!(BlockUpdate::decode(&bytes), Err(RecordError::UnknownBlockType(42)));

        let mut bytes = IdentifiedPacket::default().encode().unwrap();
        bytes[1 + PlayerPose::SIZE] = 42;
        assert_eq!(IdentifiedPacket::decode(&bytes), Err(RecordError::UnknownBlockType(42)));
    }
}
