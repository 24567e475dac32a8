//! # Engine State Module
//!
//! The core engine module that owns the world and the player and advances
//! them one tick at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `entity` - Moving bodies, collision and the player
//! * `networking` - Wire records and the host/client relay model
//! * `rendering` - Chunk meshing, vertex layout and frustum culling
//! * `voxels` - Blocks, chunks, terrain generation and the world
//!
//! ## Architecture
//!
//! `EngineState` is the only owner of the `World` and the `Player`; nothing
//! is global. A tick runs entirely on the caller's thread:
//!
//! 1. The player turns, moves and falls
//! 2. Requested block edits are raycast from the player's eyes and applied
//! 3. Edits received from remote players are applied
//! 4. The world streams chunks around the player's eyes
//!
//! Drawing happens between ticks through `visible_chunks`.

use cgmath::{perspective, Deg, Matrix4, Point3};
use log::debug;

use entity::{Player, PlayerInput};
use networking::{BlockUpdate, NetworkState, PlayerPacket, PlayerPose};
use voxels::{
    block::Block,
    world::{StreamingStats, VisibleChunk, World},
};

use crate::config::WorldConfig;

pub mod entity;
pub mod networking;
pub mod rendering;
pub mod voxels;

/// Where the player appears in a new world.
pub const SPAWN_POSITION: Point3<f32> = Point3 {
    x: 520.5,
    y: 102.0,
    z: -320.5,
};

/// Vertical field of view.
const FIELD_OF_VIEW: Deg<f32> = Deg(45.0);
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_world::config::WorldConfig;
/// use voxel_world::engine_state::{entity::PlayerInput, EngineState};
///
/// let mut engine_state = EngineState::new(WorldConfig::default());
/// for _ in 0..10 {
///     engine_state.tick(1.0 / 60.0, &PlayerInput::default());
/// }
/// assert!(engine_state.world().chunk_count() > 0);
/// ```
pub struct EngineState {
    world: World,
    player: Player,
    network: Option<NetworkState>,
}

impl EngineState {
    /// Creates an engine with an empty world and the player at the spawn point.
    pub fn new(config: WorldConfig) -> Self {
        Self::with_player_at(config, SPAWN_POSITION)
    }

    /// Creates an engine with the player at `position`.
    pub fn with_player_at(config: WorldConfig, position: Point3<f32>) -> Self {
        Self {
            world: World::new(config),
            player: Player::new(position),
            network: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Joins a multiplayer session, replacing any previous one.
    pub fn connect(&mut self, network: NetworkState) {
        self.network = Some(network);
    }

    pub fn disconnect(&mut self) {
        self.network = None;
    }

    pub fn network_mut(&mut self) -> Option<&mut NetworkState> {
        self.network.as_mut()
    }

    /// Advances the engine by one tick.
    ///
    /// # Arguments
    /// * `dt` - Seconds since the last tick
    /// * `input` - What the player wants to do this tick
    ///
    /// # Returns
    /// What streaming did this tick.
    pub fn tick(&mut self, dt: f32, input: &PlayerInput) -> StreamingStats {
        let gravity = self.world.config().gravity;
        self.player.update(input, &self.world, gravity, dt);

        if input.destroy {
            self.destroy_block();
        }
        if input.place {
            self.place_block();
        }

        if let Some(network) = self.network.as_mut() {
            let applied = network.apply_remote_updates(&mut self.world);
            if applied > 0 {
                debug!("Applied {applied} remote block updates");
            }
        }

        self.world.update_streaming(self.player.eye_position(), dt)
    }

    /// Removes the block the player is looking at.
    pub fn destroy_block(&mut self) -> Option<Point3<i32>> {
        let position = self.player.destroy_block(&mut self.world)?;
        self.share_edit(position, Block::AIR);
        Some(position)
    }

    /// Places dirt on the face the player is looking at.
    pub fn place_block(&mut self) -> Option<Point3<i32>> {
        let position = self.player.place_block(&mut self.world)?;
        self.share_edit(position, self.world.get_block(position));
        Some(position)
    }

    fn share_edit(&mut self, position: Point3<i32>, block: Block) {
        if let Some(network) = self.network.as_mut() {
            network.register_block_update(BlockUpdate::new(position, block));
        }
    }

    /// The packet describing this tick's local state, for sending to peers.
    ///
    /// # Returns
    /// `None` when not connected.
    pub fn outgoing_packet(&mut self) -> Option<PlayerPacket> {
        let pose = PlayerPose {
            position: self.player.eye_position(),
            pitch: self.player.pitch().0,
            yaw: self.player.yaw().0,
        };
        Some(self.network.as_mut()?.outgoing_packet(pose))
    }

    /// Projection times view for a viewport of the given aspect ratio.
    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        perspective(FIELD_OF_VIEW, aspect, NEAR_PLANE, FAR_PLANE) * self.player.view_matrix()
    }

    /// Chunks to draw this frame.
    pub fn visible_chunks(&self, aspect: f32) -> Vec<VisibleChunk<'_>> {
        self.world.visible_chunks(self.view_projection(aspect))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Rad;

    use super::*;
    use crate::config::GenerationMethod;
    use crate::engine_state::networking::RemotePeers;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn flat_engine() -> EngineState {
        let config = WorldConfig {
            render_distance: 16.0,
            generation: GenerationMethod::Flat { height: 4 },
            ..WorldConfig::default()
        };
        EngineState::with_player_at(config, Point3::new(8.5, 8.0, 8.5))
    }

    #[test]
    fn first_tick_builds_the_ground_under_the_player() {
        let mut engine = flat_engine();
        let stats = engine.tick(1.0 / 60.0, &PlayerInput::default());
        assert!(stats.generated >= 1);
        assert!(engine.world().is_meshed(cgmath::Point2::new(0, 0)));
    }

    #[test]
    fn player_settles_on_flat_ground() {
        let mut engine = flat_engine();
        for _ in 0..120 {
            engine.tick(1.0 / 60.0, &PlayerInput::default());
        }
        assert!((engine.player().position().y - 4.9).abs() < 1e-3);
        assert!(engine.player().is_grounded());
    }

    #[test]
    fn edits_are_shared_with_peers() {
        let mut engine = flat_engine();
        engine.connect(NetworkState::new(RemotePeers::client()));
        for _ in 0..120 {
            engine.tick(1.0 / 60.0, &PlayerInput::default());
        }
        engine.player_mut().set_rotation(Rad(0.0), Deg(-90.0).into());

        let destroy = PlayerInput {
            destroy: true,
            ..PlayerInput::default()
        };
        engine.tick(1.0 / 60.0, &destroy);
        assert!(engine.world().get_block(Point3::new(8, 3, 8)).is_air());

        let packet = engine.outgoing_packet().expect("connected");
        assert_eq!(packet.block.position, Point3::new(8, 3, 8));
        assert_eq!(packet.block.block_type, BlockType::Air);
    }

    #[test]
    fn the_player_chunk_is_visible() {
        let mut engine = flat_engine();
        engine.tick(1.0 / 60.0, &PlayerInput::default());
        engine.player_mut().set_rotation(Rad(0.0), Deg(-60.0).into());
        let visible = engine.visible_chunks(16.0 / 9.0);
        assert!(visible
            .iter()
            .any(|chunk| chunk.position == cgmath::Point2::new(0, 0)));
    }
}
