//! # Networking Module
//!
//! Shared-world multiplayer without the transport.
//!
//! Each tick a peer sends one `PlayerPacket` with its pose and at most one
//! block edit. The host relays every client's packets to the other clients.
//! Remote edits are applied through `World::set_block`, the same entry point
//! local edits use. Sockets are left to the embedding application, which
//! moves encoded records between peers and hands received bytes to
//! `NetworkState`.

use log::warn;

use crate::engine_state::voxels::world::World;

pub mod records;
pub mod remote_players;

pub use records::{BlockUpdate, IdentifiedPacket, PlayerPacket, PlayerPose, RecordError};
pub use remote_players::{host_packet, relay_id, RemotePeers, RemotePlayer};

/// Local end of a multiplayer session.
#[derive(Clone, Debug)]
pub struct NetworkState {
    peers: RemotePeers,
    pending_update: BlockUpdate,
}

impl NetworkState {
    pub fn new(peers: RemotePeers) -> Self {
        NetworkState {
            peers,
            pending_update: BlockUpdate::none(),
        }
    }

    pub fn peers(&self) -> &RemotePeers {
        &self.peers
    }

    pub fn peers_mut(&mut self) -> &mut RemotePeers {
        &mut self.peers
    }

    /// Queues a local edit for the next outgoing packet.
    ///
    /// Only one edit fits in a packet; a later edit in the same tick replaces
    /// an earlier one.
    pub fn register_block_update(&mut self, update: BlockUpdate) {
        self.pending_update = update;
    }

    /// Builds this tick's packet and clears the pending edit.
    pub fn outgoing_packet(&mut self, pose: PlayerPose) -> PlayerPacket {
        PlayerPacket {
            pose,
            block: std::mem::take(&mut self.pending_update),
        }
    }

    /// Encodes this tick's packet for the wire.
    ///
    /// A host announces itself as player 0 in the relay format its clients
    /// read; a client sends a plain `PlayerPacket` to the host.
    pub fn outgoing_bytes(&mut self, pose: PlayerPose) -> Result<Vec<u8>, RecordError> {
        let packet = self.outgoing_packet(pose);
        if self.peers.is_host() {
            host_packet(packet).encode()
        } else {
            packet.encode()
        }
    }

    /// Host side: decodes bytes from client `sender`.
    ///
    /// # Returns
    /// Encoded relays for the other clients, keyed by recipient. Undecodable
    /// bytes are logged and dropped.
    pub fn receive_client_bytes(&mut self, sender: usize, bytes: &[u8]) -> Vec<(usize, Vec<u8>)> {
        let packet = match PlayerPacket::decode(bytes) {
            Ok(packet) => packet,
            Err(error) => {
                warn!("Dropping packet from client {sender}: {error}");
                return Vec::new();
            }
        };
        self.peers
            .receive_from_client(sender, packet)
            .into_iter()
            .filter_map(|(recipient, relay)| match relay.encode() {
                Ok(bytes) => Some((recipient, bytes)),
                Err(error) => {
                    warn!("Could not relay to client {recipient}: {error}");
                    None
                }
            })
            .collect()
    }

    /// Client side: decodes bytes relayed by the host.
    pub fn receive_host_bytes(&mut self, bytes: &[u8]) -> Result<(), RecordError> {
        let packet = IdentifiedPacket::decode(bytes).inspect_err(|error| {
            warn!("Dropping packet from host: {error}");
        })?;
        self.peers.receive_from_host(packet);
        Ok(())
    }

    /// Applies every pending remote edit to the world.
    ///
    /// # Returns
    /// The number of edits that changed a block.
    pub fn apply_remote_updates(&mut self, world: &mut World) -> usize {
        self.peers
            .take_block_updates()
            .into_iter()
            .filter(|update| world.set_block(update.position, update.block()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};

    use super::*;
    use crate::config::{GenerationMethod, WorldConfig};
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};

    #[test]
    fn pending_edit_is_sent_once() {
        let mut network = NetworkState::new(RemotePeers::client());
        let update = BlockUpdate::new(Point3::new(0, 1, 0), Block::new(BlockType::Stone));
        network.register_block_update(update);

        assert_eq!(network.outgoing_packet(PlayerPose::default()).block, update);
        assert!(!network.outgoing_packet(PlayerPose::default()).block.is_some());
    }

    #[test]
    fn relayed_edits_reach_the_world() {
        let mut world = World::new(WorldConfig {
            generation: GenerationMethod::Empty,
            ..WorldConfig::default()
        });
        world.load_chunk(Point2::new(0, 0));

        let mut host = NetworkState::new(RemotePeers::host());
        let mut client = NetworkState::new(RemotePeers::client());
        host.peers_mut().accept_client();
        host.peers_mut().accept_client();

        let mut sender = NetworkState::new(RemotePeers::client());
        sender.register_block_update(BlockUpdate::new(
            Point3::new(2, 3, 4),
            Block::new(BlockType::Log),
        ));
        let bytes = sender.outgoing_bytes(PlayerPose::default()).unwrap();
        assert_eq!(bytes.len(), PlayerPacket::SIZE);

        let relays = host.receive_client_bytes(0, &bytes);
        assert_eq!(relays.len(), 1);
        let (recipient, relay) = &relays[0];
        assert_eq!(*recipient, 1);

        client.receive_host_bytes(relay).expect("valid relay");
        assert_eq!(client.apply_remote_updates(&mut world), 1);
        assert_eq!(world.get_block(Point3::new(2, 3, 4)).block_type, BlockType::Log);
    }

    #[test]
    fn host_announces_itself_as_player_zero() {
        let mut host = NetworkState::new(RemotePeers::host());
        host.peers_mut().accept_client();
        host.register_block_update(BlockUpdate::new(
            Point3::new(1, 1, 1),
            Block::new(BlockType::Grass),
        ));
        let pose = PlayerPose {
            position: Point3::new(3.0, 70.0, -2.0),
            ..PlayerPose::default()
        };
        let bytes = host.outgoing_bytes(pose).unwrap();
        assert_eq!(bytes.len(), IdentifiedPacket::SIZE);

        let mut client = NetworkState::new(RemotePeers::client());
        client.receive_host_bytes(&bytes).expect("valid host packet");
        assert_eq!(client.peers().players()[0].pose, pose);
        assert_eq!(client.peers_mut().take_block_updates().len(), 1);
    }

    #[test]
    fn garbage_is_dropped() {
        let mut host = NetworkState::new(RemotePeers::host());
        host.peers_mut().accept_client();
        assert!(host.receive_client_bytes(0, &[1, 2, 3]).is_empty());

        let mut client = NetworkState::new(RemotePeers::client());
        assert!(client.receive_host_bytes(&[0; 5]).is_err());
        assert!(client.peers().players().is_empty());
    }
}
