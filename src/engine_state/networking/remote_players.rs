//! Remote player tables for the two network roles.
//!
//! The host numbers everyone from each recipient's point of view: the host is
//! always player 0 and the other clients fill 1.. with no gap where the
//! recipient itself would be. A client learns about players only from relayed
//! packets and grows its table to fit the largest id seen.

use super::records::{BlockUpdate, IdentifiedPacket, PlayerPacket, PlayerPose};

/// Most clients a host accepts; every id must fit in the packet's `u8`.
pub const MAX_CLIENTS: usize = u8::MAX as usize;

/// Last known state of one remote player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemotePlayer {
    pub pose: PlayerPose,
    /// Edits received from this player since they were last applied.
    pub block_updates: Vec<BlockUpdate>,
}

impl RemotePlayer {
    fn apply(&mut self, packet: &PlayerPacket) {
        self.pose = packet.pose;
        if packet.block.is_some() {
            self.block_updates.push(packet.block);
        }
    }
}

/// Id under which client `sender` is announced to client `recipient`.
///
/// ```text
///              recipient
///            | 0 1 2 ...
///          --+-------
///          0 | . 1 1
///  sender  1 | 1 . 2
///          2 | 2 2 .
/// ```
pub fn relay_id(sender: usize, recipient: usize) -> usize {
    if sender < recipient {
        sender + 1
    } else {
        sender
    }
}

/// The remote side of this process, by role.
#[derive(Clone, Debug, PartialEq)]
pub enum RemotePeers {
    /// This process hosts; one entry per connected client, in connection order.
    Host { clients: Vec<RemotePlayer> },
    /// This process joined a host; entry 0 is the host.
    Client { players: Vec<RemotePlayer> },
}

impl RemotePeers {
    pub fn host() -> Self {
        RemotePeers::Host {
            clients: Vec::new(),
        }
    }

    pub fn client() -> Self {
        RemotePeers::Client {
            players: Vec::new(),
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, RemotePeers::Host { .. })
    }

    pub fn players(&self) -> &[RemotePlayer] {
        match self {
            RemotePeers::Host { clients } => clients,
            RemotePeers::Client { players } => players,
        }
    }

    fn players_mut(&mut self) -> &mut Vec<RemotePlayer> {
        match self {
            RemotePeers::Host { clients } => clients,
            RemotePeers::Client { players } => players,
        }
    }

    /// Registers a newly connected client.
    ///
    /// # Returns
    /// The client's index, or `None` for a client role or a full host.
    pub fn accept_client(&mut self) -> Option<usize> {
        match self {
            RemotePeers::Host { clients } if clients.len() < MAX_CLIENTS => {
                clients.push(RemotePlayer::default());
                Some(clients.len() - 1)
            }
            _ => None,
        }
    }

    /// Forgets a disconnected player. Later indices shift down by one.
    pub fn remove_player(&mut self, index: usize) {
        let players = self.players_mut();
        if index < players.len() {
            players.remove(index);
        }
    }

    /// Host side: records a packet from client `sender` and builds its relays.
    ///
    /// # Returns
    /// One `(recipient, packet)` pair for every other client. Empty for the
    /// client role or an unknown sender.
    pub fn receive_from_client(
        &mut self,
        sender: usize,
        packet: PlayerPacket,
    ) -> Vec<(usize, IdentifiedPacket)> {
        let RemotePeers::Host { clients } = self else {
            return Vec::new();
        };
        let Some(player) = clients.get_mut(sender) else {
            return Vec::new();
        };
        player.apply(&packet);

        (0..clients.len())
            .filter(|&recipient| recipient != sender)
            .filter_map(|recipient| {
                let player_id = u8::try_from(relay_id(sender, recipient)).ok()?;
                Some((recipient, IdentifiedPacket { player_id, packet }))
            })
            .collect()
    }

    /// Client side: records a packet relayed by the host.
    pub fn receive_from_host(&mut self, packet: IdentifiedPacket) {
        let RemotePeers::Client { players } = self else {
            return;
        };
        let id = packet.player_id as usize;
        if id >= players.len() {
            players.resize_with(id + 1, RemotePlayer::default);
        }
        players[id].apply(&packet.packet);
    }

    /// Takes every pending remote edit, oldest first per player.
    pub fn take_block_updates(&mut self) -> Vec<BlockUpdate> {
        self.players_mut()
            .iter_mut()
            .flat_map(|player| player.block_updates.drain(..))
            .collect()
    }
}

/// The packet a host sends about itself. The host is always player 0.
pub fn host_packet(packet: PlayerPacket) -> IdentifiedPacket {
    IdentifiedPacket {
        player_id: 0,
        packet,
    }
}
