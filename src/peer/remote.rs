use super::bitfield::Bitfield;
use super::error::PeerError;
use super::message::Message;
use super::peer_id::PeerId;
use std::net::SocketAddr;

/// Identifies a torrent in a registry owned by the caller.
///
/// A peer refers to its torrent only through this handle and never holds the
/// torrent itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TorrentId(pub usize);

/// Choke and interest flags for both ends of a connection.
///
/// Connections start choked and not interested in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChokingState {
    pub am_choking: bool,
    pub am_interested: bool,
    pub peer_choking: bool,
    pub peer_interested: bool,
}

impl Default for ChokingState {
    fn default() -> Self {
        Self {
            am_choking: true,
            am_interested: false,
            peer_choking: true,
            peer_interested: false,
        }
    }
}

/// What we know about a remote peer.
///
/// Updated from the messages the peer sends through [`RemotePeer::apply`].
/// The flags for our own side are set by whoever sends our messages.
#[derive(Debug, Clone)]
pub struct RemotePeer {
    torrent: TorrentId,
    peer_id: Option<PeerId>,
    addr: SocketAddr,
    state: ChokingState,
    pieces: Bitfield,
}

impl RemotePeer {
    /// Creates a peer that has no pieces yet.
    pub fn new(torrent: TorrentId, addr: SocketAddr, piece_count: usize) -> Self {
        Self {
            torrent,
            peer_id: None,
            addr,
            state: ChokingState::default(),
            pieces: Bitfield::new(piece_count),
        }
    }

    pub fn with_peer_id(mut self, peer_id: PeerId) -> Self {
        self.peer_id = Some(peer_id);
        self
    }

    pub fn torrent(&self) -> TorrentId {
        self.torrent
    }

    pub fn peer_id(&self) -> Option<&PeerId> {
        self.peer_id.as_ref()
    }

    /// Records the id from the peer's handshake.
    pub fn set_peer_id(&mut self, peer_id: PeerId) {
        self.peer_id = Some(peer_id);
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> &ChokingState {
        &self.state
    }

    pub fn pieces(&self) -> &Bitfield {
        &self.pieces
    }

    pub fn has_piece(&self, index: usize) -> bool {
        self.pieces.has_piece(index)
    }

    pub fn set_am_choking(&mut self, choking: bool) {
        self.state.am_choking = choking;
    }

    pub fn set_am_interested(&mut self, interested: bool) {
        self.state.am_interested = interested;
    }

    /// Applies a message received from this peer.
    ///
    /// Block transfer messages (`request`, `piece`, `cancel`), `port` and
    /// keep-alives leave the peer's state unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError::MalformedMessage`] for a `have` outside the
    /// torrent's piece range or a `bitfield` that does not fit it. The
    /// state is unchanged in that case.
    pub fn apply(&mut self, message: &Message) -> Result<(), PeerError> {
        match message {
            Message::Choke => self.state.peer_choking = true,
            Message::Unchoke => self.state.peer_choking = false,
            Message::Interested => self.state.peer_interested = true,
            Message::NotInterested => self.state.peer_interested = false,
            Message::Have { piece } => {
                let index = *piece as usize;
                if index >= self.pieces.piece_count() {
                    return Err(PeerError::malformed(format!(
                        "have for piece {} of {}",
                        index,
                        self.pieces.piece_count()
                    )));
                }
                self.pieces.set_piece(index);
            }
            Message::Bitfield(bytes) => {
                self.pieces = Bitfield::from_payload(bytes, self.pieces.piece_count())?;
            }
            Message::KeepAlive
            | Message::Request { .. }
            | Message::Piece { .. }
            | Message::Cancel { .. }
            | Message::Port(_) => {}
        }
        Ok(())
    }
}
