//! bitwire - BitTorrent data formats and wire protocols
//!
//! This library covers the parts of BitTorrent that are about bytes on disk
//! and bytes on the wire, as described in BEP-3.
//!
//! # Modules
//!
//! - [`bencode`] - Bencode encoding/decoding and byte-span lookup
//! - [`metainfo`] - Torrent files and the info hash
//! - [`tracker`] - HTTP tracker announce requests and responses
//! - [`peer`] - Peer wire handshake, messages and bitfields
//! - [`constants`] - Protocol constants and defaults
//!
//! # Example
//!
//! ```no_run
//! use bitwire::metainfo::Metainfo;
//! use bitwire::peer::PeerId;
//! use bitwire::tracker::{HttpTracker, TrackerEvent, TrackerRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Metainfo::from_file("example.torrent")?;
//! let peer_id = PeerId::generate();
//!
//! let mut request = TrackerRequest::new(*torrent.info_hash().as_bytes(), *peer_id.as_bytes());
//! request.set_left(torrent.total_length());
//! request.set_event(TrackerEvent::Started);
//! request.set_compact(true);
//!
//! let tracker = HttpTracker::new(torrent.announce())?;
//! let response = tracker.announce(&request).await?;
//! for peer in &response.peers {
//!     println!("{}:{}", peer.ip, peer.port);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bencode;
pub mod constants;
pub mod metainfo;
pub mod peer;
pub mod tracker;

pub use bencode::{decode, encode, BencodeError, Dict, Value};
pub use metainfo::{File, FileLayout, Info, InfoHash, Metainfo, MetainfoError};
pub use peer::{
    Bitfield, ChokingState, Handshake, Message, PeerError, PeerId, PeerTransport, RemotePeer,
    TorrentId,
};
pub use tracker::{
    HttpTracker, Peer, TrackerConfig, TrackerError, TrackerEvent, TrackerRequest, TrackerResponse,
};
