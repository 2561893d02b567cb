//! Peer wire protocol ([BEP-3]).
//!
//! A connection starts with a fixed 68-byte [`Handshake`]. After that every
//! [`Message`] is a 4-byte big-endian length, a 1-byte id and a payload.
//!
//! The codec is stateless: [`Message::encode`] and [`Message::decode`] work on
//! single frames, and [`Message::decode_frame`] pulls complete frames out of a
//! receive buffer, so any connection model can drive it. [`PeerTransport`]
//! is one such driver over a tokio stream.
//!
//! # Bitfields
//!
//! A [`Bitfield`] has one bit per piece, most significant bit first, with
//! piece 0 in the high bit of the first byte. Spare bits in the last byte
//! must be zero; [`Bitfield::from_payload`] rejects a payload of the wrong
//! size or with spare bits set.
//!
//! ```
//! use bitwire::peer::{Bitfield, Message};
//!
//! let mut pieces = Bitfield::new(10);
//! for index in [0, 3, 9] {
//!     pieces.set_piece(index);
//! }
//!
//! let frame = Message::bitfield(&pieces).encode();
//! assert_eq!(&frame[..], &[0, 0, 0, 3, 5, 0b1001_0000, 0b0100_0000]);
//! ```
//!
//! # Remote peers
//!
//! [`RemotePeer`] tracks a peer's choke/interest flags and pieces. It refers
//! to its torrent through a [`TorrentId`] handle into a registry kept by the
//! caller.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod bitfield;
mod error;
mod message;
mod peer_id;
mod remote;
mod transport;

pub use bitfield::Bitfield;
pub use error::PeerError;
pub use message::{Handshake, Message, MessageId};
pub use peer_id::PeerId;
pub use remote::{ChokingState, RemotePeer, TorrentId};
pub use transport::PeerTransport;

#[cfg(test)]
mod tests;
