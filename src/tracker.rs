//! Tracker announce protocol ([BEP-3], [BEP-23]).
//!
//! [`TrackerRequest`] builds the announce query, [`TrackerResponse`] decodes
//! the reply, and [`HttpTracker`] sends one over HTTP.
//!
//! # Query encoding
//!
//! `info_hash` and `peer_id` are raw 20-byte values, not text, so they are
//! percent-encoded byte by byte with [`percent_encode`]. Optional parameters
//! are only sent when they differ from their defaults.
//!
//! # Peer lists
//!
//! Trackers return `peers` either as a list of dictionaries or as a compact
//! string of 6-byte records (4-byte IPv4 address, 2-byte big-endian port).
//! Both are accepted, as is a compact `peers6` string of 18-byte records
//! ([BEP-7]). The reply is decoded as a whole first and only then is the
//! shape of `peers` inspected.
//!
//! ```
//! use bitwire::tracker::TrackerResponse;
//!
//! let body = b"d8:intervali1800e5:peers6:\x7f\x00\x00\x01\x1a\xe1e";
//! let response = TrackerResponse::from_bytes(body).unwrap();
//! assert_eq!(response.peers[0].ip, "127.0.0.1");
//! assert_eq!(response.peers[0].port, 6881);
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-7]: http://bittorrent.org/beps/bep_0007.html
//! [BEP-23]: http://bittorrent.org/beps/bep_0023.html

mod error;
mod http;
mod request;
mod response;

pub use error::TrackerError;
pub use http::{HttpTracker, TrackerConfig};
pub use request::{percent_encode, TrackerEvent, TrackerRequest};
pub use response::{parse_compact_peers, parse_compact_peers6, Peer, TrackerResponse};
