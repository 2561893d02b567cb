//! Protocol constants and default parameters.
//!
//! Values that are fixed by the protocol live next to values that are merely
//! defaults; the latter can be overridden through [`DecodeOptions`] and
//! [`TrackerConfig`].
//!
//! [`DecodeOptions`]: crate::bencode::DecodeOptions
//! [`TrackerConfig`]: crate::tracker::TrackerConfig

use std::time::Duration;

// ============================================================================
// Client identification
// ============================================================================

/// Client ID prefix for peer ID generation (Azureus-style)
pub const CLIENT_PREFIX: &str = "-BW0100-";

/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("bitwire/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Ports
// ============================================================================

/// Default BitTorrent listen port
pub const DEFAULT_PORT: u16 = 6881;

// ============================================================================
// Bencode
// ============================================================================

/// Default nesting limit when decoding bencode
pub const MAX_BENCODE_DEPTH: usize = 64;

// ============================================================================
// Tracker
// ============================================================================

/// Number of peers a tracker returns when the request does not say otherwise
pub const DEFAULT_NUMWANT: i32 = 50;

/// Timeout for a whole HTTP announce, connect to last body byte
pub const HTTP_TRACKER_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Peer wire
// ============================================================================

/// Protocol string sent in the handshake
pub const PROTOCOL_STRING: &[u8; 19] = b"BitTorrent protocol";

/// Handshake size: pstrlen + pstr + reserved + info hash + peer id
pub const HANDSHAKE_LEN: usize = 1 + 19 + 8 + 20 + 20;

/// Timeout for establishing a TCP connection to a peer
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// Time to wait for data from a peer; peers send keep-alives every two minutes
pub const PEER_READ_TIMEOUT: Duration = Duration::from_secs(180);

/// Time allowed for one write to a peer
pub const PEER_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest frame accepted from a peer (id + payload)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
