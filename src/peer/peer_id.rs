use std::fmt;

use rand::Rng as _;

use crate::constants::CLIENT_PREFIX;

/// The 20 bytes a client announces itself with.
///
/// The same id goes into the tracker query's `peer_id` and into the last
/// 20 bytes of the handshake. Ids made by [`PeerId::generate`] start with
/// [`CLIENT_PREFIX`]; ids received from others are kept as sent.
///
/// # Examples
///
/// ```
/// use bitwire::peer::PeerId;
///
/// let peer_id = PeerId::generate();
/// assert_eq!(peer_id.as_bytes().len(), 20);
/// assert_eq!(peer_id.client_id(), Some("BW0100"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub [u8; 20]);

impl PeerId {
    /// [`CLIENT_PREFIX`] followed by 12 random bytes.
    pub fn generate() -> Self {
        let mut id = [0u8; 20];
        id[..8].copy_from_slice(CLIENT_PREFIX.as_bytes());
        rand::rng().fill(&mut id[8..]);
        Self(id)
    }

    /// Reads an id from a handshake or tracker peer entry; `None` unless 20 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let id: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The six characters between the dashes of a `-XXnnnn-` prefix, such as
    /// `BW0100` for this crate.
    pub fn client_id(&self) -> Option<&str> {
        if self.0[0] == b'-' && self.0[7] == b'-' {
            std::str::from_utf8(&self.0[1..7]).ok()
        } else {
            None
        }
    }
}

impl From<[u8; 20]> for PeerId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(client) = self.client_id() {
            write!(f, "PeerId({})", client)
        } else {
            write!(f, "PeerId({})", hex::encode(&self.0[..8]))
        }
    }
}

/// Printable form for logs: ASCII alphanumerics and `-` as is, other bytes
/// as `%xx`.
impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            if byte.is_ascii_alphanumeric() || *byte == b'-' {
                write!(f, "{}", *byte as char)?;
            } else {
                write!(f, "%{:02x}", byte)?;
            }
        }
        Ok(())
    }
}
