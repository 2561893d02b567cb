use thiserror::Error;

/// Errors that can occur during peer communication.
#[derive(Debug, Error)]
pub enum PeerError {
    /// A frame that does not follow the peer wire format.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// The peer sent an invalid handshake.
    #[error("invalid handshake")]
    InvalidHandshake,

    /// The peer's info hash doesn't match ours.
    #[error("info hash mismatch")]
    InfoHashMismatch,

    /// The connection was closed by the peer.
    #[error("connection closed")]
    ConnectionClosed,

    /// Operation timed out.
    #[error("timeout")]
    Timeout,

    /// Network I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PeerError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        PeerError::MalformedMessage(reason.into())
    }
}
