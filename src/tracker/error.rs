use thiserror::Error;

/// Errors that can occur while talking to a tracker or decoding its reply.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("bencode error: {0}")]
    Bencode(#[from] crate::bencode::BencodeError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tracker responded with http status {0}")]
    HttpStatus(u16),

    /// The tracker answered with a `failure reason`.
    #[error("tracker returned error: {0}")]
    Failure(String),

    /// The `peers` or `peers6` value has neither the dictionary nor the compact shape.
    #[error("malformed peer list: {0}")]
    MalformedPeerList(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
