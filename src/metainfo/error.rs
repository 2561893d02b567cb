use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur when parsing torrent files.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing or has the wrong shape.
    #[error("invalid metainfo: {0}")]
    InvalidMetainfo(String),

    /// The `pieces` string is not a whole number of 20-byte hashes.
    #[error("corrupt piece list: {0} bytes is not a multiple of 20")]
    CorruptPieceList(usize),

    /// The info hash has an invalid length (must be 20 bytes).
    #[error("invalid info hash")]
    InvalidInfoHash,

    /// An I/O error occurred while reading the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetainfoError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MetainfoError::InvalidMetainfo(reason.into())
    }
}
