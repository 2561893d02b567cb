use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("malformed integer: {0}")]
    MalformedInteger(String),

    #[error("string length mismatch: declared {declared}, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("container not terminated at offset {0}")]
    UnterminatedContainer(usize),

    #[error("input truncated")]
    TruncatedInput,

    #[error("dictionary key is not a byte string")]
    InvalidKeyType,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
