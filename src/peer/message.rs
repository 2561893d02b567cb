use super::bitfield::Bitfield;
use super::error::PeerError;
use crate::constants::{HANDSHAKE_LEN, MAX_MESSAGE_SIZE, PROTOCOL_STRING};
use bytes::{Buf, BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageId {
    Choke = 0,
    Unchoke = 1,
    Interested = 2,
    NotInterested = 3,
    Have = 4,
    Bitfield = 5,
    Request = 6,
    Piece = 7,
    Cancel = 8,
    Port = 9,
}

impl TryFrom<u8> for MessageId {
    type Error = PeerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageId::Choke),
            1 => Ok(MessageId::Unchoke),
            2 => Ok(MessageId::Interested),
            3 => Ok(MessageId::NotInterested),
            4 => Ok(MessageId::Have),
            5 => Ok(MessageId::Bitfield),
            6 => Ok(MessageId::Request),
            7 => Ok(MessageId::Piece),
            8 => Ok(MessageId::Cancel),
            9 => Ok(MessageId::Port),
            _ => Err(PeerError::malformed(format!("unknown message id {}", value))),
        }
    }
}

/// The first message on a connection.
///
/// `<19><"BitTorrent protocol"><8 reserved bytes><info hash><peer id>`, 68 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub info_hash: [u8; 20],
    pub peer_id: [u8; 20],
    pub reserved: [u8; 8],
}

impl Handshake {
    /// Creates a handshake advertising no extensions.
    pub fn new(info_hash: [u8; 20], peer_id: [u8; 20]) -> Self {
        Self {
            info_hash,
            peer_id,
            reserved: [0u8; 8],
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HANDSHAKE_LEN);
        buf.put_u8(PROTOCOL_STRING.len() as u8);
        buf.put_slice(PROTOCOL_STRING);
        buf.put_slice(&self.reserved);
        buf.put_slice(&self.info_hash);
        buf.put_slice(&self.peer_id);
        buf.freeze()
    }

    /// Decodes a handshake of exactly [`HANDSHAKE_LEN`] bytes.
    ///
    /// Reserved bits are kept as received.
    pub fn decode(data: &[u8]) -> Result<Self, PeerError> {
        if data.len() != HANDSHAKE_LEN {
            return Err(PeerError::InvalidHandshake);
        }

        if data[0] != 19 || &data[1..20] != PROTOCOL_STRING {
            return Err(PeerError::InvalidHandshake);
        }

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&data[20..28]);

        let mut info_hash = [0u8; 20];
        info_hash.copy_from_slice(&data[28..48]);

        let mut peer_id = [0u8; 20];
        peer_id.copy_from_slice(&data[48..68]);

        Ok(Self {
            info_hash,
            peer_id,
            reserved,
        })
    }
}

/// A length-prefixed peer wire message.
///
/// Every message is framed as a 4-byte big-endian length, a 1-byte id and
/// a payload. A zero length with no id is a keep-alive.
///
/// # Examples
///
/// ```
/// use bitwire::peer::Message;
///
/// let msg = Message::Have { piece: 7 };
/// let frame = msg.encode();
/// assert_eq!(&frame[..], &[0, 0, 0, 5, 4, 0, 0, 0, 7]);
/// assert_eq!(Message::decode(frame).unwrap(), msg);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    KeepAlive,
    Choke,
    Unchoke,
    Interested,
    NotInterested,
    Have { piece: u32 },
    Bitfield(Bytes),
    Request { index: u32, begin: u32, length: u32 },
    Piece { index: u32, begin: u32, data: Bytes },
    Cancel { index: u32, begin: u32, length: u32 },
    Port(u16),
}

impl Message {
    /// Builds a `bitfield` message from a packed bitfield.
    pub fn bitfield(bitfield: &Bitfield) -> Self {
        Message::Bitfield(bitfield.to_bytes())
    }

    pub fn id(&self) -> Option<MessageId> {
        match self {
            Message::KeepAlive => None,
            Message::Choke => Some(MessageId::Choke),
            Message::Unchoke => Some(MessageId::Unchoke),
            Message::Interested => Some(MessageId::Interested),
            Message::NotInterested => Some(MessageId::NotInterested),
            Message::Have { .. } => Some(MessageId::Have),
            Message::Bitfield(_) => Some(MessageId::Bitfield),
            Message::Request { .. } => Some(MessageId::Request),
            Message::Piece { .. } => Some(MessageId::Piece),
            Message::Cancel { .. } => Some(MessageId::Cancel),
            Message::Port(_) => Some(MessageId::Port),
        }
    }

    /// Value of the length prefix: id plus payload bytes.
    pub fn frame_len(&self) -> usize {
        match self {
            Message::KeepAlive => 0,
            Message::Choke | Message::Unchoke | Message::Interested | Message::NotInterested => 1,
            Message::Have { .. } => 5,
            Message::Bitfield(bits) => 1 + bits.len(),
            Message::Request { .. } | Message::Cancel { .. } => 13,
            Message::Piece { data, .. } => 9 + data.len(),
            Message::Port(_) => 3,
        }
    }

    /// Encodes the full frame, length prefix included.
    ///
    /// Frames longer than [`MAX_MESSAGE_SIZE`] are never sent; callers
    /// going through [`PeerTransport`](super::PeerTransport) get an error
    /// for them instead.
    pub fn encode(&self) -> Bytes {
        let len = self.frame_len();
        let mut buf = BytesMut::with_capacity(4 + len);
        buf.put_u32(len as u32);

        if let Some(id) = self.id() {
            buf.put_u8(id as u8);
        }

        match self {
            Message::KeepAlive
            | Message::Choke
            | Message::Unchoke
            | Message::Interested
            | Message::NotInterested => {}
            Message::Have { piece } => buf.put_u32(*piece),
            Message::Bitfield(bits) => buf.put_slice(bits),
            Message::Request {
                index,
                begin,
                length,
            }
            | Message::Cancel {
                index,
                begin,
                length,
            } => {
                buf.put_u32(*index);
                buf.put_u32(*begin);
                buf.put_u32(*length);
            }
            Message::Piece { index, begin, data } => {
                buf.put_u32(*index);
                buf.put_u32(*begin);
                buf.put_slice(data);
            }
            Message::Port(port) => buf.put_u16(*port),
        }

        buf.freeze()
    }

    /// Decodes exactly one frame, length prefix included.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError::MalformedMessage`] if the length prefix does not
    /// match the bytes given, the id is unknown, or a fixed-size message has
    /// the wrong payload size.
    pub fn decode(mut data: Bytes) -> Result<Self, PeerError> {
        if data.len() < 4 {
            return Err(PeerError::malformed("too short"));
        }

        let length = data.get_u32() as usize;
        if data.remaining() != length {
            return Err(PeerError::malformed(format!(
                "length prefix {} does not match {} payload bytes",
                length,
                data.remaining()
            )));
        }

        if length == 0 {
            return Ok(Message::KeepAlive);
        }

        let id = MessageId::try_from(data.get_u8())?;
        match id {
            MessageId::Choke => expect_len(&data, 0, "choke").map(|_| Message::Choke),
            MessageId::Unchoke => expect_len(&data, 0, "unchoke").map(|_| Message::Unchoke),
            MessageId::Interested => {
                expect_len(&data, 0, "interested").map(|_| Message::Interested)
            }
            MessageId::NotInterested => {
                expect_len(&data, 0, "not interested").map(|_| Message::NotInterested)
            }
            MessageId::Have => {
                expect_len(&data, 4, "have")?;
                Ok(Message::Have {
                    piece: data.get_u32(),
                })
            }
            MessageId::Bitfield => Ok(Message::Bitfield(data)),
            MessageId::Request => {
                expect_len(&data, 12, "request")?;
                Ok(Message::Request {
                    index: data.get_u32(),
                    begin: data.get_u32(),
                    length: data.get_u32(),
                })
            }
            MessageId::Piece => {
                if data.remaining() < 8 {
                    return Err(PeerError::malformed("piece too short"));
                }
                let index = data.get_u32();
                let begin = data.get_u32();
                Ok(Message::Piece { index, begin, data })
            }
            MessageId::Cancel => {
                expect_len(&data, 12, "cancel")?;
                Ok(Message::Cancel {
                    index: data.get_u32(),
                    begin: data.get_u32(),
                    length: data.get_u32(),
                })
            }
            MessageId::Port => {
                expect_len(&data, 2, "port")?;
                Ok(Message::Port(data.get_u16()))
            }
        }
    }

    /// Splits the next complete frame off the front of a receive buffer.
    ///
    /// Returns `Ok(None)` and leaves the buffer untouched until the whole
    /// frame has arrived.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError::MalformedMessage`] for a frame longer than
    /// [`MAX_MESSAGE_SIZE`] or one that fails [`Message::decode`].
    pub fn decode_frame(buf: &mut BytesMut) -> Result<Option<Self>, PeerError> {
        if buf.len() < 4 {
            return Ok(None);
        }

        let length = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        if length > MAX_MESSAGE_SIZE {
            return Err(PeerError::malformed(format!(
                "message too large: {}",
                length
            )));
        }

        let total_len = 4 + length;
        if buf.len() < total_len {
            buf.reserve(total_len - buf.len());
            return Ok(None);
        }

        let frame = buf.split_to(total_len).freeze();
        Message::decode(frame).map(Some)
    }
}

fn expect_len(payload: &Bytes, size: usize, name: &str) -> Result<(), PeerError> {
    if payload.remaining() == size {
        Ok(())
    } else {
        Err(PeerError::malformed(format!(
            "{} payload is {} bytes, expected {}",
            name,
            payload.remaining(),
            size
        )))
    }
}
