use super::error::PeerError;
use bytes::Bytes;

/// A bitfield representing which pieces a peer has.
///
/// Each bit represents whether a piece is available (1) or not (0).
/// Bits are numbered from the high bit of the first byte, and the spare
/// bits after the last piece are always zero.
///
/// # Examples
///
/// ```
/// use bitwire::peer::Bitfield;
///
/// let mut bitfield = Bitfield::new(10);
/// bitfield.set_piece(0);
/// bitfield.set_piece(9);
/// assert_eq!(bitfield.as_bytes(), &[0b1000_0000, 0b0100_0000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitfield {
    bits: Vec<u8>,
    piece_count: usize,
}

impl Bitfield {
    /// Creates a new empty bitfield for the given number of pieces.
    pub fn new(piece_count: usize) -> Self {
        Self {
            bits: vec![0; piece_count.div_ceil(8)],
            piece_count,
        }
    }

    /// Parses a `bitfield` message payload.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError::MalformedMessage`] if the payload is not exactly
    /// `ceil(piece_count / 8)` bytes or any spare bit is set.
    pub fn from_payload(payload: &[u8], piece_count: usize) -> Result<Self, PeerError> {
        let expected = piece_count.div_ceil(8);
        if payload.len() != expected {
            return Err(PeerError::malformed(format!(
                "bitfield is {} bytes, expected {} for {} pieces",
                payload.len(),
                expected,
                piece_count
            )));
        }

        let bf = Self {
            bits: payload.to_vec(),
            piece_count,
        };
        if let Some(&last) = bf.bits.last() {
            if last & !bf.last_byte_mask() != 0 {
                return Err(PeerError::malformed("bitfield has spare bits set"));
            }
        }
        Ok(bf)
    }

    /// Creates a full bitfield (all pieces available).
    pub fn full(piece_count: usize) -> Self {
        let mut bf = Self {
            bits: vec![0xFF; piece_count.div_ceil(8)],
            piece_count,
        };
        let mask = bf.last_byte_mask();
        if let Some(last) = bf.bits.last_mut() {
            *last &= mask;
        }
        bf
    }

    /// Returns true if the piece at the given index is available.
    pub fn has_piece(&self, index: usize) -> bool {
        if index >= self.piece_count {
            return false;
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8);
        (self.bits[byte_index] >> bit_index) & 1 == 1
    }

    /// Sets the bit for the piece at the given index. Out-of-range indices are ignored.
    pub fn set_piece(&mut self, index: usize) {
        if index >= self.piece_count {
            return;
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8);
        self.bits[byte_index] |= 1 << bit_index;
    }

    /// Clears the bit for the piece at the given index.
    pub fn clear_piece(&mut self, index: usize) {
        if index >= self.piece_count {
            return;
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8);
        self.bits[byte_index] &= !(1 << bit_index);
    }

    /// Returns the number of pieces that are available.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Returns true if all pieces are available.
    pub fn is_complete(&self) -> bool {
        self.count() == self.piece_count
    }

    /// Returns true if no pieces are available.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// Returns the packed bytes, as sent in a `bitfield` message.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.bits)
    }

    /// Returns indices of all available pieces.
    pub fn available_pieces(&self) -> Vec<usize> {
        (0..self.piece_count)
            .filter(|&i| self.has_piece(i))
            .collect()
    }

    /// Bits of the last byte that belong to real pieces.
    fn last_byte_mask(&self) -> u8 {
        match self.piece_count % 8 {
            0 => 0xFF,
            used => 0xFFu8 << (8 - used),
        }
    }
}
