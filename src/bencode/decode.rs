use super::error::BencodeError;
use super::span::{find_matching_end, length_prefix, string_token};
use super::value::{Dict, Value};
use crate::constants::MAX_BENCODE_DEPTH;
use bytes::Bytes;

/// Decoder settings.
///
/// The default validates everything. [`DecodeOptions::fast`] skips the
/// declared-length check on a top-level byte string, for input that is
/// already trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject a top-level byte string whose declared length differs from its payload.
    pub validate_string_lengths: bool,
    /// Maximum container nesting depth.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            validate_string_lengths: true,
            max_depth: MAX_BENCODE_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn fast() -> Self {
        Self {
            validate_string_lengths: false,
            ..Self::default()
        }
    }
}

/// Decodes a complete bencode value.
///
/// The whole of `data` must be exactly one value: an integer must end in the
/// final `e`, a byte string's payload must fill the rest of the buffer, and a
/// container's matching `e` must be the last byte.
///
/// # Examples
///
/// ```
/// use bitwire::bencode::{decode, Value};
///
/// let value = decode(b"l4:spami42ee").unwrap();
/// assert_eq!(
///     value,
///     Value::List(vec![Value::string("spam"), Value::Integer(42)])
/// );
///
/// assert!(decode(b"3:spam").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    decode_with(data, DecodeOptions::default())
}

/// Decodes a complete bencode value with explicit [`DecodeOptions`].
pub fn decode_with(data: &[u8], options: DecodeOptions) -> Result<Value, BencodeError> {
    let first = *data.first().ok_or(BencodeError::TruncatedInput)?;

    match first {
        b'i' => decode_integer(data).map(Value::Integer),
        b'0'..=b'9' => parse_string(data, options.validate_string_lengths).map(Value::Bytes),
        b'l' | b'd' => {
            let end = find_matching_end(data, 0)?;
            if end + 1 != data.len() {
                return Err(BencodeError::UnterminatedContainer(end + 1));
            }
            Parser { data, options }.container(0, end, 0)
        }
        byte => Err(BencodeError::UnexpectedByte { byte, offset: 0 }),
    }
}

/// Decodes `i<digits>e` into an integer.
///
/// Rejects an empty body, leading zeros, `-0`, and values outside `i64`.
pub fn decode_integer(data: &[u8]) -> Result<i64, BencodeError> {
    match data {
        [b'i', body @ .., b'e'] => parse_integer(body),
        _ => Err(BencodeError::MalformedInteger(
            String::from_utf8_lossy(data).into_owned(),
        )),
    }
}

/// Decodes `<len>:<payload>`, requiring the declared length to match the payload.
pub fn decode_string(data: &[u8]) -> Result<Bytes, BencodeError> {
    parse_string(data, true)
}

/// Decodes a complete bencoded list.
pub fn decode_list(data: &[u8]) -> Result<Vec<Value>, BencodeError> {
    match data.first() {
        Some(b'l') => match decode(data)? {
            Value::List(list) => Ok(list),
            _ => Err(BencodeError::UnexpectedByte { byte: b'l', offset: 0 }),
        },
        Some(&byte) => Err(BencodeError::UnexpectedByte { byte, offset: 0 }),
        None => Err(BencodeError::TruncatedInput),
    }
}

/// Decodes a complete bencoded dictionary, preserving key order.
pub fn decode_dict(data: &[u8]) -> Result<Dict, BencodeError> {
    match data.first() {
        Some(b'd') => decode(data)?
            .into_dict()
            .ok_or(BencodeError::UnexpectedByte { byte: b'd', offset: 0 }),
        Some(&byte) => Err(BencodeError::UnexpectedByte { byte, offset: 0 }),
        None => Err(BencodeError::TruncatedInput),
    }
}

fn parse_integer(body: &[u8]) -> Result<i64, BencodeError> {
    let malformed = |reason: &str| {
        BencodeError::MalformedInteger(format!(
            "{} ({:?})",
            reason,
            String::from_utf8_lossy(body)
        ))
    };

    let digits = body.strip_prefix(b"-").unwrap_or(body);

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed("not a decimal number"));
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return Err(malformed("leading zero"));
    }
    if digits.len() != body.len() && digits == b"0" {
        return Err(malformed("negative zero"));
    }

    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed("out of range"))
}

fn parse_string(data: &[u8], validate: bool) -> Result<Bytes, BencodeError> {
    let (declared, colon) = length_prefix(data, 0)?;
    let payload = &data[colon + 1..];

    if payload.len() < declared || (validate && payload.len() != declared) {
        return Err(BencodeError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let len = if validate { declared } else { payload.len() };
    Ok(Bytes::copy_from_slice(&payload[..len]))
}

/// Scans containers whose extent is already known.
///
/// Every `end` passed around is the offset of the container's own closing
/// `e`, located with [`find_matching_end`] before the container is entered.
struct Parser<'a> {
    data: &'a [u8],
    options: DecodeOptions,
}

impl Parser<'_> {
    fn container(&self, start: usize, end: usize, depth: usize) -> Result<Value, BencodeError> {
        if depth > self.options.max_depth {
            return Err(BencodeError::NestingTooDeep);
        }

        let mut pos = start + 1;

        if self.data[start] == b'l' {
            let mut list = Vec::new();
            while pos < end {
                let (value, next) = self.element(pos, end, depth)?;
                list.push(value);
                pos = next;
            }
            return Ok(Value::List(list));
        }

        let mut dict = Dict::new();
        while pos < end {
            let (key, next) = self.key(pos, end)?;
            if next >= end {
                return Err(BencodeError::UnterminatedContainer(end));
            }
            let (value, next) = self.element(next, end, depth)?;
            dict.insert(key, value);
            pos = next;
        }
        Ok(Value::Dict(dict))
    }

    fn key(&self, pos: usize, end: usize) -> Result<(Bytes, usize), BencodeError> {
        match self.data[pos] {
            b'0'..=b'9' => {
                let (range, next) = string_token(self.data, pos)?;
                if next > end {
                    return Err(BencodeError::UnterminatedContainer(end));
                }
                Ok((Bytes::copy_from_slice(&self.data[range]), next))
            }
            b'i' | b'l' | b'd' => Err(BencodeError::InvalidKeyType),
            byte => Err(BencodeError::UnexpectedByte { byte, offset: pos }),
        }
    }

    fn element(&self, pos: usize, end: usize, depth: usize) -> Result<(Value, usize), BencodeError> {
        match self.data[pos] {
            b'i' => {
                let close = self.data[pos..end]
                    .iter()
                    .position(|&b| b == b'e')
                    .map(|offset| pos + offset)
                    .ok_or(BencodeError::UnterminatedContainer(end))?;
                let value = decode_integer(&self.data[pos..=close])?;
                Ok((Value::Integer(value), close + 1))
            }
            b'0'..=b'9' => {
                let (range, next) = string_token(self.data, pos)?;
                if next > end {
                    return Err(BencodeError::UnterminatedContainer(end));
                }
                Ok((Value::Bytes(Bytes::copy_from_slice(&self.data[range])), next))
            }
            b'l' | b'd' => {
                let close = find_matching_end(self.data, pos)?;
                if close >= end {
                    return Err(BencodeError::UnterminatedContainer(end));
                }
                let value = self.container(pos, close, depth + 1)?;
                Ok((value, close + 1))
            }
            byte => Err(BencodeError::UnexpectedByte { byte, offset: pos }),
        }
    }
}
