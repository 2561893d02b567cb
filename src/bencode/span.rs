use super::error::BencodeError;
use std::ops::Range;

/// Returns the offset of the `e` that closes the value opened at `start`.
///
/// `data[start]` must be `i`, `l` or `d`. The scan keeps a nesting counter and
/// skips every byte-string payload by its declared length, so payload bytes
/// that happen to look like `e`, `i`, `l` or `d` never affect the result.
///
/// # Examples
///
/// ```
/// use bitwire::bencode::find_matching_end;
///
/// // The one-byte string "e" inside the list is skipped, not counted.
/// assert_eq!(find_matching_end(b"l1:ee", 0).unwrap(), 4);
/// assert_eq!(find_matching_end(b"d1:ai1ee4:tail", 0).unwrap(), 7);
/// ```
///
/// # Errors
///
/// - [`BencodeError::TruncatedInput`] if the buffer ends before the value is
///   closed, or a length prefix points past the end of the buffer.
/// - [`BencodeError::UnexpectedByte`] if `start` does not open a value, or a
///   byte that cannot begin any token is found.
pub fn find_matching_end(data: &[u8], start: usize) -> Result<usize, BencodeError> {
    match data.get(start) {
        Some(b'i' | b'l' | b'd') => {}
        Some(&byte) => return Err(BencodeError::UnexpectedByte { byte, offset: start }),
        None => return Err(BencodeError::TruncatedInput),
    }

    let mut depth = 1usize;
    let mut pos = start + 1;

    while let Some(&byte) = data.get(pos) {
        match byte {
            b'e' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
                pos += 1;
            }
            b'i' | b'l' | b'd' => {
                depth += 1;
                pos += 1;
            }
            b'0'..=b'9' => {
                let digits_end = skip_digits(data, pos);
                if data.get(digits_end) == Some(&b':') {
                    let len = parse_length(&data[pos..digits_end])?;
                    pos = payload_end(data, digits_end + 1, len)?;
                } else {
                    // digits of an integer body
                    pos = digits_end;
                }
            }
            b'-' => pos += 1,
            _ => return Err(BencodeError::UnexpectedByte { byte, offset: pos }),
        }
    }

    Err(BencodeError::TruncatedInput)
}

/// Locates the raw bytes of `key`'s value in the top-level dictionary of `data`.
///
/// Only the outer dictionary's keys are compared; a nested dictionary or a
/// string payload containing the same bytes is never matched. Returns `None`
/// when the key is absent. A repeated key yields its last value, the one
/// [`decode`](super::decode) keeps.
///
/// # Examples
///
/// ```
/// use bitwire::bencode::dict_value_span;
///
/// let data = b"d3:fooi1e4:infod1:xi2eee";
/// let span = dict_value_span(data, b"info").unwrap().unwrap();
/// assert_eq!(&data[span], b"d1:xi2ee");
/// ```
pub fn dict_value_span(data: &[u8], key: &[u8]) -> Result<Option<Range<usize>>, BencodeError> {
    match data.first() {
        Some(b'd') => {}
        Some(&byte) => return Err(BencodeError::UnexpectedByte { byte, offset: 0 }),
        None => return Err(BencodeError::TruncatedInput),
    }

    let mut pos = 1;
    let mut found = None;
    loop {
        match data.get(pos) {
            None => return Err(BencodeError::TruncatedInput),
            Some(b'e') => return Ok(found),
            Some(b'0'..=b'9') => {}
            Some(b'i' | b'l' | b'd') => return Err(BencodeError::InvalidKeyType),
            Some(&byte) => return Err(BencodeError::UnexpectedByte { byte, offset: pos }),
        }

        let (key_range, value_start) = string_token(data, pos)?;
        let value_end = value_end(data, value_start)?;

        if &data[key_range] == key {
            found = Some(value_start..value_end);
        }
        pos = value_end;
    }
}

/// Returns the offset just past the value starting at `pos`.
pub(crate) fn value_end(data: &[u8], pos: usize) -> Result<usize, BencodeError> {
    match data.get(pos) {
        Some(b'i' | b'l' | b'd') => Ok(find_matching_end(data, pos)? + 1),
        Some(b'0'..=b'9') => Ok(string_token(data, pos)?.1),
        Some(&byte) => Err(BencodeError::UnexpectedByte { byte, offset: pos }),
        None => Err(BencodeError::TruncatedInput),
    }
}

/// Reads the length prefix of the byte string at `pos`.
///
/// Returns the declared length and the offset of the `:` separator.
pub(crate) fn length_prefix(data: &[u8], pos: usize) -> Result<(usize, usize), BencodeError> {
    let digits_end = skip_digits(data, pos);
    match data.get(digits_end) {
        Some(b':') if digits_end > pos => {
            let len = parse_length(&data[pos..digits_end])?;
            Ok((len, digits_end))
        }
        Some(&byte) => Err(BencodeError::UnexpectedByte {
            byte,
            offset: digits_end,
        }),
        None => Err(BencodeError::TruncatedInput),
    }
}

/// Reads the byte string at `pos`, returning its payload range and the offset after it.
pub(crate) fn string_token(
    data: &[u8],
    pos: usize,
) -> Result<(Range<usize>, usize), BencodeError> {
    let (len, colon) = length_prefix(data, pos)?;
    let end = payload_end(data, colon + 1, len)?;
    Ok((colon + 1..end, end))
}

fn skip_digits(data: &[u8], mut pos: usize) -> usize {
    while data.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

fn parse_length(digits: &[u8]) -> Result<usize, BencodeError> {
    // Only ASCII digits reach here; a failed parse means the value overflows usize.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(BencodeError::TruncatedInput)
}

fn payload_end(data: &[u8], start: usize, len: usize) -> Result<usize, BencodeError> {
    start
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(BencodeError::TruncatedInput)
}
