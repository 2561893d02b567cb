//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:bar4:spam3:fooi42ee` → {"bar": "spam", "foo": 42} |
//!
//! # Container extents
//!
//! Lists and dictionaries are decoded by first locating their closing `e` with
//! [`find_matching_end`], which skips byte-string payloads by their declared
//! length. A payload containing `e`, `i`, `l` or `d` bytes therefore never
//! ends a container early. The same routine lets [`dict_value_span`] carve the
//! raw bytes of a dictionary value out of a buffer, which is how the info-hash
//! of a torrent is taken over the exact bytes found in the file.
//!
//! # Key order
//!
//! [`Dict`] keeps keys in the order they were decoded or inserted, and
//! [`encode`] writes them back in that order. Decoding and re-encoding a
//! value yields the original bytes, unless a dictionary repeated a key.
//!
//! ```
//! use bitwire::bencode::{decode, encode};
//!
//! let data = b"d3:foo3:bar3:baz4:spame";
//! let value = decode(data).unwrap();
//! assert_eq!(encode(&value), data);
//! ```
//!
//! # Error Handling
//!
//! - [`BencodeError::MalformedInteger`] - leading zeros, `-0`, non-digits
//! - [`BencodeError::LengthMismatch`] - declared string length differs from payload
//! - [`BencodeError::UnexpectedByte`] - a byte that cannot start a value
//! - [`BencodeError::UnterminatedContainer`] - a container overruns its `e`, or trailing bytes
//! - [`BencodeError::TruncatedInput`] - input ended before the value did
//! - [`BencodeError::InvalidKeyType`] - a dictionary key that is not a byte string
//! - [`BencodeError::NestingTooDeep`] - recursion limit exceeded (64 levels by default)
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod span;
mod value;

pub use decode::{
    decode, decode_dict, decode_integer, decode_list, decode_string, decode_with, DecodeOptions,
};
pub use encode::{encode, encode_dict, encode_integer, encode_list, encode_string, encode_to};
pub use error::BencodeError;
pub use span::{dict_value_span, find_matching_end};
pub use value::{Dict, Value};

#[cfg(test)]
mod tests;
