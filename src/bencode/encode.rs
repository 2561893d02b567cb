use super::error::BencodeError;
use super::value::{Dict, Value};
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e`, keys in stored order
///
/// Dictionary keys are written in the order the [`Dict`] holds them. The
/// encoder does not sort, so a decoded value re-encodes to its original bytes.
///
/// # Examples
///
/// ```
/// use bitwire::bencode::{encode, Dict, Value};
///
/// assert_eq!(encode(&Value::Integer(42)), b"i42e");
/// assert_eq!(encode(&Value::string("hello")), b"5:hello");
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list), b"li1e3:twoe");
///
/// let mut dict = Dict::new();
/// dict.insert("b", Value::Integer(2));
/// dict.insert("a", Value::Integer(1));
/// assert_eq!(encode(&Value::Dict(dict)), b"d1:bi2e1:ai1ee");
/// ```
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf);
    buf
}

/// Encodes a bencode value into a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn encode_to<W: Write>(value: &Value, writer: &mut W) -> Result<(), BencodeError> {
    writer.write_all(&encode(value))?;
    Ok(())
}

pub fn encode_integer(value: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    put_integer(value, &mut buf);
    buf
}

pub fn encode_string(bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(bytes.len() + 8);
    put_string(bytes, &mut buf);
    buf
}

pub fn encode_list(items: &[Value]) -> Vec<u8> {
    let mut buf = Vec::new();
    put_list(items, &mut buf);
    buf
}

pub fn encode_dict(dict: &Dict) -> Vec<u8> {
    let mut buf = Vec::new();
    put_dict(dict, &mut buf);
    buf
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Integer(i) => put_integer(*i, buf),
        Value::Bytes(b) => put_string(b, buf),
        Value::List(l) => put_list(l, buf),
        Value::Dict(d) => put_dict(d, buf),
    }
}

fn put_integer(value: i64, buf: &mut Vec<u8>) {
    buf.push(b'i');
    buf.extend_from_slice(value.to_string().as_bytes());
    buf.push(b'e');
}

fn put_string(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}

fn put_list(items: &[Value], buf: &mut Vec<u8>) {
    buf.push(b'l');
    for item in items {
        encode_value(item, buf);
    }
    buf.push(b'e');
}

fn put_dict(dict: &Dict, buf: &mut Vec<u8>) {
    buf.push(b'd');
    for (key, val) in dict.iter() {
        put_string(key, buf);
        encode_value(val, buf);
    }
    buf.push(b'e');
}
