use bytes::Bytes;

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
}

#[test]
fn test_decode_integer_invalid() {
    let inputs: [&[u8]; 8] = [
        b"i-0e",
        b"i042e",
        b"i-042e",
        b"ie",
        b"i-e",
        b"i4x2e",
        b"i42",
        b"i99999999999999999999e",
    ];
    for input in inputs {
        assert!(
            matches!(decode(input), Err(BencodeError::MalformedInteger(_))),
            "expected malformed integer for {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam").unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(
        decode(b"0:").unwrap(),
        Value::Bytes(Bytes::from_static(b""))
    );
}

#[test]
fn test_decode_bytes_length_mismatch() {
    assert!(matches!(
        decode(b"3:spam"),
        Err(BencodeError::LengthMismatch {
            declared: 3,
            actual: 4
        })
    ));
    assert!(matches!(
        decode(b"5:spam"),
        Err(BencodeError::LengthMismatch {
            declared: 5,
            actual: 4
        })
    ));
}

#[test]
fn test_decode_bytes_fast_mode() {
    let value = decode_with(b"3:spam", DecodeOptions::fast()).unwrap();
    assert_eq!(value, Value::string("spam"));

    // a payload shorter than declared is still an error
    assert!(decode_with(b"9:spam", DecodeOptions::fast()).is_err());
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spami42ee").unwrap();
    assert_eq!(
        result,
        Value::List(vec![Value::string("spam"), Value::Integer(42)])
    );
}

#[test]
fn test_decode_list_payload_with_structural_bytes() {
    assert_eq!(
        decode(b"l1:ee").unwrap(),
        Value::List(vec![Value::string("e")])
    );
    assert_eq!(
        decode(b"l4:ldiel1:eee").unwrap(),
        Value::List(vec![
            Value::string("ldie"),
            Value::List(vec![Value::string("e")]),
        ])
    );
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:bar4:spam3:fooi42ee").unwrap();
    let dict = result.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get(b"bar"), Some(&Value::string("spam")));
    assert_eq!(dict.get(b"foo"), Some(&Value::Integer(42)));

    let keys: Vec<&[u8]> = dict.keys().collect();
    assert_eq!(keys, vec![b"bar".as_slice(), b"foo".as_slice()]);
}

#[test]
fn test_decode_dict_preserves_unsorted_order() {
    let data = b"d4:zeta1:a5:alphai1e3:midd1:yi2e1:xi3eee";
    let value = decode(data).unwrap();

    let keys: Vec<&[u8]> = value.as_dict().unwrap().keys().collect();
    assert_eq!(keys, vec![b"zeta".as_slice(), b"alpha".as_slice(), b"mid".as_slice()]);

    let inner: Vec<&[u8]> = value.get(b"mid").unwrap().as_dict().unwrap().keys().collect();
    assert_eq!(inner, vec![b"y".as_slice(), b"x".as_slice()]);

    assert_eq!(encode(&value), data);
}

#[test]
fn test_decode_dict_repeated_key() {
    let value = decode(b"d1:ai1e1:bi2e1:ai3ee").unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get(b"a"), Some(&Value::Integer(3)));
    assert_eq!(encode(&value), b"d1:ai3e1:bi2ee");
}

#[test]
fn test_decode_dict_invalid_key() {
    assert!(matches!(
        decode(b"di1e3:fooe"),
        Err(BencodeError::InvalidKeyType)
    ));
    assert!(matches!(
        decode(b"dli1ee3:fooe"),
        Err(BencodeError::InvalidKeyType)
    ));
}

#[test]
fn test_decode_dict_missing_value() {
    assert!(matches!(
        decode(b"d3:fooe"),
        Err(BencodeError::UnterminatedContainer(_))
    ));
}

#[test]
fn test_decode_unexpected_byte() {
    assert!(matches!(
        decode(b"x"),
        Err(BencodeError::UnexpectedByte { byte: b'x', offset: 0 })
    ));
    assert!(matches!(
        decode(b"li1exe"),
        Err(BencodeError::UnexpectedByte { byte: b'x', offset: 4 })
    ));
}

#[test]
fn test_decode_truncated() {
    assert!(matches!(decode(b""), Err(BencodeError::TruncatedInput)));
    assert!(matches!(decode(b"l4:spam"), Err(BencodeError::TruncatedInput)));
    assert!(matches!(decode(b"d3:foo"), Err(BencodeError::TruncatedInput)));
    assert!(matches!(decode(b"li1e"), Err(BencodeError::TruncatedInput)));
}

#[test]
fn test_trailing_data_error() {
    assert!(matches!(
        decode(b"li1eeextra"),
        Err(BencodeError::UnterminatedContainer(5))
    ));
    assert!(decode(b"i42eextra").is_err());
    assert!(decode(b"4:spamextra").is_err());
}

#[test]
fn test_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);
    assert!(matches!(decode(&deep), Err(BencodeError::NestingTooDeep)));

    let options = DecodeOptions {
        max_depth: 200,
        ..DecodeOptions::default()
    };
    assert!(decode_with(&deep, options).is_ok());
}

#[test]
fn test_typed_decoders() {
    assert_eq!(decode_integer(b"i-7e").unwrap(), -7);
    assert!(decode_integer(b"4:spam").is_err());

    assert_eq!(decode_string(b"4:spam").unwrap(), Bytes::from_static(b"spam"));
    assert!(decode_string(b"i1e").is_err());

    assert_eq!(decode_list(b"li1ei2ee").unwrap().len(), 2);
    assert!(decode_list(b"d1:ai1ee").is_err());

    let dict = decode_dict(b"d1:ai1ee").unwrap();
    assert_eq!(dict.get(b"a"), Some(&Value::Integer(1)));
    assert!(decode_dict(b"li1ee").is_err());
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(42)), b"i42e");
    assert_eq!(encode(&Value::Integer(-42)), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)), b"i0e");
    assert_eq!(encode_integer(7), b"i7e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(
        encode(&Value::Bytes(Bytes::from_static(b"spam"))),
        b"4:spam"
    );
    assert_eq!(encode_string(b""), b"0:");
    assert_eq!(encode_string(&[0xff, 0x00]), b"2:\xff\x00");
}

#[test]
fn test_encode_list() {
    let items = vec![Value::string("spam"), Value::Integer(42)];
    assert_eq!(encode_list(&items), b"l4:spami42ee");
    assert_eq!(encode(&Value::List(items)), b"l4:spami42ee");
}

#[test]
fn test_encode_dict_keeps_insertion_order() {
    let mut dict = Dict::new();
    dict.insert("foo", Value::Integer(42));
    dict.insert("bar", Value::string("spam"));
    assert_eq!(encode_dict(&dict), b"d3:fooi42e3:bar4:spame");
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    encode_to(&Value::string("hi"), &mut out).unwrap();
    assert_eq!(out, b"2:hi");
}

#[test]
fn test_roundtrip() {
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    assert_eq!(encode(&decoded), original);
}

#[test]
fn test_value_roundtrip() {
    let mut inner = Dict::new();
    inner.insert("z", Value::List(vec![]));
    inner.insert("a", Value::Bytes(Bytes::from_static(b"\x00e\xffl")));

    let mut dict = Dict::new();
    dict.insert("list", Value::List(vec![Value::Integer(-1), Value::Dict(inner)]));
    dict.insert("empty", Value::Dict(Dict::new()));
    let value = Value::Dict(dict);

    assert_eq!(decode(&encode(&value)).unwrap(), value);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());

    let value = Value::Bytes(Bytes::from_static(b"test"));
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::Bytes(Bytes::from_static(&[0xff]));
    assert!(value.as_str().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
}

#[test]
fn test_dict_insert_and_remove() {
    let mut dict: Dict = [("a", Value::Integer(1)), ("b", Value::Integer(2))]
        .into_iter()
        .collect();

    assert_eq!(dict.insert("a", Value::Integer(10)), Some(Value::Integer(1)));
    assert_eq!(dict.keys().next(), Some(b"a".as_slice()));

    assert_eq!(dict.remove(b"a"), Some(Value::Integer(10)));
    assert_eq!(dict.len(), 1);
    assert!(!dict.contains_key(b"a"));
}
