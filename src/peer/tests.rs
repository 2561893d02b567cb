use super::*;
use bytes::{BufMut, Bytes, BytesMut};
use std::net::SocketAddr;
use std::time::Duration;

#[test]
fn test_peer_id_generate() {
    let id1 = PeerId::generate();
    let id2 = PeerId::generate();
    assert_ne!(id1.0, id2.0);
    assert_eq!(&id1.as_bytes()[..8], b"-BW0100-");
    assert_eq!(id1.client_id(), Some("BW0100"));
}

#[test]
fn test_peer_id_from_bytes() {
    assert!(PeerId::from_bytes(&[0u8; 20]).is_some());
    assert!(PeerId::from_bytes(&[0u8; 19]).is_none());
    assert_eq!(PeerId::from([0u8; 20]).client_id(), None);
}

#[test]
fn test_peer_id_display() {
    let mut bytes = *b"-BW0100-abcdefghijkl";
    bytes[19] = 0xFF;
    assert_eq!(PeerId::from(bytes).to_string(), "-BW0100-abcdefghijk%ff");
    assert_eq!(format!("{:?}", PeerId::from(bytes)), "PeerId(BW0100)");
}

#[test]
fn test_bitfield_pack_and_unpack() {
    let mut bf = Bitfield::new(10);
    for index in [0, 3, 9] {
        bf.set_piece(index);
    }

    let packed = bf.as_bytes();
    assert_eq!(packed.len(), 2);
    assert_eq!(packed[1] & 0b0011_1111, 0);

    let unpacked = Bitfield::from_payload(packed, 10).unwrap();
    assert_eq!(unpacked.available_pieces(), vec![0, 3, 9]);
    assert_eq!(unpacked, bf);
}

#[test]
fn test_bitfield_set_and_clear() {
    let mut bf = Bitfield::new(100);
    assert!(bf.is_empty());
    assert!(!bf.has_piece(0));

    bf.set_piece(0);
    bf.set_piece(99);
    assert!(bf.has_piece(0));
    assert!(bf.has_piece(99));

    bf.clear_piece(0);
    assert!(!bf.has_piece(0));
    assert_eq!(bf.count(), 1);

    // out of range is ignored
    bf.set_piece(100);
    assert!(!bf.has_piece(100));
    assert_eq!(bf.count(), 1);
}

#[test]
fn test_bitfield_full() {
    let bf = Bitfield::full(10);
    assert!(bf.is_complete());
    assert_eq!(bf.as_bytes(), &[0xFF, 0b1100_0000]);

    let bf = Bitfield::full(16);
    assert_eq!(bf.as_bytes(), &[0xFF, 0xFF]);
}

#[test]
fn test_bitfield_from_payload_rejects_bad_input() {
    // wrong length
    assert!(matches!(
        Bitfield::from_payload(&[0x80], 10),
        Err(PeerError::MalformedMessage(_))
    ));
    assert!(matches!(
        Bitfield::from_payload(&[0x80, 0x00, 0x00], 10),
        Err(PeerError::MalformedMessage(_))
    ));
    // spare bit set
    assert!(matches!(
        Bitfield::from_payload(&[0x80, 0b0010_0000], 10),
        Err(PeerError::MalformedMessage(_))
    ));
    // no spare bits when the count is a multiple of 8
    assert!(Bitfield::from_payload(&[0xFF], 8).is_ok());
    assert!(Bitfield::from_payload(&[], 0).is_ok());
}

#[test]
fn test_handshake_encode_decode() {
    let info_hash = [1u8; 20];
    let peer_id = [2u8; 20];

    let handshake = Handshake::new(info_hash, peer_id);
    let encoded = handshake.encode();

    assert_eq!(encoded.len(), 68);
    assert_eq!(encoded[0], 19);
    assert_eq!(&encoded[1..20], b"BitTorrent protocol");
    assert_eq!(&encoded[20..28], &[0u8; 8]);
    assert_eq!(&encoded[28..48], &info_hash);
    assert_eq!(&encoded[48..68], &peer_id);

    let decoded = Handshake::decode(&encoded).unwrap();
    assert_eq!(decoded, handshake);
}

#[test]
fn test_handshake_decode_rejects_bad_input() {
    let encoded = Handshake::new([1u8; 20], [2u8; 20]).encode();

    assert!(matches!(
        Handshake::decode(&encoded[..67]),
        Err(PeerError::InvalidHandshake)
    ));

    let mut wrong_protocol = encoded.to_vec();
    wrong_protocol[1] = b'b';
    assert!(matches!(
        Handshake::decode(&wrong_protocol),
        Err(PeerError::InvalidHandshake)
    ));

    let mut wrong_length = encoded.to_vec();
    wrong_length[0] = 18;
    assert!(matches!(
        Handshake::decode(&wrong_length),
        Err(PeerError::InvalidHandshake)
    ));
}

#[test]
fn test_message_wire_format() {
    let cases: Vec<(Message, Vec<u8>)> = vec![
        (Message::KeepAlive, vec![0, 0, 0, 0]),
        (Message::Choke, vec![0, 0, 0, 1, 0]),
        (Message::Unchoke, vec![0, 0, 0, 1, 1]),
        (Message::Interested, vec![0, 0, 0, 1, 2]),
        (Message::NotInterested, vec![0, 0, 0, 1, 3]),
        (Message::Have { piece: 258 }, vec![0, 0, 0, 5, 4, 0, 0, 1, 2]),
        (
            Message::Request {
                index: 1,
                begin: 16384,
                length: 16384,
            },
            vec![0, 0, 0, 13, 6, 0, 0, 0, 1, 0, 0, 0x40, 0, 0, 0, 0x40, 0],
        ),
        (
            Message::Piece {
                index: 2,
                begin: 0,
                data: Bytes::from_static(b"abc"),
            },
            vec![0, 0, 0, 12, 7, 0, 0, 0, 2, 0, 0, 0, 0, b'a', b'b', b'c'],
        ),
        (
            Message::Cancel {
                index: 1,
                begin: 0,
                length: 1,
            },
            vec![0, 0, 0, 13, 8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1],
        ),
        (Message::Port(6881), vec![0, 0, 0, 3, 9, 0x1A, 0xE1]),
    ];

    for (msg, wire) in cases {
        let encoded = msg.encode();
        assert_eq!(encoded.as_ref(), wire.as_slice(), "encoding {:?}", msg);
        assert_eq!(Message::decode(encoded).unwrap(), msg);
    }
}

#[test]
fn test_message_bitfield() {
    let mut pieces = Bitfield::new(10);
    pieces.set_piece(0);
    pieces.set_piece(3);
    pieces.set_piece(9);

    let msg = Message::bitfield(&pieces);
    let decoded = Message::decode(msg.encode()).unwrap();
    match decoded {
        Message::Bitfield(bytes) => {
            let unpacked = Bitfield::from_payload(&bytes, 10).unwrap();
            assert_eq!(unpacked.available_pieces(), vec![0, 3, 9]);
        }
        other => panic!("expected bitfield, got {:?}", other),
    }
}

#[test]
fn test_message_decode_rejects_malformed() {
    let cases: [&'static [u8]; 7] = [
        // too short for a length prefix
        &[0, 0, 1],
        // prefix says 5 bytes, 4 present
        &[0, 0, 0, 5, 4, 0, 0, 0],
        // prefix says 1 byte, 2 present
        &[0, 0, 0, 1, 1, 0],
        // unknown id
        &[0, 0, 0, 1, 20],
        // choke with a payload
        &[0, 0, 0, 2, 0, 0],
        // have with a 3-byte payload
        &[0, 0, 0, 4, 4, 0, 0, 1],
        // piece without begin
        &[0, 0, 0, 5, 7, 0, 0, 0, 1],
    ];

    for data in cases {
        assert!(
            matches!(
                Message::decode(Bytes::from_static(data)),
                Err(PeerError::MalformedMessage(_))
            ),
            "expected malformed message for {:?}",
            data
        );
    }
}

#[test]
fn test_decode_frame_partial() {
    let mut buf = BytesMut::new();
    let frame = Message::Have { piece: 7 }.encode();

    buf.extend_from_slice(&frame[..3]);
    assert_eq!(Message::decode_frame(&mut buf).unwrap(), None);
    assert_eq!(buf.len(), 3);

    buf.extend_from_slice(&frame[3..6]);
    assert_eq!(Message::decode_frame(&mut buf).unwrap(), None);

    buf.extend_from_slice(&frame[6..]);
    assert_eq!(
        Message::decode_frame(&mut buf).unwrap(),
        Some(Message::Have { piece: 7 })
    );
    assert!(buf.is_empty());
}

#[test]
fn test_decode_frame_multiple() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&Message::Unchoke.encode());
    buf.extend_from_slice(&Message::KeepAlive.encode());
    buf.extend_from_slice(&Message::Port(80).encode()[..4]);

    assert_eq!(
        Message::decode_frame(&mut buf).unwrap(),
        Some(Message::Unchoke)
    );
    assert_eq!(
        Message::decode_frame(&mut buf).unwrap(),
        Some(Message::KeepAlive)
    );
    assert_eq!(Message::decode_frame(&mut buf).unwrap(), None);
    assert_eq!(buf.len(), 4);
}

#[test]
fn test_decode_frame_too_large() {
    let mut buf = BytesMut::new();
    buf.put_u32(u32::MAX);
    buf.put_u8(7);

    assert!(matches!(
        Message::decode_frame(&mut buf),
        Err(PeerError::MalformedMessage(_))
    ));
}

fn remote_peer(piece_count: usize) -> RemotePeer {
    let addr: SocketAddr = "127.0.0.1:6881".parse().unwrap();
    RemotePeer::new(TorrentId(3), addr, piece_count)
}

#[test]
fn test_remote_peer_defaults() {
    let peer = remote_peer(10).with_peer_id(PeerId::from(*b"-BW0100-abcdefghijkl"));

    assert_eq!(peer.torrent(), TorrentId(3));
    assert_eq!(peer.peer_id().and_then(PeerId::client_id), Some("BW0100"));
    assert_eq!(*peer.state(), ChokingState::default());
    assert!(peer.state().am_choking);
    assert!(peer.state().peer_choking);
    assert!(!peer.state().am_interested);
    assert!(!peer.state().peer_interested);
    assert!(peer.pieces().is_empty());
}

#[test]
fn test_remote_peer_apply() {
    let mut peer = remote_peer(10);

    peer.apply(&Message::Unchoke).unwrap();
    assert!(!peer.state().peer_choking);
    peer.apply(&Message::Interested).unwrap();
    assert!(peer.state().peer_interested);
    peer.apply(&Message::NotInterested).unwrap();
    assert!(!peer.state().peer_interested);
    peer.apply(&Message::Choke).unwrap();
    assert!(peer.state().peer_choking);

    peer.apply(&Message::Have { piece: 4 }).unwrap();
    assert!(peer.has_piece(4));

    peer.apply(&Message::Bitfield(Bytes::from_static(&[0b1001_0000, 0b0100_0000])))
        .unwrap();
    assert_eq!(peer.pieces().available_pieces(), vec![0, 3, 9]);

    peer.apply(&Message::KeepAlive).unwrap();
    peer.apply(&Message::Port(1)).unwrap();
    assert_eq!(peer.pieces().count(), 3);

    peer.set_am_interested(true);
    peer.set_am_choking(false);
    assert!(peer.state().am_interested);
    assert!(!peer.state().am_choking);
}

#[test]
fn test_remote_peer_apply_rejects_bad_pieces() {
    let mut peer = remote_peer(10);
    peer.apply(&Message::Have { piece: 1 }).unwrap();

    assert!(matches!(
        peer.apply(&Message::Have { piece: 10 }),
        Err(PeerError::MalformedMessage(_))
    ));
    assert!(matches!(
        peer.apply(&Message::Bitfield(Bytes::from_static(&[0xFF, 0xFF]))),
        Err(PeerError::MalformedMessage(_))
    ));

    // state kept after a rejected message
    assert_eq!(peer.pieces().available_pieces(), vec![1]);
}

#[tokio::test]
async fn test_transport_handshake_and_messages() {
    let (a, b) = tokio::io::duplex(1024);
    let info_hash = [7u8; 20];

    let remote = tokio::spawn(async move {
        let mut transport = PeerTransport::new(b);
        let theirs = transport.receive_handshake().await.unwrap();
        let ours = Handshake::new(theirs.info_hash, *b"-XX0000-zzzzzzzzzzzz");

        // handshake and first message in one write
        let mut out = ours.encode().to_vec();
        out.extend_from_slice(&Message::Unchoke.encode());
        tokio::io::AsyncWriteExt::write_all(&mut transport.into_inner(), &out)
            .await
            .unwrap();
    });

    let mut transport =
        PeerTransport::new(a).with_timeouts(Duration::from_secs(5), Duration::from_secs(5));
    let theirs = transport
        .handshake(&Handshake::new(info_hash, *b"-BW0100-abcdefghijkl"))
        .await
        .unwrap();
    assert_eq!(&theirs.peer_id[..8], b"-XX0000-");

    assert_eq!(transport.receive_message().await.unwrap(), Message::Unchoke);
    remote.await.unwrap();

    assert!(matches!(
        transport.receive_message().await,
        Err(PeerError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_transport_info_hash_mismatch() {
    let (a, b) = tokio::io::duplex(1024);

    let remote = tokio::spawn(async move {
        let mut transport = PeerTransport::new(b);
        transport.receive_handshake().await.unwrap();
        transport
            .send_handshake(&Handshake::new([9u8; 20], [0u8; 20]))
            .await
            .unwrap();
    });

    let mut transport = PeerTransport::new(a);
    let result = transport
        .handshake(&Handshake::new([7u8; 20], [1u8; 20]))
        .await;
    assert!(matches!(result, Err(PeerError::InfoHashMismatch)));

    remote.await.unwrap();
}

#[tokio::test]
async fn test_transport_rejects_oversized_message() {
    let (a, _b) = tokio::io::duplex(1024);
    let mut transport = PeerTransport::new(a);

    let message = Message::Piece {
        index: 0,
        begin: 0,
        data: Bytes::from(vec![0u8; crate::constants::MAX_MESSAGE_SIZE]),
    };
    assert!(matches!(
        transport.send_message(&message).await,
        Err(PeerError::MalformedMessage(_))
    ));

    // nothing was written, so a normal message still goes through
    transport.send_message(&Message::Interested).await.unwrap();
}
