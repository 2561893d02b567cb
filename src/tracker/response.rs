use super::error::TrackerError;
use crate::bencode::{decode, encode, Dict, Value};
use bytes::Bytes;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// A peer returned from a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// The peer's ID, only present in dictionary-model responses.
    pub peer_id: Option<Bytes>,
    /// Dotted-quad IPv4, IPv6, or a host name as the tracker sent it.
    pub ip: String,
    pub port: u16,
}

impl Peer {
    /// Parses a peer from compact IPv4 format (6 bytes).
    ///
    /// Format: 4 bytes IP + 2 bytes port (big-endian).
    pub fn from_compact_v4(bytes: &[u8]) -> Option<Self> {
        let &[a, b, c, d, p0, p1] = bytes else {
            return None;
        };
        Some(Self {
            peer_id: None,
            ip: Ipv4Addr::new(a, b, c, d).to_string(),
            port: u16::from_be_bytes([p0, p1]),
        })
    }

    /// Parses a peer from compact IPv6 format (18 bytes).
    ///
    /// Format: 16 bytes IP + 2 bytes port (big-endian).
    pub fn from_compact_v6(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 18 {
            return None;
        }
        let mut ip_bytes = [0u8; 16];
        ip_bytes.copy_from_slice(&bytes[..16]);
        Some(Self {
            peer_id: None,
            ip: Ipv6Addr::from(ip_bytes).to_string(),
            port: u16::from_be_bytes([bytes[16], bytes[17]]),
        })
    }

    /// The socket address, if `ip` is a literal address rather than a host name.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        let ip: IpAddr = self.ip.parse().ok()?;
        Some(SocketAddr::new(ip, self.port))
    }
}

/// A successful announce response.
///
/// A `failure reason` from the tracker never produces this type; it is
/// reported as [`TrackerError::Failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerResponse {
    pub warning_message: Option<String>,
    /// Seconds the client should wait between regular announces.
    pub interval: u32,
    pub min_interval: Option<u32>,
    pub tracker_id: Option<Bytes>,
    /// Number of seeders.
    pub complete: Option<u32>,
    /// Number of leechers.
    pub incomplete: Option<u32>,
    /// IPv4 and dictionary-model peers, then `peers6` entries.
    pub peers: Vec<Peer>,
}

impl TrackerResponse {
    /// Decodes a bencoded announce response.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Failure`] if the tracker sent `failure reason`, whatever else is present
    /// - [`TrackerError::MalformedPeerList`] if `peers` or `peers6` has an unusable shape
    /// - [`TrackerError::InvalidResponse`] if the body is not a dictionary or `interval` is missing
    pub fn from_bytes(data: &[u8]) -> Result<Self, TrackerError> {
        let value = decode(data)?;
        let dict = value
            .as_dict()
            .ok_or_else(|| TrackerError::InvalidResponse("expected dict".into()))?;

        if let Some(reason) = dict.get(b"failure reason") {
            let reason = match reason {
                Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                other => String::from_utf8_lossy(&encode(other)).into_owned(),
            };
            return Err(TrackerError::Failure(reason));
        }

        let interval = dict
            .get(b"interval")
            .and_then(Value::as_integer)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| TrackerError::InvalidResponse("missing interval".into()))?;

        let mut peers = match dict.get(b"peers") {
            None => Vec::new(),
            Some(Value::Bytes(bytes)) => parse_compact_peers(bytes)?,
            Some(Value::List(list)) => parse_peer_dicts(list)?,
            Some(_) => {
                return Err(TrackerError::MalformedPeerList(
                    "peers is neither a list nor a string".into(),
                ))
            }
        };

        match dict.get(b"peers6") {
            None => {}
            Some(Value::Bytes(bytes)) => peers.extend(parse_compact_peers6(bytes)?),
            Some(_) => {
                return Err(TrackerError::MalformedPeerList(
                    "peers6 is not a string".into(),
                ))
            }
        }

        Ok(Self {
            warning_message: dict
                .get(b"warning message")
                .and_then(Value::as_str)
                .map(String::from),
            interval,
            min_interval: optional_u32(dict, b"min interval"),
            tracker_id: dict.get(b"tracker id").and_then(Value::as_bytes).cloned(),
            complete: optional_u32(dict, b"complete"),
            incomplete: optional_u32(dict, b"incomplete"),
            peers,
        })
    }

    /// Addresses of all peers whose `ip` is a literal address.
    pub fn socket_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.peers.iter().filter_map(Peer::socket_addr)
    }
}

fn optional_u32(dict: &Dict, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .and_then(Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
}

/// Decodes a compact IPv4 peer list of 6-byte records.
pub fn parse_compact_peers(data: &[u8]) -> Result<Vec<Peer>, TrackerError> {
    if data.len() % 6 != 0 {
        return Err(TrackerError::MalformedPeerList(format!(
            "compact peers length {} is not a multiple of 6",
            data.len()
        )));
    }
    Ok(data.chunks_exact(6).filter_map(Peer::from_compact_v4).collect())
}

/// Decodes a compact IPv6 peer list of 18-byte records.
pub fn parse_compact_peers6(data: &[u8]) -> Result<Vec<Peer>, TrackerError> {
    if data.len() % 18 != 0 {
        return Err(TrackerError::MalformedPeerList(format!(
            "compact peers6 length {} is not a multiple of 18",
            data.len()
        )));
    }
    Ok(data.chunks_exact(18).filter_map(Peer::from_compact_v6).collect())
}

fn parse_peer_dicts(list: &[Value]) -> Result<Vec<Peer>, TrackerError> {
    list.iter()
        .enumerate()
        .map(|(i, entry)| {
            let malformed = |what: &str| TrackerError::MalformedPeerList(format!("peer {}: {}", i, what));

            let dict = entry.as_dict().ok_or_else(|| malformed("not a dictionary"))?;
            let ip = dict
                .get(b"ip")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("missing ip"))?;
            let port = dict
                .get(b"port")
                .and_then(Value::as_integer)
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| malformed("missing or invalid port"))?;

            Ok(Peer {
                peer_id: dict.get(b"peer id").and_then(Value::as_bytes).cloned(),
                ip: ip.to_string(),
                port,
            })
        })
        .collect()
}
