use crate::constants::{DEFAULT_NUMWANT, DEFAULT_PORT};
use std::fmt::Write;
use std::net::IpAddr;
use std::sync::OnceLock;

/// The `event` parameter of an announce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A regular interval announce; no `event` parameter is sent.
    #[default]
    None,
    Started,
    Stopped,
    Completed,
}

impl TrackerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerEvent::None => "",
            TrackerEvent::Started => "started",
            TrackerEvent::Stopped => "stopped",
            TrackerEvent::Completed => "completed",
        }
    }
}

/// Parameters of a tracker announce.
///
/// The query string is built on first use and kept until a setter changes
/// the request.
///
/// # Examples
///
/// ```
/// use bitwire::tracker::{TrackerEvent, TrackerRequest};
///
/// let mut request = TrackerRequest::new([0xab; 20], *b"-BW0100-abcdefghijkl");
/// request.set_left(1024);
/// request.set_event(TrackerEvent::Started);
///
/// let url = request.announce_url("http://tracker.example.com/announce");
/// assert!(url.starts_with("http://tracker.example.com/announce?info_hash=%AB%AB"));
/// assert!(url.ends_with("&left=1024&event=started"));
/// ```
#[derive(Debug, Clone)]
pub struct TrackerRequest {
    info_hash: [u8; 20],
    peer_id: [u8; 20],
    ip: Option<IpAddr>,
    port: u16,
    uploaded: u64,
    downloaded: u64,
    left: u64,
    event: TrackerEvent,
    compact: bool,
    no_peer_id: bool,
    numwant: i32,
    query: OnceLock<String>,
}

impl TrackerRequest {
    pub fn new(info_hash: [u8; 20], peer_id: [u8; 20]) -> Self {
        Self {
            info_hash,
            peer_id,
            ip: None,
            port: DEFAULT_PORT,
            uploaded: 0,
            downloaded: 0,
            left: 0,
            event: TrackerEvent::None,
            compact: false,
            no_peer_id: false,
            numwant: DEFAULT_NUMWANT,
            query: OnceLock::new(),
        }
    }

    /// Returns the URL-encoded query, without a leading `?`.
    ///
    /// Parameters appear in a fixed order. `ip` and `event` are left out
    /// when unset, and `compact`, `no_peer_id` and `numwant` only appear when
    /// they differ from their defaults.
    pub fn query_string(&self) -> &str {
        self.query.get_or_init(|| self.build_query())
    }

    /// Appends the query to a tracker announce URL.
    pub fn announce_url(&self, base: &str) -> String {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, self.query_string())
    }

    fn build_query(&self) -> String {
        let mut query = String::with_capacity(256);

        query.push_str("info_hash=");
        query.push_str(&percent_encode(&self.info_hash));
        query.push_str("&peer_id=");
        query.push_str(&percent_encode(&self.peer_id));

        // Writing to a String cannot fail.
        let _ = write!(
            query,
            "&port={}&uploaded={}&downloaded={}&left={}",
            self.port, self.uploaded, self.downloaded, self.left
        );

        if let Some(ip) = self.ip {
            query.push_str("&ip=");
            query.push_str(&percent_encode(ip.to_string().as_bytes()));
        }

        if self.event != TrackerEvent::None {
            query.push_str("&event=");
            query.push_str(self.event.as_str());
        }

        if self.compact {
            query.push_str("&compact=1");
        }

        if self.no_peer_id {
            query.push_str("&no_peer_id=1");
        }

        if self.numwant != DEFAULT_NUMWANT {
            let _ = write!(query, "&numwant={}", self.numwant);
        }

        query
    }

    fn invalidate(&mut self) {
        self.query.take();
    }

    pub fn info_hash(&self) -> &[u8; 20] {
        &self.info_hash
    }

    pub fn set_info_hash(&mut self, info_hash: [u8; 20]) {
        self.info_hash = info_hash;
        self.invalidate();
    }

    pub fn peer_id(&self) -> &[u8; 20] {
        &self.peer_id
    }

    pub fn set_peer_id(&mut self, peer_id: [u8; 20]) {
        self.peer_id = peer_id;
        self.invalidate();
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    pub fn set_ip(&mut self, ip: Option<IpAddr>) {
        self.ip = ip;
        self.invalidate();
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
        self.invalidate();
    }

    pub fn uploaded(&self) -> u64 {
        self.uploaded
    }

    pub fn set_uploaded(&mut self, uploaded: u64) {
        self.uploaded = uploaded;
        self.invalidate();
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    pub fn set_downloaded(&mut self, downloaded: u64) {
        self.downloaded = downloaded;
        self.invalidate();
    }

    pub fn left(&self) -> u64 {
        self.left
    }

    pub fn set_left(&mut self, left: u64) {
        self.left = left;
        self.invalidate();
    }

    pub fn event(&self) -> TrackerEvent {
        self.event
    }

    pub fn set_event(&mut self, event: TrackerEvent) {
        self.event = event;
        self.invalidate();
    }

    pub fn compact(&self) -> bool {
        self.compact
    }

    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
        self.invalidate();
    }

    pub fn no_peer_id(&self) -> bool {
        self.no_peer_id
    }

    pub fn set_no_peer_id(&mut self, no_peer_id: bool) {
        self.no_peer_id = no_peer_id;
        self.invalidate();
    }

    pub fn numwant(&self) -> i32 {
        self.numwant
    }

    pub fn set_numwant(&mut self, numwant: i32) {
        self.numwant = numwant;
        self.invalidate();
    }
}

/// Percent-encodes raw bytes for a tracker query.
///
/// Every byte outside `[0-9A-Za-z.-_~]` becomes `%XX` with uppercase hex.
/// The input is treated as bytes, not text.
pub fn percent_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for &b in bytes {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.' || b == b'~' {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    out
}
