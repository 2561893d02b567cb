use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{decode, dict_value_span, encode, Dict, Value};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A parsed and validated torrent file.
///
/// Everything derived from the file (piece hashes, file layout, info hash) is
/// computed once when the value is built and never changes afterwards.
///
/// # Examples
///
/// ```
/// use bitwire::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut data = b"d8:announce19:http://tracker/anno4:infod6:lengthi5e4:name5:a.txt\
///                  12:piece lengthi16384e6:pieces20:".to_vec();
/// data.extend_from_slice(&[0u8; 20]);
/// data.extend_from_slice(b"ee");
///
/// let torrent = Metainfo::from_bytes(&data)?;
/// assert_eq!(torrent.name(), "a.txt");
/// assert_eq!(torrent.length(), Some(5));
/// assert_eq!(torrent.piece_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    root: Dict,
    info: Info,
    info_hash: InfoHash,
    raw_info: Bytes,
    announce: String,
    announce_list: Vec<Vec<String>>,
    httpseeds: Vec<String>,
    nodes: Vec<(String, u16)>,
    creation_date: Option<i64>,
    comment: Option<String>,
    created_by: Option<String>,
}

/// The info dictionary from a torrent file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    /// Suggested name for the file or directory.
    pub name: String,
    /// Number of bytes per piece.
    pub piece_length: u64,
    /// SHA1 hash of each piece (20 bytes each).
    pub pieces: Vec<[u8; 20]>,
    /// Single-file length or multi-file list.
    pub layout: FileLayout,
    /// If true, clients should only use trackers in the metainfo.
    pub private: bool,
}

/// Whether a torrent carries one file or many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLayout {
    Single { length: u64 },
    Multi { files: Vec<File> },
}

/// A file within a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path segments, relative to the torrent's root directory.
    pub path: Vec<String>,
    /// Size of the file in bytes.
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
}

impl File {
    /// Joins the path segments under the torrent name.
    pub fn path_under(&self, root: &str) -> PathBuf {
        std::iter::once(root).chain(self.path.iter().map(String::as_str)).collect()
    }
}

impl Info {
    pub fn total_length(&self) -> u64 {
        match &self.layout {
            FileLayout::Single { length } => *length,
            FileLayout::Multi { files } => files.iter().map(|f| f.length).sum(),
        }
    }
}

impl Metainfo {
    /// Parses a torrent file from raw bytes.
    ///
    /// The info hash is the SHA-1 of the `info` value's bytes exactly as they
    /// appear in `data`, located without re-encoding anything.
    ///
    /// # Errors
    ///
    /// - [`MetainfoError::Bencode`] if the data is not valid bencode
    /// - [`MetainfoError::InvalidMetainfo`] if a required field is missing or malformed
    /// - [`MetainfoError::CorruptPieceList`] if `pieces` is not a multiple of 20 bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let root = decode(data)?
            .into_dict()
            .ok_or_else(|| MetainfoError::invalid("root is not a dictionary"))?;

        let span = dict_value_span(data, b"info")?
            .ok_or_else(|| MetainfoError::invalid("missing info"))?;
        let raw_info = Bytes::copy_from_slice(&data[span]);

        Self::build(root, raw_info)
    }

    /// Builds a torrent from an already decoded top-level dictionary.
    ///
    /// There are no original bytes in this case, so the info hash is taken
    /// over the encoding of the supplied `info` dictionary.
    pub fn from_value(value: Value) -> Result<Self, MetainfoError> {
        let root = value
            .into_dict()
            .ok_or_else(|| MetainfoError::invalid("root is not a dictionary"))?;

        let info_value = root
            .get(b"info")
            .ok_or_else(|| MetainfoError::invalid("missing info"))?;
        let raw_info = Bytes::from(encode(info_value));

        Self::build(root, raw_info)
    }

    /// Reads and parses a torrent file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;

        match Self::from_bytes(&data) {
            Ok(metainfo) => {
                debug!(
                    "Loaded torrent {} ({} pieces, info hash {}) from {}",
                    metainfo.name(),
                    metainfo.piece_count(),
                    metainfo.info_hash,
                    path.display()
                );
                Ok(metainfo)
            }
            Err(e) => {
                warn!("Failed to decode torrent file {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    fn build(root: Dict, raw_info: Bytes) -> Result<Self, MetainfoError> {
        let announce = root
            .get(b"announce")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MetainfoError::invalid("missing or empty announce"))?
            .to_string();

        let info = parse_info(root.get(b"info"))?;
        let info_hash = InfoHash::of(&raw_info);

        let announce_list = root
            .get(b"announce-list")
            .and_then(Value::as_list)
            .map(|tiers| {
                tiers
                    .iter()
                    .filter_map(|tier| tier.as_list().map(strings))
                    .filter(|tier: &Vec<String>| !tier.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let httpseeds = root
            .get(b"httpseeds")
            .and_then(Value::as_list)
            .map(strings)
            .unwrap_or_default();

        let nodes = root
            .get(b"nodes")
            .and_then(Value::as_list)
            .map(|list| list.iter().filter_map(parse_node).collect())
            .unwrap_or_default();

        let creation_date = root.get(b"creation date").and_then(Value::as_integer);
        let comment = root.get(b"comment").and_then(Value::as_str).map(String::from);
        let created_by = root
            .get(b"created by")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(Self {
            root,
            info,
            info_hash,
            raw_info,
            announce,
            announce_list,
            httpseeds,
            nodes,
            creation_date,
            comment,
            created_by,
        })
    }

    /// Rebuilds the top-level dictionary, re-joining the piece hashes into one `pieces` string.
    ///
    /// Keys keep the order they had in the source. Canonical input therefore
    /// re-encodes to identical bytes, but input with repeated keys does not.
    pub fn to_value(&self) -> Value {
        let mut info = self
            .root
            .get(b"info")
            .and_then(Value::as_dict)
            .cloned()
            .unwrap_or_default();
        info.insert("pieces", Value::Bytes(Bytes::from(self.info.pieces.concat())));

        let mut root = self.root.clone();
        root.insert("info", Value::Dict(info));
        Value::Dict(root)
    }

    /// Encodes the torrent back to bencode. See [`Metainfo::to_value`].
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.to_value())
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn info_hash(&self) -> &InfoHash {
        &self.info_hash
    }

    /// The `info` dictionary bytes the info hash was computed over.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// The decoded top-level dictionary.
    pub fn root(&self) -> &Dict {
        &self.root
    }

    pub fn announce(&self) -> &str {
        &self.announce
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn piece_length(&self) -> u64 {
        self.info.piece_length
    }

    pub fn pieces(&self) -> &[[u8; 20]] {
        &self.info.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.info.pieces.len()
    }

    /// Files of a multi-file torrent; empty for a single-file torrent.
    pub fn files(&self) -> &[File] {
        match &self.info.layout {
            FileLayout::Single { .. } => &[],
            FileLayout::Multi { files } => files,
        }
    }

    /// Length of a single-file torrent; `None` for a multi-file torrent.
    pub fn length(&self) -> Option<u64> {
        match self.info.layout {
            FileLayout::Single { length } => Some(length),
            FileLayout::Multi { .. } => None,
        }
    }

    pub fn total_length(&self) -> u64 {
        self.info.total_length()
    }

    /// Size of the piece at `index`. The last piece may be shorter than `piece_length`.
    pub fn piece_size(&self, index: usize) -> Option<u64> {
        let count = self.piece_count();
        if index >= count {
            return None;
        }
        if index + 1 < count {
            return Some(self.info.piece_length);
        }
        let before_last = (count as u64 - 1).saturating_mul(self.info.piece_length);
        Some(self.total_length().saturating_sub(before_last))
    }

    pub fn announce_list(&self) -> &[Vec<String>] {
        &self.announce_list
    }

    pub fn is_private(&self) -> bool {
        self.info.private
    }

    pub fn httpseeds(&self) -> &[String] {
        &self.httpseeds
    }

    /// DHT bootstrap nodes as `(host, port)` pairs.
    pub fn nodes(&self) -> &[(String, u16)] {
        &self.nodes
    }

    pub fn creation_date(&self) -> Option<i64> {
        self.creation_date
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker comes first, followed by the tiers in order.
    /// Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = vec![self.announce.clone()];

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

fn parse_info(value: Option<&Value>) -> Result<Info, MetainfoError> {
    let dict = value
        .ok_or_else(|| MetainfoError::invalid("missing info"))?
        .as_dict()
        .ok_or_else(|| MetainfoError::invalid("info is not a dictionary"))?;

    let name = dict
        .get(b"name")
        .and_then(Value::as_str)
        .ok_or_else(|| MetainfoError::invalid("missing name"))?
        .to_string();

    let piece_length = dict
        .get(b"piece length")
        .and_then(Value::as_integer)
        .filter(|&len| len > 0)
        .ok_or_else(|| MetainfoError::invalid("piece length must be a positive integer"))?
        as u64;

    let pieces_bytes = dict
        .get(b"pieces")
        .and_then(Value::as_bytes)
        .ok_or_else(|| MetainfoError::invalid("missing pieces"))?;

    if pieces_bytes.len() % 20 != 0 {
        return Err(MetainfoError::CorruptPieceList(pieces_bytes.len()));
    }

    let pieces: Vec<[u8; 20]> = pieces_bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut arr = [0u8; 20];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    let private = dict
        .get(b"private")
        .and_then(Value::as_integer)
        .map(|v| v == 1)
        .unwrap_or(false);

    let layout = match (dict.get(b"length"), dict.get(b"files")) {
        (Some(length), None) => FileLayout::Single {
            length: non_negative(length, "length")?,
        },
        (None, Some(files)) => FileLayout::Multi {
            files: parse_files(files)?,
        },
        (Some(_), Some(_)) => {
            return Err(MetainfoError::invalid("both length and files present"));
        }
        (None, None) => return Err(MetainfoError::invalid("missing length or files")),
    };

    Ok(Info {
        name,
        piece_length,
        pieces,
        layout,
        private,
    })
}

fn parse_files(value: &Value) -> Result<Vec<File>, MetainfoError> {
    let list = value
        .as_list()
        .ok_or_else(|| MetainfoError::invalid("files is not a list"))?;

    if list.is_empty() {
        return Err(MetainfoError::invalid("files is empty"));
    }

    let mut files = Vec::with_capacity(list.len());
    let mut offset = 0u64;

    for entry in list {
        let entry = entry
            .as_dict()
            .ok_or_else(|| MetainfoError::invalid("file entry is not a dictionary"))?;

        let length = non_negative(
            entry
                .get(b"length")
                .ok_or_else(|| MetainfoError::invalid("missing file length"))?,
            "file length",
        )?;

        let segments = entry
            .get(b"path")
            .and_then(Value::as_list)
            .ok_or_else(|| MetainfoError::invalid("missing file path"))?;

        let path = segments
            .iter()
            .map(|s| s.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MetainfoError::invalid("file path must be a non-empty list of strings"))?;

        files.push(File {
            path,
            length,
            offset,
        });
        offset = offset
            .checked_add(length)
            .ok_or_else(|| MetainfoError::invalid("total length overflows"))?;
    }

    Ok(files)
}

fn non_negative(value: &Value, field: &str) -> Result<u64, MetainfoError> {
    value
        .as_integer()
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| MetainfoError::invalid(format!("{} must be a non-negative integer", field)))
}

fn strings(list: &[Value]) -> Vec<String> {
    list.iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}

fn parse_node(value: &Value) -> Option<(String, u16)> {
    match value.as_list()? {
        [host, port] => {
            let port = u16::try_from(port.as_integer()?).ok()?;
            Some((host.as_str()?.to_string(), port))
        }
        _ => None,
    }
}
