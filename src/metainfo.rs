//! Torrent metainfo handling ([BEP-3]).
//!
//! A torrent file (`.torrent`) is a bencoded dictionary describing the
//! content to be shared:
//! - File names, sizes, and directory structure
//! - Piece hashes for data integrity verification
//! - Tracker URLs for peer discovery
//!
//! [`Metainfo`] is the parsed form. It is immutable once built; drop it (or
//! `Option::take` it) to discard a torrent.
//!
//! # Examples
//!
//! ```no_run
//! use bitwire::metainfo::Metainfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Metainfo::from_file("example.torrent")?;
//!
//! println!("Name: {}", torrent.name());
//! println!("Info hash: {}", torrent.info_hash());
//! println!("Total size: {} bytes", torrent.total_length());
//! println!("Piece length: {} bytes", torrent.piece_length());
//! println!("Number of pieces: {}", torrent.piece_count());
//!
//! for file in torrent.files() {
//!     println!("  {} ({} bytes)", file.path_under(torrent.name()).display(), file.length);
//! }
//!
//! for tracker in torrent.trackers() {
//!     println!("Tracker: {}", tracker);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Info hash
//!
//! The info hash is the SHA-1 of the `info` dictionary exactly as it is
//! stored in the file. The bytes are sliced out of the input rather than
//! re-encoded, so torrents with unsorted or repeated keys inside `info`
//! still hash to the value other clients compute.
//!
//! # Torrent Structure
//!
//! - **info** - Core torrent metadata (hashed to create the info hash)
//!   - `name` - Suggested file/directory name
//!   - `piece length` - Size of each piece in bytes
//!   - `pieces` - Concatenated SHA1 hashes of each piece
//!   - `length` - Total size (single-file) OR `files` list (multi-file)
//!   - `private` - Restrict peer discovery to the listed trackers
//! - **announce** - Primary tracker URL
//! - **announce-list** - Additional tracker tiers (BEP-12)
//! - **httpseeds** - HTTP seed URLs (BEP-17)
//! - **nodes** - DHT bootstrap nodes (BEP-5)
//! - **creation date** - Unix timestamp when created
//! - **comment** - Optional comment
//! - **created by** - Client that created the torrent
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod error;
mod info_hash;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::{File, FileLayout, Info, Metainfo};
