//! Parsers and builders for packed and direct game-data archives
//!
#![allow(clippy::cast_possible_truncation)] // Lengths are checked before narrowing
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // name_hash / type_hash pairs
#![allow(clippy::missing_errors_doc)] // Every fallible call returns FormatError
//! Two container versions share a leading `u32` marker:
//!
//! - **Packed** (`0xF0000004`): a chunked zlib envelope around an exploded
//!   buffer of type and file records. Decoded and re-encoded.
//! - **Direct** (`0xF0000011`): one uncompressed buffer with fixed-size
//!   records pointing at inline content. Decoded only.
//!
//! Entries are identified by 64-bit MurmurHash2 digests of their names and
//! type names, see [`hash`]. Script entries carry a small
//! [resource envelope](resource) around their payload.
//!
//! ```no_run
//! use hdpack_formats::Archive;
//!
//! let archive = Archive::from_file("0123456789ABCDEF".as_ref())?;
//! for file in archive.files() {
//!     println!("{:016X} {:016X} {}", file.name_hash, file.type_hash, file.inline_size());
//! }
//! # Ok::<(), hdpack_formats::FormatError>(())
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod chunked;
/// Direct archive records and decoder
pub mod direct;
pub mod error;
pub mod hash;
/// Packed archive records, decoder and encoder
pub mod packed;
pub mod resource;
pub mod scan;
pub mod version;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use archive::{Archive, FileDescriptor, TypeDescriptor};
pub use chunked::ChunkEnvelope;
pub use direct::DirectArchive;
pub use error::{FormatError, FormatResult};
pub use hash::{murmur_hash64a, name_hash};
pub use packed::{PackedArchive, PackedFile, Variant};
pub use resource::{ScriptFormat, ScriptResource};
pub use scan::ArchiveScanner;
pub use version::{ArchiveVersion, KnownType, NameHash, TYPE_LUA, TypeHash};

/// Common interface of the formats that can be both parsed and built
pub trait BinaryFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> FormatResult<Self>;

    /// Build to bytes
    fn build(&self) -> FormatResult<Vec<u8>>;

    /// Check that building a parsed value reproduces `data` exactly
    fn verify_round_trip(data: &[u8]) -> FormatResult<bool> {
        let parsed = Self::parse(data)?;
        Ok(parsed.build()? == data)
    }
}

impl BinaryFormat for ChunkEnvelope {
    fn parse(data: &[u8]) -> FormatResult<Self> {
        Self::parse(data)
    }

    fn build(&self) -> FormatResult<Vec<u8>> {
        self.build()
    }
}

impl BinaryFormat for PackedArchive {
    fn parse(data: &[u8]) -> FormatResult<Self> {
        Self::parse(data)
    }

    fn build(&self) -> FormatResult<Vec<u8>> {
        self.build()
    }
}

impl BinaryFormat for ScriptResource {
    fn parse(data: &[u8]) -> FormatResult<Self> {
        Self::parse(data)
    }

    fn build(&self) -> FormatResult<Vec<u8>> {
        self.build()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{packed_archive, packed_file};

    #[test]
    fn test_envelope_round_trip_is_exact() {
        let bytes = chunked::pack(ArchiveVersion::Packed, &[7u8; 100_000]).expect("pack");
        assert!(<ChunkEnvelope as BinaryFormat>::verify_round_trip(&bytes).expect("verify"));
    }

    #[test]
    fn test_resource_round_trip_is_exact() {
        let bytes = [2, 0, 0, 0, 9, 0, 0, 0, 0xAB, 0xCD];
        assert!(<ScriptResource as BinaryFormat>::verify_round_trip(&bytes).expect("verify"));
    }

    #[test]
    fn test_rebuilt_packed_archive_reparses() {
        let archive = packed_archive(vec![packed_file(TYPE_LUA, 5, &[b"a", b"bc"])]);
        let first = BinaryFormat::build(&archive).expect("build");
        let reparsed = <PackedArchive as BinaryFormat>::parse(&first).expect("parse");
        assert_eq!(reparsed, archive);
        assert!(<PackedArchive as BinaryFormat>::verify_round_trip(&first).expect("verify"));
    }
}
