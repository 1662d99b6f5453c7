//! Synthetic archives for tests
//!
//! Available to this crate's unit tests and, through the `test-fixtures`
//! feature, to the tests of crates built on top of it.

#![allow(clippy::cast_possible_truncation)]

use crate::direct::{DIRECT_FILE_SIZE, DIRECT_HEADER_SIZE, DIRECT_TYPE_SIZE};
use crate::packed::{HeaderBlock, PackedArchive, PackedFile, PackedType, Variant};
use crate::version::{ArchiveVersion, NameHash, TypeHash};

/// Packed file with one variant per buffer
///
/// Each variant gets a distinct opaque field so that round trips can tell
/// them apart.
pub fn packed_file(type_hash: TypeHash, name_hash: NameHash, variants: &[&[u8]]) -> PackedFile {
    PackedFile {
        type_hash,
        name_hash,
        stream_offset: 0x40,
        variants: variants
            .iter()
            .enumerate()
            .map(|(i, data)| Variant::new(0x100 + i as u32, data.len() as u32 / 2, data.to_vec()))
            .collect(),
    }
}

/// Packed archive with a matching type table and a patterned header block
pub fn packed_archive(files: Vec<PackedFile>) -> PackedArchive {
    let mut header = HeaderBlock::default();
    for (i, byte) in header.0.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(7);
    }

    PackedArchive {
        header,
        types: files
            .iter()
            .map(|f| PackedType {
                type_hash: f.type_hash,
                name_hash: f.name_hash,
            })
            .collect(),
        files,
    }
}

/// One file of a synthetic direct archive
#[derive(Debug, Clone)]
pub struct DirectEntry {
    /// Type hash
    pub type_hash: TypeHash,
    /// Name hash
    pub name_hash: NameHash,
    /// Main content
    pub data: Vec<u8>,
}

impl DirectEntry {
    /// Entry with the given hashes and content
    pub fn new(type_hash: TypeHash, name_hash: NameHash, data: &[u8]) -> Self {
        Self {
            type_hash,
            name_hash,
            data: data.to_vec(),
        }
    }
}

/// Encode a direct archive holding `entries`
///
/// Each entry gets its own type record. Content regions follow the file
/// table in reverse entry order, so the first entry's data sits at the end.
pub fn direct_archive_bytes(checksum: u32, entries: &[DirectEntry]) -> Vec<u8> {
    let count = entries.len() as u32;
    let tables_end = DIRECT_HEADER_SIZE + entries.len() * (DIRECT_TYPE_SIZE + DIRECT_FILE_SIZE);

    let mut offsets = vec![0u64; entries.len()];
    let mut cursor = tables_end as u64;
    for (i, entry) in entries.iter().enumerate().rev() {
        offsets[i] = cursor;
        cursor += entry.data.len() as u64;
    }
    let buffer_size = cursor - tables_end as u64;

    let mut out = Vec::with_capacity(cursor as usize);
    out.extend_from_slice(&ArchiveVersion::Direct.as_u32().to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0x5EED_5EED_5EED_5EEDu64.to_le_bytes());
    out.extend_from_slice(&buffer_size.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    debug_assert_eq!(out.len(), DIRECT_HEADER_SIZE);

    for entry in entries {
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&entry.type_hash.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
    }

    for (i, entry) in entries.iter().enumerate() {
        out.extend_from_slice(&entry.name_hash.to_le_bytes());
        out.extend_from_slice(&entry.type_hash.to_le_bytes());
        out.extend_from_slice(&offsets[i].to_le_bytes());
        for _ in 0..4 {
            out.extend_from_slice(&0u64.to_le_bytes());
        }
        out.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&(i as u32).to_le_bytes());
    }
    debug_assert_eq!(out.len(), tables_end);

    for entry in entries.iter().rev() {
        out.extend_from_slice(&entry.data);
    }
    out
}
