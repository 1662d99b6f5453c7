//! Packed archive header block and type records

use binrw::{BinRead, BinWrite};

use crate::version::{NameHash, TypeHash};

/// Length of the opaque block following the entries count
pub const HEADER_BLOCK_SIZE: usize = 256;

/// Opaque 256-byte block at the start of the exploded buffer
///
/// The layout of this block is not known; it is kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct HeaderBlock(pub [u8; HEADER_BLOCK_SIZE]);

impl Default for HeaderBlock {
    fn default() -> Self {
        Self([0; HEADER_BLOCK_SIZE])
    }
}

/// Type record (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PackedType {
    /// Type hash
    pub type_hash: TypeHash,
    /// Name hash
    pub name_hash: NameHash,
}
