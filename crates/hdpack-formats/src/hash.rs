//! 64-bit MurmurHash2 (MurmurHash64A)
//!
//! Port of Austin Appleby's `MurmurHash64A` from the public MurmurHash2
//! distribution. Archive entries are keyed by this hash of their path and
//! type name with a seed of 0, and the name database validates its entries by
//! recomputing it.

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Compute `MurmurHash64A` of `data` with the given seed
///
/// # Examples
///
/// ```
/// use hdpack_formats::hash::murmur_hash64a;
///
/// assert_eq!(murmur_hash64a(b"", 0), 0);
/// assert_eq!(murmur_hash64a(b"lua", 0), 0xA14E8DFA2CD117E2);
/// ```
pub fn murmur_hash64a(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut k = u64::from_le_bytes([
            block[0], block[1], block[2], block[3], block[4], block[5], block[6], block[7],
        ]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate().rev() {
            h ^= u64::from(*byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Hash a human-readable entry name the way archive keys are computed
pub fn name_hash(name: &str) -> u64 {
    murmur_hash64a(name.as_bytes(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(murmur_hash64a(b"", 0), 0);
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(name_hash("a"), 0x071717D2D36B6B11);
        assert_eq!(name_hash("hello"), 0x1E68D17C457BF117);
        assert_eq!(name_hash("hello, world"), 0x9659AD0699A8465F);
        assert_eq!(
            name_hash("The quick brown fox jumps over the lazy dog"),
            0x5589CA33042A861B
        );
    }

    #[test]
    fn test_type_names() {
        // Block-aligned, tail-only and mixed lengths
        assert_eq!(name_hash("lua"), 0xA14E8DFA2CD117E2);
        assert_eq!(name_hash("material"), 0xEAC0B497876ADEDF);
        assert_eq!(name_hash("texture"), 0xCD4238C6A0C69E32);
        assert_eq!(name_hash("shading_environment_mapping"), 0x250E0A11AC8E26F8);
    }

    #[test]
    fn test_deterministic() {
        let name = "content/fac_helldivers/scripts/main";
        assert_eq!(name_hash(name), name_hash(name));
        assert_ne!(name_hash(name), name_hash("content/fac_helldivers/scripts/maim"));
    }

    #[test]
    fn test_seed_changes_output() {
        assert_ne!(murmur_hash64a(b"lua", 0), murmur_hash64a(b"lua", 1));
    }
}
