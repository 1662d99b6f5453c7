//! Target sets: the keys a name database should keep
//!
//! One hexadecimal key per line. Empty lines and lines starting with `#`
//! are skipped. Saved files are always sorted and free of duplicates.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{HashDbError, HashDbResult};

/// Set of hash keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    keys: BTreeSet<u64>,
}

/// Parse a key of hex digits only; signs and prefixes are rejected
pub(crate) fn parse_key(line_number: usize, key: &str) -> HashDbResult<u64> {
    let invalid = |source| HashDbError::InvalidKey {
        line_number,
        key: key.to_string(),
        source,
    };
    if key.is_empty() || !key.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(None));
    }
    u64::from_str_radix(key, 16).map_err(|e| invalid(Some(e)))
}

impl TargetSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a target file
    pub fn from_file(path: &Path) -> HashDbResult<Self> {
        let file = File::open(path).map_err(HashDbError::io(path))?;
        let targets = Self::parse(BufReader::new(file)).map_err(|e| e.in_file(path))?;
        tracing::debug!(path = %path.display(), entries = targets.len(), "loaded target set");
        Ok(targets)
    }

    /// Parse keys from a reader
    pub fn parse<R: BufRead>(reader: R) -> HashDbResult<Self> {
        let mut keys = BTreeSet::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(HashDbError::read(index + 1))?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            keys.insert(parse_key(index + 1, &line)?);
        }
        Ok(Self { keys })
    }

    /// Write the set in ascending order, replacing `path`
    pub fn save_to_file(&self, path: &Path) -> HashDbResult<()> {
        let file = File::create(path).map_err(HashDbError::io(path))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(HashDbError::io(path))?;
        tracing::debug!(path = %path.display(), entries = self.len(), "saved target set");
        Ok(())
    }

    /// Write every key to `writer` in ascending order
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for key in &self.keys {
            writeln!(writer, "{key:016X}")?;
        }
        Ok(())
    }

    /// Add a key, returning whether it was new
    pub fn insert(&mut self, key: u64) -> bool {
        self.keys.insert(key)
    }

    /// Whether `key` is in the set
    pub fn contains(&self, key: u64) -> bool {
        self.keys.contains(&key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.keys.iter().copied()
    }
}

impl Extend<u64> for TargetSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

impl FromIterator<u64> for TargetSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_parse_and_deduplicate() {
        let input = "# targets\nFF\n\n00000000000000FF\nA14E8DFA2CD117E2\n";
        let targets = TargetSet::parse(Cursor::new(input)).expect("parse");
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(0xFF));
        assert!(targets.contains(0xA14E_8DFA_2CD1_17E2));
    }

    #[test]
    fn test_invalid_key_reports_line() {
        let err = TargetSet::parse(Cursor::new("01\nnot-hex\n")).unwrap_err();
        assert!(matches!(err, HashDbError::InvalidKey { line_number: 2, .. }));
    }

    #[test]
    fn test_key_overflow_rejected() {
        let err = TargetSet::parse(Cursor::new("10000000000000000\n")).unwrap_err();
        assert!(matches!(
            err,
            HashDbError::InvalidKey {
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_signed_and_prefixed_keys_rejected() {
        for key in ["+ff", "-1", "0xff", " ff", "ff "] {
            let err = TargetSet::parse(Cursor::new(format!("{key}\n"))).unwrap_err();
            assert!(
                matches!(
                    err,
                    HashDbError::InvalidKey {
                        line_number: 1,
                        source: None,
                        ..
                    }
                ),
                "accepted {key:?}"
            );
        }
    }

    #[test]
    fn test_write_is_sorted() {
        let targets: TargetSet = [3u64, 0xFFFF_FFFF_FFFF_FFFF, 1, 3].into_iter().collect();
        let mut out = Vec::new();
        targets.write(&mut out).expect("write");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0000000000000001\n0000000000000003\nFFFFFFFFFFFFFFFF\n"
        );
    }
}
