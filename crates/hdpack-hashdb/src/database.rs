//! Name database: hashes mapped back to recovered names
//!
//! One record per line, `HHHHHHHHHHHHHHHH name`: the key in hexadecimal, a
//! single space, then the rest of the line taken verbatim as the name. Empty
//! lines and lines starting with `#` are skipped.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use hdpack_formats::name_hash;

use crate::error::{HashDbError, HashDbResult};
use crate::natural::natural_cmp;
use crate::target::{TargetSet, parse_key};

/// In-memory name database keyed by hash
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDatabase {
    names: BTreeMap<u64, String>,
}

impl NameDatabase {
    /// Empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database file
    ///
    /// With `check` set, every key must equal the hash of its name; the
    /// first mismatch fails the whole load.
    pub fn from_file(path: &Path, check: bool) -> HashDbResult<Self> {
        let file = File::open(path).map_err(HashDbError::io(path))?;
        let db = Self::parse(BufReader::new(file), check).map_err(|e| e.in_file(path))?;
        tracing::debug!(path = %path.display(), entries = db.len(), "loaded name database");
        Ok(db)
    }

    /// Parse database records from a reader
    pub fn parse<R: BufRead>(reader: R, check: bool) -> HashDbResult<Self> {
        let mut names = BTreeMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(HashDbError::read(line_number))?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, name)) = line.split_once(' ') else {
                return Err(HashDbError::MissingSeparator { line_number, line });
            };
            let hash = parse_key(line_number, key)?;

            if check {
                let expected = name_hash(name);
                if expected != hash {
                    return Err(HashDbError::HashMismatch {
                        expected,
                        actual: hash,
                        name: name.to_string(),
                    });
                }
            }

            names.insert(hash, name.to_string());
        }

        Ok(Self { names })
    }

    /// Write the database, replacing `path`
    ///
    /// With `sort` set, records are ordered by natural comparison of their
    /// names; otherwise by ascending key.
    pub fn save_to_file(&self, path: &Path, sort: bool) -> HashDbResult<()> {
        let file = File::create(path).map_err(HashDbError::io(path))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, sort)
            .and_then(|()| writer.flush())
            .map_err(HashDbError::io(path))?;
        tracing::debug!(path = %path.display(), entries = self.len(), sort, "saved name database");
        Ok(())
    }

    /// Write every record to `writer`
    pub fn write<W: Write>(&self, writer: &mut W, sort: bool) -> std::io::Result<()> {
        let mut records: Vec<(&u64, &String)> = self.names.iter().collect();
        if sort {
            records.sort_by(|(_, a), (_, b)| natural_cmp(a, b));
        }
        for (key, name) in records {
            writeln!(writer, "{key:016X} {name}")?;
        }
        Ok(())
    }

    /// Hash `name` and record it, returning its key
    pub fn insert_name(&mut self, name: &str) -> u64 {
        let key = name_hash(name);
        self.names.insert(key, name.to_string());
        key
    }

    /// Hash and record every non-empty line of a source listing
    ///
    /// Only the line terminator (`\n` or `\r\n`) is removed; other
    /// whitespace is part of the name. Returns the number of lines added.
    pub fn merge_source_file(&mut self, path: &Path) -> HashDbResult<usize> {
        let contents = std::fs::read_to_string(path).map_err(HashDbError::io(path))?;
        Ok(self.merge_source(&contents))
    }

    /// Hash and record every non-empty line of `contents`
    pub fn merge_source(&mut self, contents: &str) -> usize {
        let mut added = 0;
        for line in contents.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            self.insert_name(line);
            added += 1;
        }
        added
    }

    /// Drop every record whose key is not in `targets`
    pub fn retain_targets(&mut self, targets: &TargetSet) {
        let before = self.names.len();
        self.names.retain(|key, _| targets.contains(*key));
        tracing::debug!(
            removed = before - self.names.len(),
            kept = self.names.len(),
            "filtered name database"
        );
    }

    /// Recovered name for `hash`, if known
    pub fn get(&self, hash: u64) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Recovered name for `hash`, or its 16-digit uppercase hex form
    pub fn display_name(&self, hash: u64) -> Cow<'_, str> {
        self.get(hash)
            .map_or_else(|| Cow::Owned(format!("{hash:016X}")), Cow::Borrowed)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the database holds no records
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Records in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.names.iter().map(|(key, name)| (*key, name.as_str()))
    }
}
