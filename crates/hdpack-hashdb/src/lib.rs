//! Name databases and target sets for hashed archive entries
//!
//! Archive entries are keyed by 64-bit hashes of names that are not stored
//! anywhere in the archives. A [`NameDatabase`] maps recovered hashes back to
//! their names; a [`TargetSet`] lists the keys actually seen in a set of
//! archives, so that a database can be trimmed to what is useful.
//!
//! ```
//! use hdpack_hashdb::{NameDatabase, TargetSet};
//!
//! let mut db = NameDatabase::new();
//! let key = db.insert_name("lua");
//! assert_eq!(format!("{key:016X}"), "A14E8DFA2CD117E2");
//!
//! let targets: TargetSet = [key].into_iter().collect();
//! db.insert_name("unused");
//! db.retain_targets(&targets);
//! assert_eq!(db.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod database;
pub mod error;
pub mod natural;
pub mod target;

pub use database::NameDatabase;
pub use error::{HashDbError, HashDbResult};
pub use natural::natural_cmp;
pub use target::TargetSet;
