//! Offset database: the immutable (identifier, version) -> offset table
//!
//! Loaded once from an external JSON resource keyed by the host binary's
//! identity hash. Load is all-or-nothing; after it succeeds the table never
//! changes, so lookups are safe from any number of threads.

use crate::core::types::{Id, Offset, RelocError, RelocResult, VersionKey};
use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// On-disk format revision accepted by [`OffsetDatabase::load`]
pub const FORMAT_VERSION: u32 = 2;

/// One authoritative offset for an identifier in one host build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetEntry {
    pub id: Id,
    pub version: VersionKey,
    pub offset: Offset,
}

/// Lookup policy when no exact (id, version) entry exists.
///
/// `Strict` fails loudly; a wrong address into the host binary is worse than
/// a crash. `Nearest` substitutes the closest covered version at or below
/// the requested one and must always be an explicit opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    #[default]
    Strict,
    Nearest,
}

impl FromStr for LookupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LookupMode::Strict),
            "nearest" => Ok(LookupMode::Nearest),
            other => Err(format!("unknown lookup mode: {other:?}")),
        }
    }
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::Strict => write!(f, "strict"),
            LookupMode::Nearest => write!(f, "nearest"),
        }
    }
}

/// Serialized shape of the database resource
#[derive(Debug, Serialize, Deserialize)]
struct DatabaseFile {
    format: u32,
    identity: String,
    entries: Vec<OffsetEntry>,
}

/// Read-only table mapping (identifier, version) to a byte offset from the
/// module base.
#[derive(Debug)]
pub struct OffsetDatabase {
    identity: String,
    // sorted by (id, version); at most one entry per key
    entries: Vec<OffsetEntry>,
}

impl OffsetDatabase {
    /// Loads the database resource, verifying format revision and host
    /// identity. Any failure rejects the whole resource.
    pub fn load(path: impl AsRef<Path>, expected_identity: &str) -> RelocResult<Self> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).map_err(|e| RelocError::database_missing(path, e))?;
        let file: DatabaseFile = serde_json::from_str(&raw)
            .map_err(|e| RelocError::database_corrupt(path, e.to_string()))?;

        if file.format != FORMAT_VERSION {
            return Err(RelocError::DatabaseFormatMismatch {
                expected: FORMAT_VERSION,
                found: file.format,
            });
        }

        let identity = canonical_identity(&file.identity)
            .ok_or_else(|| RelocError::database_corrupt(path, "identity is not valid hex"))?;
        let expected = canonical_identity(expected_identity).ok_or_else(|| {
            RelocError::database_corrupt(path, "expected identity is not valid hex")
        })?;
        if identity != expected {
            return Err(RelocError::IdentityMismatch {
                expected,
                found: identity,
            });
        }

        let db = Self::from_entries(identity, file.entries)?;
        info!(
            path = %path.display(),
            entries = db.len(),
            identity = db.identity(),
            "offset database loaded"
        );
        Ok(db)
    }

    /// Builds a database from in-memory entries, sorting and rejecting
    /// duplicate (id, version) pairs.
    pub fn from_entries(
        identity: impl Into<String>,
        mut entries: Vec<OffsetEntry>,
    ) -> RelocResult<Self> {
        entries.par_sort_unstable_by_key(|e| (e.id, e.version.pack()));

        for pair in entries.windows(2) {
            if pair[0].id == pair[1].id && pair[0].version == pair[1].version {
                return Err(RelocError::DuplicateEntry {
                    id: pair[0].id,
                    version: pair[0].version,
                });
            }
        }

        Ok(OffsetDatabase {
            identity: identity.into(),
            entries,
        })
    }

    /// Exact lookup; absence of the (id, version) pair is an error, never a
    /// silent substitute.
    pub fn lookup(&self, id: Id, version: VersionKey) -> RelocResult<Offset> {
        self.lookup_with(LookupMode::Strict, id, version)
    }

    /// Lookup under an explicit policy
    pub fn lookup_with(&self, mode: LookupMode, id: Id, version: VersionKey) -> RelocResult<Offset> {
        let key = (id, version.pack());
        match self
            .entries
            .binary_search_by_key(&key, |e| (e.id, e.version.pack()))
        {
            Ok(pos) => Ok(self.entries[pos].offset),
            Err(insertion) => match mode {
                LookupMode::Strict => Err(RelocError::unresolved(id, version)),
                LookupMode::Nearest => {
                    // greatest covered version at or below the requested one
                    let candidate = self.entries[..insertion].last().filter(|e| e.id == id);
                    match candidate {
                        Some(entry) => {
                            debug!(
                                %id,
                                requested = %version,
                                substituted = %entry.version,
                                "nearest-version lookup"
                            );
                            Ok(entry.offset)
                        }
                        None => Err(RelocError::unresolved(id, version)),
                    }
                }
            },
        }
    }

    /// Whether an exact entry exists for (id, version)
    pub fn contains(&self, id: Id, version: VersionKey) -> bool {
        self.lookup(id, version).is_ok()
    }

    /// All versions the database covers for one identifier, ascending
    pub fn versions_for(&self, id: Id) -> Vec<VersionKey> {
        let start = self.entries.partition_point(|e| e.id < id);
        self.entries[start..]
            .iter()
            .take_while(|e| e.id == id)
            .map(|e| e.version)
            .collect()
    }

    /// Canonical identity of the host build this database targets
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical lowercase-hex form of an identity key, or `None` if not hex
fn canonical_identity(s: &str) -> Option<String> {
    let bytes = hex::decode(s.trim()).ok()?;
    if bytes.is_empty() {
        return None;
    }
    Some(hex::encode(bytes))
}
