//! Opaque identifiers naming functions and data inside the host binary

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, version-independent name for one location in the host binary.
///
/// The value is opaque: it carries no meaning without an offset database
/// that maps it to a byte offset for a concrete host version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub u64);

impl Id {
    /// Creates an identifier from its raw value
    pub const fn new(value: u64) -> Self {
        Id(value)
    }

    /// Returns the raw value
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = Id::new(12326);
        assert_eq!(id.get(), 12326);
        assert_eq!(Id::from(12326u64), id);
        assert_eq!(id.to_string(), "12326");
    }

    #[test]
    fn test_id_ordering() {
        assert!(Id::new(1) < Id::new(2));
        assert_eq!(Id::new(7), Id::new(7));
    }
}
