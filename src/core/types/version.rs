//! Version stamp of one build of the host binary

use super::error::RelocError;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered `major.minor.patch.build` key identifying one host build.
///
/// Detected once at attach time and immutable for the process lifetime;
/// every offset-database lookup is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VersionKey([u16; 4]);

impl VersionKey {
    /// Creates a version key from its four components
    pub const fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        VersionKey([major, minor, patch, build])
    }

    pub const fn major(&self) -> u16 {
        self.0[0]
    }

    pub const fn minor(&self) -> u16 {
        self.0[1]
    }

    pub const fn patch(&self) -> u16 {
        self.0[2]
    }

    pub const fn build(&self) -> u16 {
        self.0[3]
    }

    /// Packs the four components into one `u64`, preserving ordering
    pub const fn pack(&self) -> u64 {
        ((self.0[0] as u64) << 48)
            | ((self.0[1] as u64) << 32)
            | ((self.0[2] as u64) << 16)
            | (self.0[3] as u64)
    }

    /// Inverse of [`pack`](Self::pack)
    pub const fn unpack(packed: u64) -> Self {
        VersionKey([
            (packed >> 48) as u16,
            (packed >> 32) as u16,
            (packed >> 16) as u16,
            packed as u16,
        ])
    }
}

impl FromStr for VersionKey {
    type Err = RelocError;

    /// Parses `1.10.163.0` (also accepts `-` separators). Omitted trailing
    /// components default to zero; more than four components is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RelocError::VersionMalformed(s.to_string()));
        }

        let mut parts = [0u16; 4];
        let mut count = 0;
        for piece in s.split(['.', '-']) {
            if count == 4 {
                return Err(RelocError::VersionMalformed(s.to_string()));
            }
            parts[count] = piece
                .parse::<u16>()
                .map_err(|_| RelocError::VersionMalformed(s.to_string()))?;
            count += 1;
        }

        Ok(VersionKey(parts))
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl Serialize for VersionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let v: VersionKey = "1.10.163.0".parse().unwrap();
        assert_eq!(v, VersionKey::new(1, 10, 163, 0));
        assert_eq!(v.to_string(), "1.10.163.0");

        let dashed: VersionKey = "1-10-984-0".parse().unwrap();
        assert_eq!(dashed, VersionKey::new(1, 10, 984, 0));
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!("2.0".parse::<VersionKey>().unwrap(), VersionKey::new(2, 0, 0, 0));
        assert_eq!("3".parse::<VersionKey>().unwrap(), VersionKey::new(3, 0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<VersionKey>().is_err());
        assert!("1.2.3.4.5".parse::<VersionKey>().is_err());
        assert!("1.x.3".parse::<VersionKey>().is_err());
        assert!("70000.0".parse::<VersionKey>().is_err());
    }

    #[test]
    fn test_ordering() {
        let v1: VersionKey = "1.0.0.0".parse().unwrap();
        let v2: VersionKey = "2.0.0.0".parse().unwrap();
        let v1_10: VersionKey = "1.10.0.0".parse().unwrap();
        assert!(v1 < v1_10);
        assert!(v1_10 < v2);
    }

    #[test]
    fn test_pack_preserves_order() {
        let keys = [
            VersionKey::new(1, 9, 4, 0),
            VersionKey::new(1, 10, 0, 0),
            VersionKey::new(1, 10, 163, 0),
            VersionKey::new(2, 0, 0, 1),
        ];
        for pair in keys.windows(2) {
            assert!(pair[0].pack() < pair[1].pack());
        }
        for key in keys {
            assert_eq!(VersionKey::unpack(key.pack()), key);
        }
    }

    #[test]
    fn test_serde_string_form() {
        let v = VersionKey::new(1, 10, 163, 0);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"1.10.163.0\"");
        let back: VersionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
