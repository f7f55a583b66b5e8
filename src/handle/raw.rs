//! Untyped generational handle value

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Compact (slot index, generation) token referencing a host object.
///
/// Safe to copy, store, and compare without lifetime implications; the
/// generation snapshot is what lets a manager detect that the slot has been
/// reused since this handle was issued. Ordering is lexicographic on
/// (index, generation).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct RawHandle {
    index: u32,
    generation: u32,
}

// handles travel by value everywhere; keep them two words of u32
const _: () = assert!(mem::size_of::<RawHandle>() == 8);

impl RawHandle {
    /// Creates a handle from its parts
    pub const fn new(index: u32, generation: u32) -> Self {
        RawHandle { index, generation }
    }

    /// Slot index within the owning manager's table
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation snapshot taken when the handle was issued
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}
