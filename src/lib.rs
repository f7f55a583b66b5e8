//! relokit: version-aware address relocation and generational handle
//! tracking for a closed-source host process
//!
//! Two subsystems form the core. The relocation layer maps stable numeric
//! identifiers to concrete in-memory addresses through an offset database
//! keyed by the host binary's detected version. The handle layer replaces
//! raw pointers to transient host objects with compact generational tokens
//! that detect staleness on every resolution.

pub mod config;
pub mod core;
pub mod handle;
pub mod host;
pub mod reloc;

// Re-export main types from the core module
pub use crate::core::types::{Address, Id, Offset, RelocError, RelocResult, VersionKey};

// Re-export the two subsystem surfaces
pub use handle::{Handle, HandleManager, RawHandle};
pub use reloc::{HostModule, LookupMode, OffsetDatabase, OffsetEntry, Resolved, Resolver};
