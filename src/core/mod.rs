//! Core module containing fundamental types for the relocation layer
//!
//! Provides the building blocks used by every other module: address,
//! identifier and version wrappers, the error taxonomy, and the fatal
//! reporting path.

pub mod fatal;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, Id, RelocError, RelocResult, VersionKey};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
