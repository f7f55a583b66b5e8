//! Platform queries for the running host image
//!
//! Everything here is an external collaborator from the core's point of
//! view: the module base comes from the OS loader and the version key from
//! the image's embedded version metadata. Only this module talks to the
//! platform; the rest of the crate is platform-independent.

#[cfg(target_os = "windows")]
mod windows;

use crate::core::types::{Address, VersionKey};

/// Raw facts about the currently running image, as reported by the platform
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub name: String,
    pub base: Address,
    pub size: usize,
    pub version: VersionKey,
}

/// Queries base, span, and version stamp of the current executable image
#[cfg(target_os = "windows")]
pub fn current_image() -> crate::core::types::RelocResult<ImageInfo> {
    windows::query_current_image()
}
