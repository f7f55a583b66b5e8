//! The attached host module: load address, span, and detected version

use crate::core::types::{Address, RelocError, RelocResult, VersionKey};
use once_cell::sync::OnceCell;
use std::fmt;
use tracing::info;

/// Process-wide attachment point; written exactly once
static ATTACHED: OnceCell<HostModule> = OnceCell::new();

/// The host image this process resolves addresses against.
///
/// Base, span, and version are read once at construction and never change;
/// the version stamp in particular is detected a single time, not per call.
#[derive(Debug, Clone)]
pub struct HostModule {
    name: String,
    base: Address,
    size: usize,
    version: VersionKey,
}

impl HostModule {
    /// Builds a module description from already-known values.
    ///
    /// This is the construction path for tests and for consumers that obtain
    /// the mapping information through their own channels.
    pub fn from_parts(
        name: impl Into<String>,
        base: Address,
        size: usize,
        version: VersionKey,
    ) -> Self {
        HostModule {
            name: name.into(),
            base,
            size,
            version,
        }
    }

    /// Queries the running host image via the platform layer.
    ///
    /// Reads the module base, mapped size, and embedded version stamp for
    /// the current executable. A missing or malformed version resource is
    /// fatal: no offset entry can be selected without it.
    #[cfg(target_os = "windows")]
    pub fn attach() -> RelocResult<Self> {
        let image = crate::host::current_image()?;
        Ok(HostModule {
            name: image.name,
            base: image.base,
            size: image.size,
            version: image.version,
        })
    }

    /// Publishes the module as the process-wide attachment.
    ///
    /// May be called once; a second call is an error rather than a silent
    /// re-detection.
    pub fn init(module: HostModule) -> RelocResult<()> {
        info!(
            name = %module.name,
            base = %module.base,
            size = module.size,
            version = %module.version,
            "host module attached"
        );
        ATTACHED
            .set(module)
            .map_err(|_| RelocError::AlreadyAttached)
    }

    /// The process-wide attachment, if [`init`](Self::init) has run
    pub fn try_current() -> RelocResult<&'static HostModule> {
        ATTACHED.get().ok_or(RelocError::NotAttached)
    }

    /// Module name as reported by the platform
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute load address of the image
    pub fn base(&self) -> Address {
        self.base
    }

    /// Mapped size of the image in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Version stamp detected at construction
    pub fn version(&self) -> VersionKey {
        self.version
    }

    /// One past the last mapped byte
    pub fn end(&self) -> Address {
        self.base.offset(self.size as isize)
    }

    /// Whether an address falls inside the mapped image
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.base && addr < self.end()
    }
}

impl fmt::Display for HostModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} @ {}", self.name, self.version, self.base)
    }
}
