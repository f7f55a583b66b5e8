//! Resolution of identifiers and raw offsets into typed addresses

use super::database::{LookupMode, OffsetDatabase};
use super::module::HostModule;
use crate::core::types::{Address, Id, Offset, RelocResult, VersionKey};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// A typed, non-owning address inside the host module.
///
/// Valid exactly as long as the host module stays mapped; copying or storing
/// one carries no lifetime or deallocation responsibility. Displacement and
/// indexing operate on the already-resolved base without touching the
/// database again.
pub struct Resolved<T> {
    address: Address,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Resolved<T> {
    /// Wraps an already-computed absolute address
    pub const fn from_address(address: Address) -> Self {
        Resolved {
            address,
            _marker: PhantomData,
        }
    }

    /// The absolute address
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The address as a const pointer
    pub const fn as_ptr(&self) -> *const T {
        self.address.as_ptr()
    }

    /// The address as a mutable pointer
    pub const fn as_mut_ptr(&self) -> *mut T {
        self.address.as_mut_ptr()
    }

    /// The address as a `NonNull`, or `None` for null
    pub fn as_non_null(&self) -> Option<NonNull<T>> {
        self.address.as_non_null()
    }

    /// Pointer-to-member-style displacement in bytes
    pub fn byte_offset(&self, delta: isize) -> Self {
        Resolved::from_address(self.address.offset(delta))
    }

    /// Array indexing with a stride of `size_of::<T>()`
    pub fn element(&self, index: usize) -> Self {
        let stride = mem::size_of::<T>();
        Resolved::from_address(self.address.offset((stride * index) as isize))
    }

    /// Reinterprets the resolved address as a different type
    pub const fn cast<U>(&self) -> Resolved<U> {
        Resolved::from_address(self.address)
    }
}

// Manual impls: Resolved<T> is a plain value regardless of T
impl<T> Clone for Resolved<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resolved<T> {}

impl<T> PartialEq for Resolved<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<T> Eq for Resolved<T> {}

impl<T> fmt::Debug for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolved").field(&self.address).finish()
    }
}

impl<T> fmt::Display for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Binds a module snapshot to an offset database.
///
/// The base and version are captured at construction; resolution afterwards
/// reads only immutable state and is safe from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'db> {
    base: Address,
    version: VersionKey,
    mode: LookupMode,
    db: &'db OffsetDatabase,
}

impl<'db> Resolver<'db> {
    /// Creates a strict-mode resolver for the given module
    pub fn new(module: &HostModule, db: &'db OffsetDatabase) -> Self {
        Self::with_mode(module, db, LookupMode::Strict)
    }

    /// Creates a resolver with an explicit lookup policy
    pub fn with_mode(module: &HostModule, db: &'db OffsetDatabase, mode: LookupMode) -> Self {
        Resolver {
            base: module.base(),
            version: module.version(),
            mode,
            db,
        }
    }

    /// Module base captured at construction
    pub fn base(&self) -> Address {
        self.base
    }

    /// Host version captured at construction
    pub fn version(&self) -> VersionKey {
        self.version
    }

    /// Active lookup policy
    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    /// Resolves an identifier through the database: base + stored offset.
    ///
    /// Fails if the identifier has no entry for the captured version; a
    /// failed resolution is never collapsed into a null address.
    pub fn resolve<T>(&self, id: Id) -> RelocResult<Resolved<T>> {
        let offset = self.db.lookup_with(self.mode, id, self.version)?;
        let address = self.base.checked_add(offset as usize)?;
        Ok(Resolved::from_address(address))
    }

    /// Resolves a version-stable raw offset: base + offset, no database.
    ///
    /// Cannot fail; the base is fixed after construction.
    pub fn at_offset<T>(&self, offset: Offset) -> Resolved<T> {
        Resolved::from_address(self.base.offset(offset as isize))
    }
}
