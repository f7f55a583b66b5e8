//! Absolute memory address wrapper used throughout the relocation layer

use super::error::{RelocError, RelocResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::ptr::NonNull;
use std::str::FromStr;

/// An absolute address inside the host process.
///
/// Non-owning by construction: holding an `Address` implies nothing about the
/// lifetime of whatever lives there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub usize);

impl Address {
    /// Creates an address from a raw value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// The null address
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks whether the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Checks alignment against the given boundary
    pub const fn is_aligned(&self, alignment: usize) -> bool {
        alignment != 0 && self.0 % alignment == 0
    }

    /// Adds a signed displacement, wrapping on overflow
    pub const fn offset(&self, delta: isize) -> Self {
        Address(self.0.wrapping_add_signed(delta))
    }

    /// Adds a signed displacement, failing on address-space overflow
    pub fn checked_offset(&self, delta: isize) -> RelocResult<Self> {
        self.0
            .checked_add_signed(delta)
            .map(Address)
            .ok_or_else(|| RelocError::InvalidAddress(format!("{self} {delta:+#x}")))
    }

    /// Adds an unsigned byte offset, failing on address-space overflow
    pub fn checked_add(&self, offset: usize) -> RelocResult<Self> {
        self.0
            .checked_add(offset)
            .map(Address)
            .ok_or_else(|| RelocError::InvalidAddress(format!("{self} + {offset:#x}")))
    }

    /// Byte distance from `base` to this address
    pub const fn offset_from(&self, base: Address) -> isize {
        self.0.wrapping_sub(base.0) as isize
    }

    /// Returns the raw value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Returns the address as a const pointer
    pub const fn as_ptr<T>(&self) -> *const T {
        self.0 as *const T
    }

    /// Returns the address as a mutable pointer
    pub const fn as_mut_ptr<T>(&self) -> *mut T {
        self.0 as *mut T
    }

    /// Returns the address as a `NonNull`, or `None` for the null address
    pub fn as_non_null<T>(&self) -> Option<NonNull<T>> {
        NonZeroUsize::new(self.0).map(|v| {
            // a non-zero usize always produces a non-null pointer
            unsafe { NonNull::new_unchecked(v.get() as *mut T) }
        })
    }
}

impl FromStr for Address {
    type Err = RelocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            usize::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            // bare hex if it contains letters
            usize::from_str_radix(s, 16)
        } else {
            s.parse::<usize>()
        };

        value
            .map(Address::new)
            .map_err(|_| RelocError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value as usize)
    }
}

impl<T> From<NonNull<T>> for Address {
    fn from(ptr: NonNull<T>) -> Self {
        Address::new(ptr.as_ptr() as usize)
    }
}

impl<T> From<*const T> for Address {
    fn from(ptr: *const T) -> Self {
        Address::new(ptr as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert_eq!(Address::from_str("0x1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("0X1000").unwrap(), Address::new(0x1000));
        assert_eq!(
            Address::from_str("DEADBEEF").unwrap(),
            Address::new(0xDEADBEEF)
        );
        assert_eq!(Address::from_str("4096").unwrap(), Address::new(4096));
        assert!(Address::from_str("not an address").is_err());
    }

    #[test]
    fn test_address_offset() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.offset(0x10), Address::new(0x1010));
        assert_eq!(addr.offset(-0x10), Address::new(0x0FF0));
        assert_eq!(addr.checked_add(0x80).unwrap(), Address::new(0x1080));
        assert!(Address::new(usize::MAX).checked_add(1).is_err());
        assert!(Address::new(0x1000).checked_offset(-0x10).is_ok());
    }

    #[test]
    fn test_offset_from() {
        let base = Address::new(0x7FF0_0000);
        let resolved = Address::new(0x7FF0_0180);
        assert_eq!(resolved.offset_from(base), 0x180);
        assert_eq!(base.offset_from(resolved), -0x180);
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xDEADBEEF);
        assert_eq!(format!("{}", addr), "0x00000000DEADBEEF");
        assert_eq!(format!("{:x}", addr), "0x00000000deadbeef");
        assert_eq!(format!("{:X}", addr), "0x00000000DEADBEEF");
    }

    #[test]
    fn test_non_null_round_trip() {
        let value = 42u32;
        let ptr = NonNull::from(&value);
        let addr = Address::from(ptr);
        assert_eq!(addr.as_non_null::<u32>(), Some(ptr));
        assert_eq!(Address::null().as_non_null::<u32>(), None);
    }

    #[test]
    fn test_alignment() {
        assert!(Address::new(0x1000).is_aligned(16));
        assert!(!Address::new(0x1005).is_aligned(4));
        assert!(!Address::new(0x1000).is_aligned(0));
    }
}
