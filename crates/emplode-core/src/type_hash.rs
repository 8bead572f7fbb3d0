//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash that identifies a native type by its
//! registered name. Hashes are computed deterministically, so the same name
//! always yields the same identity regardless of registration order:
//!
//! - Two bindings of the same registered type compare equal
//! - No global registry is needed to compare identities
//! - Qualified names (`mabe::SelectElite`) hash like any other name
//!
//! # Examples
//!
//! ```
//! use emplode_core::TypeHash;
//!
//! let a = TypeHash::from_name("SelectElite");
//! let b = TypeHash::from_name("SelectElite");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("OrganismType"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for native type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;
}

/// A deterministic 64-bit hash identifying a native type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant. Used as the identity of `void`.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a (possibly qualified) type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for TypeHash {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
