//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a type name. The same name always
//! yields the same hash, so a parent can be referenced by hash before anything
//! looks it up, and the registry can key its tables without a secondary id map.
//!
//! # Examples
//!
//! ```
//! use corereg_core::TypeHash;
//!
//! let object = TypeHash::from_name("Object");
//! assert_eq!(object, TypeHash::from_name("Object"));
//! assert_ne!(object, TypeHash::from_name("Reference"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
///
/// Type and singleton names live in different namespaces; mixing a domain
/// marker keeps `"IP"` the class distinct from `"IP"` the singleton.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for singleton hashes
    pub const SINGLETON: u64 = 0x5ea77ffbcdf5f302;
}

/// A deterministic 64-bit hash identifying a registered type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for a singleton published under `name`.
    #[inline]
    pub fn from_singleton(name: &str) -> Self {
        TypeHash(hash_constants::SINGLETON ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("Resource"), TypeHash::from_name("Resource"));
    }

    #[test]
    fn different_names_differ() {
        assert_ne!(TypeHash::from_name("Image"), TypeHash::from_name("Resource"));
    }

    #[test]
    fn singleton_domain_is_separate() {
        assert_ne!(TypeHash::from_name("IP"), TypeHash::from_singleton("IP"));
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(TypeHash::default().is_empty());
        assert!(!TypeHash::from_name("Object").is_empty());
    }

    #[test]
    fn debug_format_is_hex() {
        let s = format!("{:?}", TypeHash(0xff));
        assert_eq!(s, "TypeHash(0x00000000000000ff)");
    }
}
