//! Runtime type descriptors for native objects.
//!
//! A [`TypeDescriptor`] pairs a native type's identity with an optional
//! custom copy strategy. Two descriptors are equal when their hashes are
//! equal; the strategy and name take no part in comparison.

use std::fmt;

use crate::{NativeBinding, NativeType, TypeHash};

/// Type-specific value copy from `src` into `dst`.
///
/// Returns `true` when the copy was applied. A strategy that returns `false`
/// must leave `dst` untouched, and applying it twice must be harmless.
pub type CopyStrategy = fn(dst: &mut dyn NativeBinding, src: &dyn NativeBinding) -> bool;

/// Identity of a native type plus its optional custom copy strategy.
///
/// # Example
///
/// ```
/// use emplode_core::{TypeDescriptor, TypeHash};
///
/// let desc = TypeDescriptor::named("Counter");
/// assert_eq!(desc.hash(), TypeHash::from_name("Counter"));
/// assert!(desc.is_compatible(&TypeDescriptor::named("Counter")));
/// assert!(!desc.is_compatible(&TypeDescriptor::void()));
/// ```
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    hash: TypeHash,
    name: &'static str,
    copy: Option<CopyStrategy>,
}

impl TypeDescriptor {
    /// Descriptor for a type registered under `name`.
    pub fn named(name: &'static str) -> Self {
        Self {
            hash: TypeHash::from_name(name),
            name,
            copy: None,
        }
    }

    /// Descriptor for a [`NativeType`].
    pub fn of<T: NativeType>() -> Self {
        Self {
            hash: T::type_hash(),
            name: T::type_name(),
            copy: None,
        }
    }

    /// Sentinel descriptor for an unbound object.
    pub const fn void() -> Self {
        Self {
            hash: TypeHash::EMPTY,
            name: "void",
            copy: None,
        }
    }

    /// Attach a custom copy strategy.
    pub fn with_copy_strategy(mut self, strategy: CopyStrategy) -> Self {
        self.copy = Some(strategy);
        self
    }

    /// The type's identity.
    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// The registered type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is the void sentinel.
    pub fn is_void(&self) -> bool {
        self.hash.is_empty()
    }

    /// Whether a custom copy strategy is registered.
    pub fn has_custom_copy(&self) -> bool {
        self.copy.is_some()
    }

    /// Whether values of `other` may be copied into values of this type.
    ///
    /// Void is compatible with nothing, not even itself.
    pub fn is_compatible(&self, other: &TypeDescriptor) -> bool {
        !self.is_void() && self.hash == other.hash
    }

    /// Apply the custom copy strategy, if one is registered.
    ///
    /// Returns `None` when the type has no strategy, so the caller should
    /// fall back to [`NativeBinding::default_copy`]. Otherwise returns
    /// whether the strategy succeeded.
    pub fn try_custom_copy(
        &self,
        dst: &mut dyn NativeBinding,
        src: &dyn NativeBinding,
    ) -> Option<bool> {
        self.copy.map(|copy| copy(dst, src))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("custom_copy", &self.copy.is_some())
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
