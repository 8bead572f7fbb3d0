//! Error types for the symbol model.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SymbolError          - every recoverable configuration failure
//! └── Access(AccessError) - linked storage could not be read or written
//! ```
//!
//! Configuration-author errors (name collisions, type mismatches, native type
//! mismatches) are always returned, never raised. Host-code bugs such as
//! asking for a bound object as the wrong Rust type are invariant violations
//! and panic instead.

use thiserror::Error;

use crate::ValueKind;

// ============================================================================
// Access Errors
// ============================================================================

/// Errors raised while reading or writing linked storage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    /// The stored value has a different type than the link expects.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name
        expected: &'static str,
        /// Actual type name
        actual: &'static str,
    },

    /// The value could not be converted to the storage kind.
    #[error("cannot convert '{value}' to {kind}")]
    Conversion {
        /// Rendered value that failed to convert
        value: String,
        /// Kind the storage holds
        kind: ValueKind,
    },

    /// The object owning the storage no longer exists.
    #[error("linked object has been dropped")]
    Dangling,

    /// Failed to acquire lock (poisoned).
    #[error("failed to acquire lock")]
    LockFailed,
}

// ============================================================================
// Symbol Errors
// ============================================================================

/// Errors reported by symbol registration, assignment and cloning.
///
/// Every variant that involves two symbols names both of them so that the
/// message can be shown to the configuration author as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    /// A child with this name already exists in the scope.
    #[error("name collision: '{name}' is already defined in scope '{scope}'")]
    NameCollision {
        /// The scope that rejected the registration.
        scope: String,
        /// The duplicated name.
        name: String,
    },

    /// The name cannot be addressed by a dotted path.
    #[error("invalid name '{name}' in scope '{scope}': names must be non-empty and contain no '.'")]
    InvalidName {
        /// The scope that rejected the registration.
        scope: String,
        /// The rejected name.
        name: String,
    },

    /// The two sides of an assignment are different kinds of symbol.
    #[error("trying to assign '{origin}' to '{target}', but '{origin}' is not {expected}")]
    TypeMismatch {
        /// Symbol being assigned to.
        target: String,
        /// Symbol being assigned from.
        origin: String,
        /// What the target needed, e.g. "an object".
        expected: &'static str,
    },

    /// Both sides are objects but their native types differ.
    #[error(
        "trying to assign '{origin}' ({origin_type}) to '{target}' ({target_type}): incompatible object types"
    )]
    IncompatibleNativeType {
        /// Symbol being assigned to.
        target: String,
        /// Symbol being assigned from.
        origin: String,
        /// Native type name of the target.
        target_type: &'static str,
        /// Native type name of the source.
        origin_type: &'static str,
    },

    /// An object symbol has no live native object.
    #[error("object '{name}' is not bound to a native object")]
    Unbound {
        /// The unbound object symbol.
        name: String,
    },

    /// A native copy (custom or default) reported failure.
    #[error("native copy from '{origin}' to '{target}' was rejected")]
    CopyRejected {
        /// Symbol being assigned to.
        target: String,
        /// Symbol being assigned from.
        origin: String,
    },

    /// The bound native type does not support cloning an owned instance.
    #[error("cannot clone '{name}': native type {type_name} does not support cloning")]
    CloneUnsupported {
        /// The object symbol being cloned.
        name: String,
        /// Its native type name.
        type_name: &'static str,
    },

    /// Scopes differ in shape under the same-shape copy policy.
    #[error("cannot copy '{origin}' into '{target}': entry '{entry}' exists on only one side")]
    ShapeMismatch {
        /// Scope being assigned to.
        target: String,
        /// Scope being assigned from.
        origin: String,
        /// The entry present on only one side.
        entry: String,
    },

    /// A value could not be converted to the kind a scalar holds.
    #[error("cannot assign '{value}' to '{target}': expected {kind}")]
    Conversion {
        /// Scalar being assigned to.
        target: String,
        /// Rendered value that failed to convert.
        value: String,
        /// Kind the scalar holds.
        kind: ValueKind,
    },

    /// No symbol exists at the given path.
    #[error("unknown symbol '{path}'")]
    NotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// An assignment where one side contains the other.
    #[error("cannot assign '{origin}' to '{target}': one contains the other")]
    OverlappingAssignment {
        /// Symbol being assigned to.
        target: String,
        /// Symbol being assigned from.
        origin: String,
    },

    /// A function was called with the wrong number of arguments.
    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// Function symbol name.
        name: String,
        /// Declared arity.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// Linked storage failed.
    #[error("cannot access '{name}': {error}")]
    Access {
        /// The symbol whose storage failed.
        name: String,
        /// The underlying failure.
        error: AccessError,
    },
}

impl SymbolError {
    /// Attach a symbol name to an [`AccessError`].
    pub fn access(name: impl Into<String>, error: AccessError) -> Self {
        SymbolError::Access {
            name: name.into(),
            error,
        }
    }

    /// Check if this is a name collision.
    pub fn is_name_collision(&self) -> bool {
        matches!(self, SymbolError::NameCollision { .. })
    }

    /// Check if this is a symbol-kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, SymbolError::TypeMismatch { .. })
    }

    /// Check if this is a native type mismatch between two objects.
    pub fn is_incompatible_native_type(&self) -> bool {
        matches!(self, SymbolError::IncompatibleNativeType { .. })
    }
}
