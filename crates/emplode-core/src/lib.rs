//! Core types for the Emplode configuration language.
//!
//! This crate holds everything the symbol tree needs to know about the host
//! side, without knowing anything about symbols itself:
//!
//! - **type_hash** - deterministic identity for native types
//! - **descriptor** - `TypeDescriptor` plus optional custom copy strategy
//! - **native** - the `NativeBinding` capability and owned/borrowed handles
//! - **value** - scalar values and the Rust types that can back them
//! - **link** - accessors for scalars stored outside the tree
//! - **error** - `SymbolError` and `AccessError`

mod descriptor;
mod error;
mod link;
mod native;
mod type_hash;
mod value;

pub use descriptor::{CopyStrategy, TypeDescriptor};
pub use error::{AccessError, SymbolError};
pub use link::{FieldLink, FieldProjection, ValueAccessor};
pub use native::{AsAny, NativeBinding, NativeHandle, NativeObject, NativeType, WeakNativeHandle};
pub use type_hash::{TypeHash, hash_constants};
pub use value::{ScalarType, Value, ValueKind};
