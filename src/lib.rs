//! Symbol, scope and object model of the Emplode configuration language.
//!
//! Configuration text declares named entries inside nested scopes. Each
//! entry is a [`Symbol`]:
//!
//! - **Scalar** - a value, stored locally or linked to host storage
//! - **Scope** - an ordered namespace of exclusively owned children
//! - **Object** - a scope bound to a live native host object
//! - **Function** - a callable
//!
//! The statement layer drives the tree through [`Scope`] factory operations
//! (`add_scope`, `add_object`, ...), lookup, and value copy
//! ([`Symbol::copy_value`], [`Scope::assign`]).
//!
//! # Example
//!
//! ```
//! use emplode::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! impl NativeType for Counter {
//!     fn type_name() -> &'static str {
//!         "Counter"
//!     }
//! }
//!
//! impl NativeBinding for Counter {
//!     fn describe(&self) -> TypeDescriptor {
//!         TypeDescriptor::of::<Self>()
//!     }
//!
//!     fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
//!         match other.downcast_ref::<Counter>() {
//!             Some(other) => {
//!                 self.count = other.count;
//!                 true
//!             }
//!             None => false,
//!         }
//!     }
//! }
//!
//! let mut root = Scope::new("root", "");
//! root.add_owned_object("counter", "counts things", Counter { count: 0 })?
//!     .link_field::<Counter, i64>("count", "current count", 0, |c| &mut c.count)?;
//!
//! root.assign_value(&SymbolPath::from("counter.count"), Value::Int(5))?;
//!
//! let counter = root.lookup("counter").and_then(Symbol::as_object).unwrap();
//! assert_eq!(counter.with_native(|c: &Counter| c.count)?, 5);
//! # Ok::<(), SymbolError>(())
//! ```

mod config;
mod function;
mod object;
mod path;
mod scalar;
mod scope;
mod symbol;

pub use config::CopyPolicy;
pub use function::{Function, NativeFunction};
pub use object::ObjectBinding;
pub use path::SymbolPath;
pub use scalar::Scalar;
pub use scope::{Scope, SymbolTable};
pub use symbol::{Capabilities, Symbol, SymbolInfo, SymbolKind, SymbolVariant};

pub use emplode_core;

/// Everything needed to build and drive a symbol tree.
pub mod prelude {
    pub use crate::{
        Capabilities, CopyPolicy, Function, ObjectBinding, Scalar, Scope, Symbol, SymbolInfo,
        SymbolKind, SymbolPath, SymbolVariant,
    };
    pub use emplode_core::{
        AccessError, FieldLink, NativeBinding, NativeObject, NativeType, ScalarType, SymbolError,
        TypeDescriptor, TypeHash, Value, ValueAccessor, ValueKind,
    };
}
