//! Registration of host modules into a configuration tree.

use std::sync::{Arc, RwLock};

use emplode::{ObjectBinding, Scope};
use emplode_core::{AccessError, NativeBinding, NativeType, SymbolError};
use tracing::debug;

/// A long-lived host module with a configurable surface.
///
/// The simulation runtime owns module instances. They are bound into the
/// tree as borrowed objects, so tearing the tree down never drops them.
pub trait Module: NativeBinding + NativeType + Sized {
    /// Name the module registers under.
    fn name(&self) -> &str;

    /// One-line description shown to configuration authors.
    fn description(&self) -> &str;

    /// Link each configurable field into `binding`.
    fn setup_config(binding: &mut ObjectBinding) -> Result<(), SymbolError>;
}

/// Bind `module` into `scope` and run its configuration setup.
///
/// A failing setup leaves the entries registered so far in place; the
/// caller decides whether to remove the binding.
pub fn register_module<'a, M: Module>(
    scope: &'a mut Scope,
    module: &Arc<RwLock<M>>,
) -> Result<&'a mut ObjectBinding, SymbolError> {
    let (name, description) = {
        let guard = module
            .read()
            .map_err(|_| SymbolError::access(M::type_name(), AccessError::LockFailed))?;
        (guard.name().to_string(), guard.description().to_string())
    };

    let binding = scope.add_borrowed_object(name, description, module)?;
    M::setup_config(binding)?;
    debug!(
        module = %binding.info().label(),
        native_type = M::type_name(),
        entries = binding.scope().len(),
        "registered module"
    );
    Ok(binding)
}
