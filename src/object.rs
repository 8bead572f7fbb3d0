//! Object bindings: scopes bound to a live native host object.
//!
//! An [`ObjectBinding`] is a [`Scope`] that additionally holds one
//! [`NativeObject`]. Whether the binding owns the object is carried by the
//! handle itself, so a borrowed object can never be dropped through the
//! tree.
//!
//! # Value copy
//!
//! Copying into a binding requires the source to be an object with a
//! compatible type descriptor. Both checks happen before anything is
//! written. The scope portion (configurable sub-entries) is copied first,
//! then the native object: through the type's custom copy strategy when one
//! is registered, otherwise through [`NativeBinding::default_copy`]. The
//! result is that of the native copy; a sub-entry that fails to copy is
//! logged and does not stop it.
//!
//! # Cloning
//!
//! - Owned objects are duplicated through [`NativeBinding::clone_native`];
//!   types that do not opt in fail with `CloneUnsupported`. Field links in
//!   the cloned subtree are rebound to the fresh object.
//! - Borrowed objects clone as borrowed. Neither binding owns the object.

use std::sync::{Arc, RwLock};

use emplode_core::{
    AccessError, FieldLink, FieldProjection, NativeBinding, NativeObject, NativeType, ScalarType,
    SymbolError, TypeDescriptor, ValueAccessor,
};
use tracing::{debug, trace, warn};

use crate::symbol::{SymbolKind, report};
use crate::{Scalar, Scope, Symbol, SymbolInfo};

/// A scope bound to a native host object.
#[derive(Debug)]
pub struct ObjectBinding {
    scope: Scope,
    native: Option<NativeObject>,
}

impl ObjectBinding {
    /// Bind `native` under `name`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        native: NativeObject,
    ) -> Self {
        Self {
            scope: Scope::new(name, description),
            native: Some(native),
        }
    }

    /// A binding with no object, e.g. during incomplete construction.
    pub fn unbound(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            scope: Scope::new(name, description),
            native: None,
        }
    }

    /// Bind a freshly created object the binding will own.
    pub fn owned<T: NativeBinding>(
        name: impl Into<String>,
        description: impl Into<String>,
        value: T,
    ) -> Self {
        Self::new(name, description, NativeObject::owned(value))
    }

    /// Bind an object whose lifetime the host controls.
    pub fn borrowed<T: NativeBinding>(
        name: impl Into<String>,
        description: impl Into<String>,
        handle: &Arc<RwLock<T>>,
    ) -> Self {
        Self::new(name, description, NativeObject::borrowed(handle))
    }

    pub fn info(&self) -> &SymbolInfo {
        self.scope.info()
    }

    pub fn name(&self) -> &str {
        self.scope.name()
    }

    /// The configurable sub-entries.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Whether dropping this binding drops the object.
    pub fn owns_object(&self) -> bool {
        self.native.as_ref().is_some_and(NativeObject::owns_object)
    }

    /// Whether a live object is bound.
    pub fn is_bound(&self) -> bool {
        self.native.as_ref().is_some_and(NativeObject::is_live)
    }

    /// The bound handle, if any.
    pub fn native(&self) -> Option<&NativeObject> {
        self.native.as_ref()
    }

    /// Descriptor of the bound object, or void when unbound.
    pub fn object_type(&self) -> TypeDescriptor {
        self.native
            .as_ref()
            .map_or_else(TypeDescriptor::void, NativeObject::describe)
    }

    /// Run `f` with shared access to the bound object.
    pub fn with_object<R>(
        &self,
        f: impl FnOnce(&dyn NativeBinding) -> R,
    ) -> Result<R, SymbolError> {
        let native = self.live_native()?;
        native.read(f).map_err(|err| self.access_error(err))
    }

    /// Run `f` with exclusive access to the bound object.
    pub fn with_object_mut<R>(
        &self,
        f: impl FnOnce(&mut dyn NativeBinding) -> R,
    ) -> Result<R, SymbolError> {
        let native = self.live_native()?;
        native.write(f).map_err(|err| self.access_error(err))
    }

    /// Run `f` with the bound object as a `T`.
    ///
    /// # Panics
    ///
    /// Panics if the bound object is not a `T`. That is a host-code bug, not
    /// a configuration error.
    pub fn with_native<T: NativeBinding, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, SymbolError> {
        self.with_object(|object| match object.downcast_ref::<T>() {
            Some(object) => f(object),
            None => panic!(
                "object '{}' holds {} but was accessed as {}",
                self.info().label(),
                object.describe().name(),
                std::any::type_name::<T>()
            ),
        })
    }

    /// Run `f` with the bound object as a mutable `T`.
    ///
    /// # Panics
    ///
    /// Panics if the bound object is not a `T`.
    pub fn with_native_mut<T: NativeBinding, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, SymbolError> {
        self.with_object_mut(|object| {
            let actual = object.describe().name();
            match object.downcast_mut::<T>() {
                Some(object) => f(object),
                None => panic!(
                    "object '{}' holds {} but was accessed as {}",
                    self.info().label(),
                    actual,
                    std::any::type_name::<T>()
                ),
            }
        })
    }

    /// Move the children and bound object into a new binding.
    ///
    /// The new binding keeps the name, description and ownership. `self` is
    /// left unbound, non-owning and empty, so dropping it never touches the
    /// object.
    pub fn take(&mut self) -> ObjectBinding {
        let info = self.scope.info().clone();
        let mut emptied = Scope::new(info.name(), info.description())
            .with_copy_policy(self.scope.copy_policy());
        emptied.info_mut().set_parent(info.parent().cloned());

        let scope = std::mem::replace(&mut self.scope, emptied);
        let native = self.native.take();
        debug!(
            name = %info.label(),
            owned = native.as_ref().is_some_and(NativeObject::owns_object),
            "moved object binding"
        );
        ObjectBinding { scope, native }
    }

    /// Register a scalar whose storage is a field of the bound object.
    ///
    /// `default` is written into the field immediately.
    pub fn link_field<M, T>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default: T,
        project: FieldProjection<M, T>,
    ) -> Result<&mut Scalar, SymbolError>
    where
        M: NativeBinding + NativeType,
        T: ScalarType,
    {
        let name = name.into();
        let target = self.live_native()?.downgrade();
        self.scope.ensure_vacant(&name)?;

        let link = FieldLink::new(target, project);
        default
            .checked_value()
            .and_then(|value| link.write(&value))
            .map_err(|err| report(SymbolError::access(self.scope.child_label(&name), err)))?;
        self.scope
            .add_child(Scalar::linked(name, description, Box::new(link)))
    }

    /// Copy the value of another object into this one.
    pub fn copy_value(&mut self, src: &Symbol) -> Result<(), SymbolError> {
        let Symbol::Object(src) = src else {
            return Err(report(SymbolError::TypeMismatch {
                target: self.info().label(),
                origin: src.info().label(),
                expected: SymbolKind::Object.article_name(),
            }));
        };
        self.copy_from(src)
    }

    /// Copy the scope portion, then the native object, from `src`.
    ///
    /// The native copy runs even when a child of the scope portion fails to
    /// copy; that failure is logged and the native outcome is returned.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn copy_from(&mut self, src: &ObjectBinding) -> Result<(), SymbolError> {
        let dst_type = self.live_native()?.describe();
        let src_native = src.live_native()?;
        let src_type = src_native.describe();
        if !dst_type.is_compatible(&src_type) {
            return Err(report(SymbolError::IncompatibleNativeType {
                target: self.info().label(),
                origin: src.info().label(),
                target_type: dst_type.name(),
                origin_type: src_type.name(),
            }));
        }

        if let Err(err) = self.scope.copy_value(&src.scope) {
            warn!(
                dst = %self.info().label(),
                src = %src.info().label(),
                error = %err,
                "scope portion partially copied"
            );
        }

        let dst_native = self.live_native()?;
        if dst_native.same_object(src_native) {
            trace!(dst = %self.info().label(), "copy from the same object is a no-op");
            return Ok(());
        }

        let applied = dst_native
            .write(|dst_object| {
                src_native.read(|src_object| {
                    match dst_type.try_custom_copy(dst_object, src_object) {
                        Some(applied) => applied,
                        None => dst_object.default_copy(src_object),
                    }
                })
            })
            .and_then(|inner| inner)
            .map_err(|err| self.access_error(err))?;

        trace!(
            dst = %self.info().label(),
            src = %src.info().label(),
            custom = dst_type.has_custom_copy(),
            applied,
            "copy native object"
        );
        if applied {
            Ok(())
        } else {
            Err(report(SymbolError::CopyRejected {
                target: self.info().label(),
                origin: src.info().label(),
            }))
        }
    }

    /// Deep copy of the binding.
    ///
    /// Owned objects must support [`NativeBinding::clone_native`]; borrowed
    /// objects stay borrowed. The original is never modified.
    pub fn try_clone(&self) -> Result<ObjectBinding, SymbolError> {
        let native = match &self.native {
            None => None,
            Some(native) => match native.try_duplicate() {
                Ok(Some(copy)) => Some(copy),
                Ok(None) => {
                    return Err(report(SymbolError::CloneUnsupported {
                        name: self.info().label(),
                        type_name: native.describe().name(),
                    }));
                }
                Err(err) => return Err(self.access_error(err)),
            },
        };

        let mut scope = self.scope.try_clone()?;
        if let (Some(original), Some(copy)) = (&self.native, &native) {
            if !original.same_object(copy) {
                scope.rebind_links(&original.downgrade(), &copy.downgrade());
            }
        }
        debug!(
            name = %self.info().label(),
            owned = native.as_ref().is_some_and(NativeObject::owns_object),
            "cloned object binding"
        );
        Ok(ObjectBinding { scope, native })
    }

    fn live_native(&self) -> Result<&NativeObject, SymbolError> {
        match &self.native {
            Some(native) if native.is_live() => Ok(native),
            _ => Err(report(SymbolError::Unbound {
                name: self.info().label(),
            })),
        }
    }

    fn access_error(&self, err: AccessError) -> SymbolError {
        report(match err {
            AccessError::Dangling => SymbolError::Unbound {
                name: self.info().label(),
            },
            other => SymbolError::access(self.info().label(), other),
        })
    }
}

impl Drop for ObjectBinding {
    fn drop(&mut self) {
        if self.owns_object() {
            trace!(name = %self.info().label(), "dropping owned native object");
        }
    }
}
