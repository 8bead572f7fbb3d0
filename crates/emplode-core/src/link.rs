//! Storage links for scalars that live outside the symbol tree.
//!
//! A linked scalar reads and writes through a [`ValueAccessor`]. Two
//! accessors are provided:
//!
//! - `Arc<RwLock<T>>` - a shared cell the host keeps a handle to
//! - [`FieldLink`] - a field inside a bound native object

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::{
    AccessError, NativeBinding, NativeType, ScalarType, Value, ValueKind, WeakNativeHandle,
};

/// Read/write access to externally stored scalar data.
pub trait ValueAccessor: Send + Sync + fmt::Debug {
    /// Kind of value the storage holds.
    fn kind(&self) -> ValueKind;

    /// Read the current value.
    fn read(&self) -> Result<Value, AccessError>;

    /// Write a value, converting it to the storage kind.
    fn write(&self, value: &Value) -> Result<(), AccessError>;

    /// Duplicate the accessor. Both copies refer to the same storage.
    fn clone_boxed(&self) -> Box<dyn ValueAccessor>;

    /// Point the accessor at `to` if it currently refers into `from`.
    ///
    /// Used when a subtree is cloned together with its native object.
    /// Accessors that do not refer into a native object return `None`.
    fn rebind(
        &self,
        _from: &WeakNativeHandle,
        _to: &WeakNativeHandle,
    ) -> Option<Box<dyn ValueAccessor>> {
        None
    }
}

impl Clone for Box<dyn ValueAccessor> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

fn convert<T: ScalarType>(value: &Value) -> Result<T, AccessError> {
    T::from_value(value).ok_or_else(|| AccessError::Conversion {
        value: value.to_string(),
        kind: T::KIND,
    })
}

impl<T: ScalarType> ValueAccessor for Arc<RwLock<T>> {
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn read(&self) -> Result<Value, AccessError> {
        let guard = (**self).read().map_err(|_| AccessError::LockFailed)?;
        guard.checked_value()
    }

    fn write(&self, value: &Value) -> Result<(), AccessError> {
        let converted = convert::<T>(value)?;
        let mut guard = (**self).write().map_err(|_| AccessError::LockFailed)?;
        *guard = converted;
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn ValueAccessor> {
        Box::new(Arc::clone(self))
    }
}

// ============================================================================
// FieldLink
// ============================================================================

/// Projection from a native object to one of its fields.
pub type FieldProjection<M, T> = for<'a> fn(&'a mut M) -> &'a mut T;

/// A link to a field of a bound native object.
///
/// Holds only a weak handle, so a link never keeps its object alive. Once
/// the object is gone every access fails with [`AccessError::Dangling`].
pub struct FieldLink<M, T> {
    target: WeakNativeHandle,
    project: FieldProjection<M, T>,
}

impl<M, T> FieldLink<M, T>
where
    M: NativeBinding + NativeType,
    T: ScalarType,
{
    /// Link to the field `project` selects in the object behind `target`.
    pub fn new(target: WeakNativeHandle, project: FieldProjection<M, T>) -> Self {
        Self { target, project }
    }

    fn with_field<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, AccessError> {
        let handle = self.target.upgrade().ok_or(AccessError::Dangling)?;
        let mut guard = (*handle).write().map_err(|_| AccessError::LockFailed)?;
        let object: &mut dyn NativeBinding = &mut *guard;
        let actual = object.describe().name();
        match object.downcast_mut::<M>() {
            Some(object) => Ok(f((self.project)(object))),
            None => Err(AccessError::TypeMismatch {
                expected: M::type_name(),
                actual,
            }),
        }
    }
}

impl<M, T> ValueAccessor for FieldLink<M, T>
where
    M: NativeBinding + NativeType,
    T: ScalarType,
{
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn read(&self) -> Result<Value, AccessError> {
        self.with_field(|field| field.checked_value())?
    }

    fn write(&self, value: &Value) -> Result<(), AccessError> {
        let converted = convert::<T>(value)?;
        self.with_field(|field| *field = converted)
    }

    fn clone_boxed(&self) -> Box<dyn ValueAccessor> {
        Box::new(FieldLink::<M, T> {
            target: self.target.clone(),
            project: self.project,
        })
    }

    fn rebind(
        &self,
        from: &WeakNativeHandle,
        to: &WeakNativeHandle,
    ) -> Option<Box<dyn ValueAccessor>> {
        if !self.target.ptr_eq(from) {
            return None;
        }
        Some(Box::new(FieldLink::<M, T> {
            target: to.clone(),
            project: self.project,
        }))
    }
}

impl<M, T> fmt::Debug for FieldLink<M, T>
where
    M: NativeType,
    T: ScalarType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldLink")
            .field("object", &M::type_name())
            .field("field", &T::type_name())
            .field("live", &(self.target.strong_count() > 0))
            .finish()
    }
}
