//! Native objects that can be bound into the symbol tree.
//!
//! - [`NativeType`] - static identity of a host type
//! - [`NativeBinding`] - object-safe capability every bindable object implements
//! - [`NativeObject`] - an owned or borrowed handle to a bound object
//!
//! # Example
//!
//! ```
//! use emplode_core::{NativeBinding, NativeObject, NativeType, TypeDescriptor};
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
//! let object = NativeObject::owned(Counter { count: 3 });
//! assert!(object.owns_object());
//! assert_eq!(object.describe().name(), "Counter");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use tracing::trace;

use crate::{AccessError, TypeDescriptor, TypeHash};

/// Strong handle to a native object.
pub type NativeHandle = Arc<RwLock<dyn NativeBinding>>;

/// Non-owning handle to a native object.
pub type WeakNativeHandle = Weak<RwLock<dyn NativeBinding>>;

/// Static identity of a host type.
///
/// Mirrors how every registrable type names itself once; descriptors and
/// hashes are derived from that name.
pub trait NativeType: 'static {
    /// Name the type is registered under.
    fn type_name() -> &'static str;

    /// Hash of the registered name.
    fn type_hash() -> TypeHash {
        TypeHash::from_name(Self::type_name())
    }
}

/// Upcast helper so `dyn NativeBinding` can be downcast.
pub trait AsAny: Any {
    /// View as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// View as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Capability a host object implements to be bound into the symbol tree.
pub trait NativeBinding: AsAny + Send + Sync {
    /// Runtime type identity. Must not change over the object's lifetime.
    fn describe(&self) -> TypeDescriptor;

    /// Generic value copy from `other`, used when the descriptor has no
    /// custom strategy. Returns whether the copy happened.
    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool;

    /// Produce an independently owned duplicate of this object.
    ///
    /// Types that return `None` (the default) cannot be cloned while owned
    /// by the symbol tree.
    fn clone_native(&self) -> Option<NativeObject> {
        None
    }
}

impl dyn NativeBinding {
    /// Whether the object is a `T`.
    pub fn is<T: NativeBinding>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to a concrete type.
    pub fn downcast_ref<T: NativeBinding>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete type, mutably.
    pub fn downcast_mut<T: NativeBinding>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

// ============================================================================
// NativeObject
// ============================================================================

enum Ownership {
    /// The symbol tree holds the only strong reference.
    Owned(NativeHandle),
    /// The host runtime owns the object; dropping this never frees it.
    Borrowed(WeakNativeHandle),
}

/// An owned or borrowed handle to a bound native object.
///
/// Owned objects are dropped together with the handle. Borrowed objects are
/// reached through a weak reference to an `Arc` the host keeps, so a
/// borrowed handle can never free the object, and a host that drops its
/// object simply leaves the handle dangling (reported as
/// [`AccessError::Dangling`]).
pub struct NativeObject {
    ownership: Ownership,
}

impl NativeObject {
    /// Take ownership of a freshly created object.
    pub fn owned<T: NativeBinding>(value: T) -> Self {
        let handle: NativeHandle = Arc::new(RwLock::new(value));
        Self {
            ownership: Ownership::Owned(handle),
        }
    }

    /// Borrow an object whose lifetime the host controls.
    pub fn borrowed<T: NativeBinding>(handle: &Arc<RwLock<T>>) -> Self {
        let handle: NativeHandle = handle.clone();
        Self {
            ownership: Ownership::Borrowed(Arc::downgrade(&handle)),
        }
    }

    /// Borrow through an existing weak handle.
    pub fn from_weak(handle: WeakNativeHandle) -> Self {
        Self {
            ownership: Ownership::Borrowed(handle),
        }
    }

    /// Whether dropping this handle drops the object.
    pub fn owns_object(&self) -> bool {
        matches!(self.ownership, Ownership::Owned(_))
    }

    /// Whether the object is still alive.
    pub fn is_live(&self) -> bool {
        match &self.ownership {
            Ownership::Owned(_) => true,
            Ownership::Borrowed(weak) => weak.strong_count() > 0,
        }
    }

    /// Whether both handles refer to the same object.
    pub fn same_object(&self, other: &NativeObject) -> bool {
        std::ptr::addr_eq(self.as_ptr(), other.as_ptr())
    }

    /// A non-owning handle to the object, for links into its fields.
    ///
    /// The handle is a plain [`std::sync::Weak`]. Upgrading it yields a
    /// strong [`NativeHandle`]; holding that beyond a single access keeps an
    /// owned object alive after its binding is dropped, so callers should
    /// keep only the weak handle and upgrade per access, as [`FieldLink`]
    /// does.
    ///
    /// [`FieldLink`]: crate::FieldLink
    pub fn downgrade(&self) -> WeakNativeHandle {
        match &self.ownership {
            Ownership::Owned(handle) => Arc::downgrade(handle),
            Ownership::Borrowed(weak) => weak.clone(),
        }
    }

    /// Type descriptor of the object, or void when it is gone.
    pub fn describe(&self) -> TypeDescriptor {
        self.read(|object| object.describe())
            .unwrap_or_else(|_| TypeDescriptor::void())
    }

    /// Run `f` with shared access to the object.
    pub fn read<R>(&self, f: impl FnOnce(&dyn NativeBinding) -> R) -> Result<R, AccessError> {
        let handle = self.upgrade()?;
        let guard = handle.read().map_err(|_| AccessError::LockFailed)?;
        Ok(f(&*guard))
    }

    /// Run `f` with exclusive access to the object.
    pub fn write<R>(
        &self,
        f: impl FnOnce(&mut dyn NativeBinding) -> R,
    ) -> Result<R, AccessError> {
        let handle = self.upgrade()?;
        let mut guard = handle.write().map_err(|_| AccessError::LockFailed)?;
        Ok(f(&mut *guard))
    }

    /// Duplicate this handle for a cloned symbol.
    ///
    /// Borrowed handles duplicate as borrowed: neither copy owns the object.
    /// Owned objects are duplicated through [`NativeBinding::clone_native`];
    /// `Ok(None)` means the type does not support it. A handle is never
    /// duplicated into a second owner.
    pub fn try_duplicate(&self) -> Result<Option<NativeObject>, AccessError> {
        match &self.ownership {
            Ownership::Owned(_) => {
                let copy = self.read(|object| object.clone_native())?;
                let copy = copy.filter(|copy| copy.owns_object() && !copy.same_object(self));
                trace!(cloned = copy.is_some(), "duplicating owned native object");
                Ok(copy)
            }
            Ownership::Borrowed(weak) => {
                trace!("duplicating borrowed native handle");
                Ok(Some(NativeObject::from_weak(weak.clone())))
            }
        }
    }

    fn upgrade(&self) -> Result<NativeHandle, AccessError> {
        match &self.ownership {
            Ownership::Owned(handle) => Ok(handle.clone()),
            Ownership::Borrowed(weak) => weak.upgrade().ok_or(AccessError::Dangling),
        }
    }

    fn as_ptr(&self) -> *const RwLock<dyn NativeBinding> {
        match &self.ownership {
            Ownership::Owned(handle) => Arc::as_ptr(handle),
            Ownership::Borrowed(weak) => weak.as_ptr(),
        }
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("owned", &self.owns_object())
            .field("live", &self.is_live())
            .field("type", &self.describe().name())
            .finish()
    }
}
