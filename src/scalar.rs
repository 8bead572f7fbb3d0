//! Scalar symbols: a single value stored locally or in linked storage.

use emplode_core::{AccessError, SymbolError, Value, ValueAccessor, ValueKind, WeakNativeHandle};

use crate::symbol::{SymbolKind, report};
use crate::{Symbol, SymbolInfo};

#[derive(Debug, Clone)]
enum Storage {
    Value(Value),
    Linked(Box<dyn ValueAccessor>),
}

/// A scalar configuration entry.
///
/// A local scalar's kind is fixed by its initial value and every assignment
/// converts into that kind. A linked scalar reads and writes through a
/// [`ValueAccessor`], so assigning to it writes into host storage.
///
/// # Example
///
/// ```
/// use emplode::Scalar;
/// use emplode_core::Value;
///
/// let mut rate = Scalar::new("rate", "mutation rate", 0.01);
/// rate.set(Value::Int(1)).unwrap();
/// assert_eq!(rate.value().unwrap(), Value::Double(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Scalar {
    info: SymbolInfo,
    storage: Storage,
}

impl Scalar {
    /// A scalar holding its own value.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            info: SymbolInfo::new(name, description),
            storage: Storage::Value(value.into()),
        }
    }

    /// A scalar whose storage lives outside the tree.
    pub fn linked(
        name: impl Into<String>,
        description: impl Into<String>,
        accessor: Box<dyn ValueAccessor>,
    ) -> Self {
        Self {
            info: SymbolInfo::new(name, description),
            storage: Storage::Linked(accessor),
        }
    }

    pub fn info(&self) -> &SymbolInfo {
        &self.info
    }

    pub(crate) fn info_mut(&mut self) -> &mut SymbolInfo {
        &mut self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Kind of value this scalar holds.
    pub fn kind(&self) -> ValueKind {
        match &self.storage {
            Storage::Value(value) => value.kind(),
            Storage::Linked(accessor) => accessor.kind(),
        }
    }

    /// Whether reads and writes go through a link.
    pub fn is_linked(&self) -> bool {
        matches!(self.storage, Storage::Linked(_))
    }

    /// Current value.
    pub fn value(&self) -> Result<Value, SymbolError> {
        match &self.storage {
            Storage::Value(value) => Ok(value.clone()),
            Storage::Linked(accessor) => accessor
                .read()
                .map_err(|err| report(SymbolError::access(self.info.label(), err))),
        }
    }

    /// Assign a value, converting it to this scalar's kind.
    ///
    /// A value that cannot be converted is rejected and the scalar keeps its
    /// previous value.
    pub fn set(&mut self, value: Value) -> Result<(), SymbolError> {
        match &mut self.storage {
            Storage::Value(current) => {
                let kind = current.kind();
                match value.convert(kind) {
                    Some(converted) => {
                        *current = converted;
                        Ok(())
                    }
                    None => Err(report(SymbolError::Conversion {
                        target: self.info.label(),
                        value: value.to_string(),
                        kind,
                    })),
                }
            }
            Storage::Linked(accessor) => accessor.write(&value).map_err(|err| {
                report(match err {
                    AccessError::Conversion { value, kind } => SymbolError::Conversion {
                        target: self.info.label(),
                        value,
                        kind,
                    },
                    other => SymbolError::access(self.info.label(), other),
                })
            }),
        }
    }

    /// Copy the value of another scalar into this one.
    pub fn copy_value(&mut self, src: &Symbol) -> Result<(), SymbolError> {
        let Symbol::Scalar(src) = src else {
            return Err(report(SymbolError::TypeMismatch {
                target: self.info.label(),
                origin: src.info().label(),
                expected: SymbolKind::Scalar.article_name(),
            }));
        };
        let value = src.value()?;
        self.set(value)
    }

    pub(crate) fn rebind(&mut self, from: &WeakNativeHandle, to: &WeakNativeHandle) {
        if let Storage::Linked(accessor) = &mut self.storage {
            if let Some(rebound) = accessor.rebind(from, to) {
                *accessor = rebound;
            }
        }
    }
}
