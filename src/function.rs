//! Function symbols.

use std::fmt;
use std::sync::Arc;

use emplode_core::{SymbolError, Value};

use crate::symbol::{SymbolKind, report};
use crate::{Symbol, SymbolInfo};

/// Shared callable behind a function symbol.
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> Result<Value, SymbolError> + Send + Sync>;

/// A callable configuration entry.
///
/// Functions are immutable, so clones share the callable.
#[derive(Clone)]
pub struct Function {
    info: SymbolInfo,
    callable: NativeFunction,
    arity: Option<usize>,
}

impl Function {
    /// Create a function. `arity` of `None` accepts any number of arguments.
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        arity: Option<usize>,
        callable: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, SymbolError> + Send + Sync + 'static,
    {
        Self {
            info: SymbolInfo::new(name, description),
            callable: Arc::new(callable),
            arity,
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

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> Result<Value, SymbolError> {
        if let Some(expected) = self.arity {
            if expected != args.len() {
                return Err(report(SymbolError::ArityMismatch {
                    name: self.info.label(),
                    expected,
                    actual: args.len(),
                }));
            }
        }
        (self.callable)(args)
    }

    /// Replace the callable with the one from another function.
    pub fn copy_value(&mut self, src: &Symbol) -> Result<(), SymbolError> {
        let Symbol::Function(src) = src else {
            return Err(report(SymbolError::TypeMismatch {
                target: self.info.label(),
                origin: src.info().label(),
                expected: SymbolKind::Function.article_name(),
            }));
        };
        self.callable = Arc::clone(&src.callable);
        self.arity = src.arity;
        Ok(())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("info", &self.info)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
