//! The polymorphic symbol node and its shared metadata.

use std::fmt;

use bitflags::bitflags;
use emplode_core::{SymbolError, WeakNativeHandle};
use tracing::{trace, warn};

use crate::{Function, ObjectBinding, Scalar, Scope, SymbolPath};

/// Log a configuration-author error at the point it is reported.
pub(crate) fn report(err: SymbolError) -> SymbolError {
    warn!("{err}");
    err
}

bitflags! {
    /// Capabilities a symbol answers to.
    ///
    /// ```
    /// use emplode::Capabilities;
    ///
    /// let object = Capabilities::SCOPE | Capabilities::OBJECT;
    /// assert!(object.contains(Capabilities::SCOPE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Owns a namespace of child symbols.
        const SCOPE = 1 << 0;
        /// Bound to a native host object.
        const OBJECT = 1 << 1;
        /// Holds a scalar value.
        const VALUE = 1 << 2;
        /// Can be invoked.
        const CALLABLE = 1 << 3;
    }
}

/// Discriminator of a symbol. Fixed for the symbol's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Scalar,
    Scope,
    Object,
    Function,
}

impl SymbolKind {
    /// Lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Scalar => "scalar",
            SymbolKind::Scope => "scope",
            SymbolKind::Object => "object",
            SymbolKind::Function => "function",
        }
    }

    /// Name with an article, as used in type-mismatch diagnostics.
    pub fn article_name(self) -> &'static str {
        match self {
            SymbolKind::Scalar => "a scalar",
            SymbolKind::Scope => "a scope",
            SymbolKind::Object => "an object",
            SymbolKind::Function => "a function",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name, description and parent back-reference shared by every symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    name: String,
    description: String,
    parent: Option<SymbolPath>,
}

impl SymbolInfo {
    /// Metadata for a detached symbol.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parent: None,
        }
    }

    /// Name, unique within the enclosing scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation only.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Path of the enclosing scope; `None` for a root or detached symbol.
    pub fn parent(&self) -> Option<&SymbolPath> {
        self.parent.as_ref()
    }

    /// Full path of this symbol. A root or detached symbol has the root path.
    pub fn path(&self) -> SymbolPath {
        match &self.parent {
            Some(parent) => parent.child(self.name.clone()),
            None => SymbolPath::root(),
        }
    }

    /// Label used in diagnostics: the full path, or the bare name when the
    /// symbol is not attached below a root.
    pub fn label(&self) -> String {
        match &self.parent {
            Some(parent) => parent.child(self.name.clone()).to_string(),
            None => self.name.clone(),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<SymbolPath>) {
        self.parent = parent;
    }
}

/// A named, described node in the configuration tree.
#[derive(Debug)]
pub enum Symbol {
    /// A single value, stored locally or linked to external storage.
    Scalar(Scalar),
    /// A namespace of child symbols.
    Scope(Scope),
    /// A scope bound to a native host object.
    Object(ObjectBinding),
    /// A callable.
    Function(Function),
}

impl Symbol {
    /// Shared metadata.
    pub fn info(&self) -> &SymbolInfo {
        match self {
            Symbol::Scalar(s) => s.info(),
            Symbol::Scope(s) => s.info(),
            Symbol::Object(o) => o.info(),
            Symbol::Function(f) => f.info(),
        }
    }

    pub(crate) fn info_mut(&mut self) -> &mut SymbolInfo {
        match self {
            Symbol::Scalar(s) => s.info_mut(),
            Symbol::Scope(s) => s.info_mut(),
            Symbol::Object(o) => o.scope_mut().info_mut(),
            Symbol::Function(f) => f.info_mut(),
        }
    }

    pub fn name(&self) -> &str {
        self.info().name()
    }

    pub fn description(&self) -> &str {
        self.info().description()
    }

    /// Full dotted path from the root.
    pub fn path(&self) -> SymbolPath {
        self.info().path()
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Scalar(_) => SymbolKind::Scalar,
            Symbol::Scope(_) => SymbolKind::Scope,
            Symbol::Object(_) => SymbolKind::Object,
            Symbol::Function(_) => SymbolKind::Function,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Symbol::Scalar(_) => Capabilities::VALUE,
            Symbol::Scope(_) => Capabilities::SCOPE,
            Symbol::Object(_) => Capabilities::SCOPE | Capabilities::OBJECT,
            Symbol::Function(_) => Capabilities::CALLABLE,
        }
    }

    /// Whether this symbol owns a namespace (scopes and objects).
    pub fn is_scope(&self) -> bool {
        self.capabilities().contains(Capabilities::SCOPE)
    }

    /// Whether this symbol is bound to a native object.
    pub fn is_object(&self) -> bool {
        self.capabilities().contains(Capabilities::OBJECT)
    }

    /// The namespace of a scope or object.
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Symbol::Scope(s) => Some(s),
            Symbol::Object(o) => Some(o.scope()),
            _ => None,
        }
    }

    pub fn as_scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Symbol::Scope(s) => Some(s),
            Symbol::Object(o) => Some(o.scope_mut()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectBinding> {
        match self {
            Symbol::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectBinding> {
        match self {
            Symbol::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Symbol::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Symbol::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Overwrite this symbol's value from `src`.
    ///
    /// On a type mismatch the symbol is left unchanged. Composite symbols
    /// copy child by child, so a failure partway leaves earlier children
    /// copied.
    pub fn copy_value(&mut self, src: &Symbol) -> Result<(), SymbolError> {
        trace!(dst = %self.info().label(), src = %src.info().label(), "copy value");
        match self {
            Symbol::Scalar(dst) => dst.copy_value(src),
            Symbol::Function(dst) => dst.copy_value(src),
            Symbol::Object(dst) => dst.copy_value(src),
            Symbol::Scope(dst) => match src.as_scope() {
                Some(src) => dst.copy_value(src),
                None => Err(report(SymbolError::TypeMismatch {
                    target: dst.info().label(),
                    origin: src.info().label(),
                    expected: SymbolKind::Scope.article_name(),
                })),
            },
        }
    }

    /// Structurally equivalent, independently owned copy.
    ///
    /// Fails if the subtree contains an owned native object whose type does
    /// not support cloning.
    pub fn try_clone(&self) -> Result<Symbol, SymbolError> {
        Ok(match self {
            Symbol::Scalar(s) => Symbol::Scalar(s.clone()),
            Symbol::Scope(s) => Symbol::Scope(s.try_clone()?),
            Symbol::Object(o) => Symbol::Object(o.try_clone()?),
            Symbol::Function(f) => Symbol::Function(f.clone()),
        })
    }

    /// Set the parent path and re-root every descendant below it.
    pub(crate) fn reroot(&mut self, parent: Option<SymbolPath>) {
        self.info_mut().set_parent(parent);
        let path = self.path();
        if let Some(scope) = self.as_scope_mut() {
            scope.reroot_children(&path);
        }
    }

    /// Point field links that refer into `from` at `to`.
    pub(crate) fn rebind_links(&mut self, from: &WeakNativeHandle, to: &WeakNativeHandle) {
        match self {
            Symbol::Scalar(s) => s.rebind(from, to),
            Symbol::Scope(s) => s.rebind_links(from, to),
            Symbol::Object(o) => o.scope_mut().rebind_links(from, to),
            Symbol::Function(_) => {}
        }
    }
}

/// A concrete symbol type that can be registered in a scope.
pub trait SymbolVariant: Sized {
    /// Metadata of the symbol.
    fn info(&self) -> &SymbolInfo;

    /// Wrap into a [`Symbol`].
    fn into_symbol(self) -> Symbol;

    /// View a [`Symbol`] as this variant.
    fn from_symbol_mut(symbol: &mut Symbol) -> Option<&mut Self>;
}

macro_rules! impl_symbol_variant {
    ($ty:ty, $variant:ident) => {
        impl SymbolVariant for $ty {
            fn info(&self) -> &SymbolInfo {
                <$ty>::info(self)
            }

            fn into_symbol(self) -> Symbol {
                Symbol::$variant(self)
            }

            fn from_symbol_mut(symbol: &mut Symbol) -> Option<&mut Self> {
                match symbol {
                    Symbol::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Symbol {
            fn from(value: $ty) -> Self {
                Symbol::$variant(value)
            }
        }
    };
}

impl_symbol_variant!(Scalar, Scalar);
impl_symbol_variant!(Scope, Scope);
impl_symbol_variant!(ObjectBinding, Object);
impl_symbol_variant!(Function, Function);
