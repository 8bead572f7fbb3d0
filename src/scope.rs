//! Scopes: ordered namespaces of exclusively owned child symbols.
//!
//! A [`Scope`] is both a symbol and the factory for its children. Every
//! registration goes through [`Scope::insert`], which rejects duplicate or
//! unaddressable names (empty, or containing `.`) and re-roots the parent
//! paths of the inserted subtree.
//!
//! # Example
//!
//! ```
//! use emplode::{Scope, SymbolPath};
//! use emplode_core::Value;
//!
//! let mut root = Scope::new("root", "");
//! let world = root.add_scope("world", "simulation settings").unwrap();
//! world.add_scalar("max_updates", "updates before exit", 1000).unwrap();
//! world.add_scalar("random_seed", "0 means time-based", 0).unwrap();
//!
//! let path = SymbolPath::from("world.max_updates");
//! root.assign_value(&path, Value::from("500")).unwrap();
//!
//! let updates = root.resolve(&path).unwrap().as_scalar().unwrap();
//! assert_eq!(updates.value().unwrap(), Value::Int(500));
//! ```

use std::sync::{Arc, RwLock};

use emplode_core::{
    NativeBinding, NativeObject, ScalarType, SymbolError, Value, ValueAccessor, WeakNativeHandle,
};
use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxBuildHasher;
use tracing::{debug, instrument, trace};

use crate::symbol::report;
use crate::{
    CopyPolicy, Function, ObjectBinding, Scalar, Symbol, SymbolInfo, SymbolPath, SymbolVariant,
};

/// Symbol table keyed by name, in insertion order.
pub type SymbolTable = IndexMap<String, Symbol, FxBuildHasher>;

/// A namespace of uniquely named, exclusively owned child symbols.
#[derive(Debug)]
pub struct Scope {
    info: SymbolInfo,
    children: SymbolTable,
    copy_policy: CopyPolicy,
}

impl Scope {
    /// Create an empty, detached scope. Used for the root of a tree.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            info: SymbolInfo::new(name, description),
            children: SymbolTable::default(),
            copy_policy: CopyPolicy::default(),
        }
    }

    /// Set the copy policy (builder form).
    pub fn with_copy_policy(mut self, policy: CopyPolicy) -> Self {
        self.copy_policy = policy;
        self
    }

    pub fn copy_policy(&self) -> CopyPolicy {
        self.copy_policy
    }

    pub fn set_copy_policy(&mut self, policy: CopyPolicy) {
        self.copy_policy = policy;
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

    pub fn description(&self) -> &str {
        self.info.description()
    }

    /// Full dotted path from the root.
    pub fn path(&self) -> SymbolPath {
        self.info.path()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Insert an already-built symbol, taking ownership of it.
    ///
    /// Fails with `InvalidName` for an empty name or one containing `.`, and
    /// with `NameCollision` if the name is taken. Either way the existing
    /// children are left untouched and `symbol` is dropped.
    pub fn insert(&mut self, mut symbol: Symbol) -> Result<&mut Symbol, SymbolError> {
        self.ensure_valid_name(symbol.name())?;
        let path = self.info.path();
        match self.children.entry(symbol.name().to_string()) {
            Entry::Occupied(entry) => Err(report(SymbolError::NameCollision {
                scope: self.info.label(),
                name: entry.key().clone(),
            })),
            Entry::Vacant(slot) => {
                symbol.reroot(Some(path));
                debug!(
                    scope = %self.info.label(),
                    name = %slot.key(),
                    kind = %symbol.kind(),
                    "registered symbol"
                );
                Ok(slot.insert(symbol))
            }
        }
    }

    /// Register a child of any variant and return it with its concrete type.
    pub fn add_child<T: SymbolVariant>(&mut self, child: T) -> Result<&mut T, SymbolError> {
        let symbol = self.insert(child.into_symbol())?;
        match T::from_symbol_mut(symbol) {
            Some(child) => Ok(child),
            None => unreachable!("symbol changed variant during registration"),
        }
    }

    /// Register a nested scope inheriting this scope's copy policy.
    pub fn add_scope(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Scope, SymbolError> {
        let scope = Scope::new(name, description).with_copy_policy(self.copy_policy);
        self.add_child(scope)
    }

    /// Register a scalar holding its own value.
    pub fn add_scalar(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Scalar, SymbolError> {
        self.add_child(Scalar::new(name, description, value))
    }

    /// Register an object binding for `native`.
    ///
    /// Whether the tree owns the object is carried by the handle: see
    /// [`NativeObject::owned`] and [`NativeObject::borrowed`].
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        native: NativeObject,
    ) -> Result<&mut ObjectBinding, SymbolError> {
        let mut object = ObjectBinding::new(name, description, native);
        object.scope_mut().set_copy_policy(self.copy_policy);
        debug!(
            name = %object.name(),
            owned = object.owns_object(),
            native_type = %object.object_type(),
            "binding native object"
        );
        self.add_child(object)
    }

    /// Register an object the tree will own and drop.
    pub fn add_owned_object<T: NativeBinding>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        value: T,
    ) -> Result<&mut ObjectBinding, SymbolError> {
        self.add_object(name, description, NativeObject::owned(value))
    }

    /// Register an object whose lifetime the host controls.
    pub fn add_borrowed_object<T: NativeBinding>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handle: &Arc<RwLock<T>>,
    ) -> Result<&mut ObjectBinding, SymbolError> {
        self.add_object(name, description, NativeObject::borrowed(handle))
    }

    /// Register a function.
    pub fn add_function<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        arity: Option<usize>,
        callable: F,
    ) -> Result<&mut Function, SymbolError>
    where
        F: Fn(&[Value]) -> Result<Value, SymbolError> + Send + Sync + 'static,
    {
        self.add_child(Function::new(name, description, arity, callable))
    }

    /// Register a scalar linked to a shared cell the host keeps.
    ///
    /// `default` is written into the cell once the name is known to be free.
    pub fn link_cell<T: ScalarType>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default: T,
        cell: &Arc<RwLock<T>>,
    ) -> Result<&mut Scalar, SymbolError> {
        let name = name.into();
        self.ensure_vacant(&name)?;
        let accessor: Box<dyn ValueAccessor> = Box::new(Arc::clone(cell));
        default
            .checked_value()
            .and_then(|value| accessor.write(&value))
            .map_err(|err| report(SymbolError::access(self.child_label(&name), err)))?;
        self.add_child(Scalar::linked(name, description, accessor))
    }

    /// Detach and return a child, e.g. to unwind a partial build.
    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        let mut symbol = self.children.shift_remove(name)?;
        debug!(scope = %self.info.label(), name = %name, "removed symbol");
        symbol.reroot(None);
        Some(symbol)
    }

    pub(crate) fn ensure_vacant(&self, name: &str) -> Result<(), SymbolError> {
        self.ensure_valid_name(name)?;
        if self.children.contains_key(name) {
            return Err(report(SymbolError::NameCollision {
                scope: self.info.label(),
                name: name.to_string(),
            }));
        }
        Ok(())
    }

    fn ensure_valid_name(&self, name: &str) -> Result<(), SymbolError> {
        if name.is_empty() || name.contains('.') {
            return Err(report(SymbolError::InvalidName {
                scope: self.info.label(),
                name: name.to_string(),
            }));
        }
        Ok(())
    }

    pub(crate) fn child_label(&self, name: &str) -> String {
        self.info.path().child(name).to_string()
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Find a child in this scope only.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.children.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.children.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.children.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    /// Child names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Walk `path` downward from this scope.
    pub fn resolve(&self, path: &SymbolPath) -> Option<&Symbol> {
        let (parent, name) = path.split_last()?;
        self.resolve_scope(&parent)?.lookup(name)
    }

    pub fn resolve_mut(&mut self, path: &SymbolPath) -> Option<&mut Symbol> {
        let (parent, name) = path.split_last()?;
        self.resolve_scope_mut(&parent)?.lookup_mut(name)
    }

    /// The scope at `path`; the empty path is this scope.
    pub fn resolve_scope(&self, path: &SymbolPath) -> Option<&Scope> {
        let mut scope = self;
        for segment in path.segments() {
            scope = scope.children.get(segment.as_str())?.as_scope()?;
        }
        Some(scope)
    }

    pub fn resolve_scope_mut(&mut self, path: &SymbolPath) -> Option<&mut Scope> {
        let mut scope = self;
        for segment in path.segments() {
            scope = scope.children.get_mut(segment.as_str())?.as_scope_mut()?;
        }
        Some(scope)
    }

    /// Find `name` starting in the scope at `from` and walking outward.
    ///
    /// `self` is taken to be the root and `from` a path below it. The first
    /// enclosing scope that defines `name` wins.
    pub fn lookup_lexical(&self, from: &SymbolPath, name: &str) -> Option<&Symbol> {
        let mut current = Some(from.clone());
        while let Some(path) = current {
            if let Some(found) = self.resolve_scope(&path).and_then(|s| s.lookup(name)) {
                return Some(found);
            }
            current = path.parent();
        }
        None
    }

    // ==========================================================================
    // Assignment
    // ==========================================================================

    /// Copy the value at `source_path` into the symbol at `target_path`.
    ///
    /// Both paths are relative to this scope and may lie in the same tree.
    /// The target is detached while the source is read and put back at its
    /// original position afterwards, whether or not the copy succeeded.
    #[instrument(level = "debug", skip_all, fields(dst = %target_path, src = %source_path))]
    pub fn assign(
        &mut self,
        target_path: &SymbolPath,
        source_path: &SymbolPath,
    ) -> Result<(), SymbolError> {
        let not_found = |path: &SymbolPath| report(SymbolError::NotFound { path: path.to_string() });

        if target_path == source_path {
            return match self.resolve(target_path) {
                Some(_) => Ok(()),
                None => Err(not_found(target_path)),
            };
        }
        if target_path.is_prefix_of(source_path) || source_path.is_prefix_of(target_path) {
            return Err(report(SymbolError::OverlappingAssignment {
                target: target_path.to_string(),
                origin: source_path.to_string(),
            }));
        }

        let Some((parent_path, name)) = target_path.split_last() else {
            return Err(not_found(target_path));
        };
        let parent = self
            .resolve_scope_mut(&parent_path)
            .ok_or_else(|| not_found(target_path))?;
        let Some((index, key, mut target)) = parent.children.shift_remove_full(name) else {
            return Err(not_found(target_path));
        };

        let result = match self.resolve(source_path) {
            Some(source) => target.copy_value(source),
            None => Err(not_found(source_path)),
        };

        let Some(parent) = self.resolve_scope_mut(&parent_path) else {
            unreachable!("scope '{parent_path}' vanished during assignment");
        };
        parent.children.shift_insert(index, key, target);
        result
    }

    /// Assign a literal value to the scalar at `path`.
    #[instrument(level = "debug", skip_all, fields(dst = %path, value = %value))]
    pub fn assign_value(&mut self, path: &SymbolPath, value: Value) -> Result<(), SymbolError> {
        let Some(target) = self.resolve_mut(path) else {
            return Err(report(SymbolError::NotFound {
                path: path.to_string(),
            }));
        };
        match target {
            Symbol::Scalar(scalar) => scalar.set(value),
            other => Err(report(SymbolError::TypeMismatch {
                target: other.info().label(),
                origin: value.to_string(),
                expected: other.kind().article_name(),
            })),
        }
    }

    // ==========================================================================
    // Value copy and clone
    // ==========================================================================

    /// Copy values child by child from `src`.
    ///
    /// Under [`CopyPolicy::MatchingNames`] children present on only one side
    /// are skipped. Under [`CopyPolicy::SameShape`] the names must match
    /// recursively, checked before anything is written. The first failing
    /// child stops the copy; siblings copied before it stay copied.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn copy_value(&mut self, src: &Scope) -> Result<(), SymbolError> {
        if self.copy_policy.requires_same_shape() {
            check_shape(self, src)?;
        }
        trace!(
            dst = %self.info.label(),
            src = %src.info.label(),
            policy = ?self.copy_policy,
            "copy scope"
        );
        for (name, child) in self.children.iter_mut() {
            if let Some(source) = src.children.get(name) {
                child.copy_value(source)?;
            }
        }
        Ok(())
    }

    /// Deep copy of this scope and every child.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn try_clone(&self) -> Result<Scope, SymbolError> {
        let mut children =
            SymbolTable::with_capacity_and_hasher(self.children.len(), FxBuildHasher);
        for (name, child) in &self.children {
            children.insert(name.clone(), child.try_clone()?);
        }
        Ok(Scope {
            info: self.info.clone(),
            children,
            copy_policy: self.copy_policy,
        })
    }

    pub(crate) fn reroot_children(&mut self, path: &SymbolPath) {
        for child in self.children.values_mut() {
            child.reroot(Some(path.clone()));
        }
    }

    pub(crate) fn rebind_links(&mut self, from: &WeakNativeHandle, to: &WeakNativeHandle) {
        for child in self.children.values_mut() {
            child.rebind_links(from, to);
        }
    }
}

fn check_shape(dst: &Scope, src: &Scope) -> Result<(), SymbolError> {
    let mismatch = |entry: &str| {
        report(SymbolError::ShapeMismatch {
            target: dst.info.label(),
            origin: src.info.label(),
            entry: entry.to_string(),
        })
    };
    if let Some(name) = dst.names().find(|name| !src.contains(name)) {
        return Err(mismatch(name));
    }
    if let Some(name) = src.names().find(|name| !dst.contains(name)) {
        return Err(mismatch(name));
    }
    for (name, child) in dst.iter() {
        let pair = (child.as_scope(), src.lookup(name).and_then(Symbol::as_scope));
        if let (Some(dst), Some(src)) = pair {
            check_shape(dst, src)?;
        }
    }
    Ok(())
}
