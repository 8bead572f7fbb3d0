//! Organism types: a named bag of configurable variables.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use emplode_core::{NativeBinding, NativeObject, NativeType, TypeDescriptor, Value};

/// Per-type variables, in declaration order.
pub type VarMap = IndexMap<String, Value, FxBuildHasher>;

/// A kind of organism the simulation can instantiate.
///
/// Assigning one organism type to another copies its variables but keeps
/// the destination's name.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganismType {
    name: String,
    vars: VarMap,
}

impl OrganismType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: VarMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Set a variable, returning the previous value.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn vars(&self) -> &VarMap {
        &self.vars
    }
}

impl NativeType for OrganismType {
    fn type_name() -> &'static str {
        "OrganismType"
    }
}

impl NativeBinding for OrganismType {
    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>().with_copy_strategy(copy_vars)
    }

    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
        match other.downcast_ref::<OrganismType>() {
            Some(other) => {
                self.clone_from(other);
                true
            }
            None => false,
        }
    }

    fn clone_native(&self) -> Option<NativeObject> {
        Some(NativeObject::owned(self.clone()))
    }
}

fn copy_vars(dst: &mut dyn NativeBinding, src: &dyn NativeBinding) -> bool {
    let Some(src) = src.downcast_ref::<OrganismType>() else {
        return false;
    };
    match dst.downcast_mut::<OrganismType>() {
        Some(dst) => {
            dst.vars.clone_from(&src.vars);
            true
        }
        None => false,
    }
}
