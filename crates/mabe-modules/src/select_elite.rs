//! Elite selection module.
//!
//! Only the configurable surface lives here. Running the selection is the
//! simulation runtime's job.

use emplode::ObjectBinding;
use emplode_core::{NativeBinding, NativeType, SymbolError, TypeDescriptor};

use crate::Module;

/// Replicates the top organisms of a population by fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectElite {
    name: String,
    description: String,
    /// Which trait should we select on?
    pub fitness_trait: String,
    /// Top how-many should we select?
    pub top_count: usize,
    /// How many copies of each should we make?
    pub copy_count: usize,
    /// Which population are we selecting from?
    pub pop_id: i32,
}

impl SelectElite {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fitness_trait: "fitness".to_string(),
            top_count: 1,
            copy_count: 1,
            pop_id: 0,
        }
    }
}

impl Default for SelectElite {
    fn default() -> Self {
        Self::new(
            "SelectElite",
            "Module to choose the top fitness organisms for replication.",
        )
    }
}

impl NativeType for SelectElite {
    fn type_name() -> &'static str {
        "SelectElite"
    }
}

impl NativeBinding for SelectElite {
    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    /// Copies the selection settings. Name and description stay.
    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
        let Some(other) = other.downcast_ref::<SelectElite>() else {
            return false;
        };
        self.fitness_trait = other.fitness_trait.clone();
        self.top_count = other.top_count;
        self.copy_count = other.copy_count;
        self.pop_id = other.pop_id;
        true
    }
}

impl Module for SelectElite {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn setup_config(binding: &mut ObjectBinding) -> Result<(), SymbolError> {
        binding.link_field::<Self, i32>(
            "target_pop",
            "Which population should we select parents from?",
            0,
            |m| &mut m.pop_id,
        )?;
        binding.link_field::<Self, usize>(
            "top_count",
            "Number of top-fitness orgs to be replicated",
            1,
            |m| &mut m.top_count,
        )?;
        binding.link_field::<Self, usize>(
            "copy_count",
            "Number of copies to make of replicated organisms",
            1,
            |m| &mut m.copy_count,
        )?;
        binding.link_field::<Self, String>(
            "fitness_trait",
            "Which trait provides the fitness value to use?",
            "fitness".to_string(),
            |m| &mut m.fitness_trait,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emplode::Scope;
    use emplode_core::Value;
    use std::sync::{Arc, RwLock};

    #[test]
    fn defaults() {
        let elite = SelectElite::default();
        assert_eq!(elite.name(), "SelectElite");
        assert_eq!(elite.fitness_trait, "fitness");
        assert_eq!((elite.top_count, elite.copy_count, elite.pop_id), (1, 1, 0));
    }

    #[test]
    fn setup_links_four_entries() {
        let module = Arc::new(RwLock::new(SelectElite::default()));
        let mut root = Scope::new("root", "");
        let binding = root.add_borrowed_object("elite", "", &module).unwrap();
        SelectElite::setup_config(binding).unwrap();

        let names: Vec<_> = binding.scope().names().collect();
        assert_eq!(names, ["target_pop", "top_count", "copy_count", "fitness_trait"]);
        let top = binding.scope().lookup("top_count").unwrap().as_scalar().unwrap();
        assert!(top.is_linked());
        assert_eq!(top.value(), Ok(Value::Int(1)));
    }

    #[test]
    fn setup_overwrites_fields_with_defaults() {
        let mut custom = SelectElite::default();
        custom.top_count = 9;
        let module = Arc::new(RwLock::new(custom));
        let mut root = Scope::new("root", "");
        let binding = root.add_borrowed_object("elite", "", &module).unwrap();
        SelectElite::setup_config(binding).unwrap();

        assert_eq!(module.read().unwrap().top_count, 1);
    }

    #[test]
    fn default_copy_keeps_identity() {
        let mut dst = SelectElite::new("a", "first");
        let mut src = SelectElite::new("b", "second");
        src.top_count = 5;
        src.fitness_trait = "score".to_string();

        assert!(dst.default_copy(&src));
        assert_eq!(dst.name(), "a");
        assert_eq!(dst.top_count, 5);
        assert_eq!(dst.fitness_trait, "score");
    }
}
