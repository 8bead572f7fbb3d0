//! Integration tests for binding host modules into a configuration tree.
//!
//! Modules are owned by the host and bound as borrowed objects. These tests
//! check that configuration writes reach the module, that the tree never
//! drops a module, and that object assignment goes through each type's copy
//! strategy.

use std::sync::{Arc, RwLock};

use emplode::{Scope, Symbol, SymbolPath};
use emplode_core::{SymbolError, Value};
use mabe_modules::{Module, OrganismType, SelectElite, register_module};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn path(s: &str) -> SymbolPath {
    SymbolPath::from(s)
}

fn value_at(root: &Scope, at: &str) -> Value {
    root.resolve(&path(at))
        .and_then(Symbol::as_scalar)
        .unwrap_or_else(|| panic!("no scalar at {at}"))
        .value()
        .unwrap()
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_register_uses_module_name() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::new("elite", "picks the best")));
    let mut root = Scope::new("root", "");

    let binding = register_module(&mut root, &elite).unwrap();
    assert!(!binding.owns_object());
    assert_eq!(binding.info().description(), "picks the best");
    assert_eq!(binding.scope().len(), 4);
    assert!(root.contains("elite"));
}

#[test]
fn test_register_twice_is_name_collision() {
    init_tracing();
    let first = Arc::new(RwLock::new(SelectElite::default()));
    let second = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");

    register_module(&mut root, &first).unwrap();
    let err = register_module(&mut root, &second).unwrap_err();
    assert!(err.is_name_collision());
    assert_eq!(root.len(), 1);
}

#[test]
fn test_setup_config_rejects_duplicate_field() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    let binding = register_module(&mut root, &elite).unwrap();

    let err = SelectElite::setup_config(binding).unwrap_err();
    assert!(err.is_name_collision());
    assert_eq!(binding.scope().len(), 4);
}

// =============================================================================
// Linked fields
// =============================================================================

#[test]
fn test_assign_value_writes_through_to_module() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();

    root.assign_value(&path("SelectElite.top_count"), Value::Int(10))
        .unwrap();
    root.assign_value(&path("SelectElite.fitness_trait"), Value::from("score"))
        .unwrap();
    root.assign_value(&path("SelectElite.target_pop"), Value::from("2"))
        .unwrap();

    let module = elite.read().unwrap();
    assert_eq!(module.top_count, 10);
    assert_eq!(module.fitness_trait, "score");
    assert_eq!(module.pop_id, 2);
}

#[test]
fn test_host_writes_are_visible_in_tree() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();

    elite.write().unwrap().copy_count = 3;
    assert_eq!(value_at(&root, "SelectElite.copy_count"), Value::Int(3));
}

#[test]
fn test_negative_count_is_rejected() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();

    let err = root
        .assign_value(&path("SelectElite.top_count"), Value::Int(-1))
        .unwrap_err();
    assert!(matches!(err, SymbolError::Conversion { .. }));
    assert_eq!(elite.read().unwrap().top_count, 1);
}

#[test]
fn test_assign_between_modules() {
    init_tracing();
    let a = Arc::new(RwLock::new(SelectElite::new("a", "")));
    let b = Arc::new(RwLock::new(SelectElite::new("b", "")));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &a).unwrap();
    register_module(&mut root, &b).unwrap();

    root.assign_value(&path("a.top_count"), Value::Int(7)).unwrap();
    root.assign(&path("b"), &path("a")).unwrap();

    let b = b.read().unwrap();
    assert_eq!(b.top_count, 7);
    assert_eq!(b.name(), "b");
}

// =============================================================================
// Lifetimes
// =============================================================================

#[test]
fn test_dropping_tree_keeps_module_alive() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    {
        let mut root = Scope::new("root", "");
        register_module(&mut root, &elite).unwrap();
        root.assign_value(&path("SelectElite.copy_count"), Value::Int(5))
            .unwrap();
    }

    assert_eq!(Arc::strong_count(&elite), 1);
    assert_eq!(elite.read().unwrap().copy_count, 5);
}

#[test]
fn test_dropping_module_unbinds_object() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();
    drop(elite);

    let binding = root.lookup("SelectElite").and_then(Symbol::as_object).unwrap();
    assert!(!binding.is_bound());
    let err = binding.with_native(|m: &SelectElite| m.top_count).unwrap_err();
    assert!(matches!(err, SymbolError::Unbound { .. }));

    let err = root
        .assign_value(&path("SelectElite.top_count"), Value::Int(2))
        .unwrap_err();
    assert!(matches!(err, SymbolError::Access { .. }));
}

#[test]
fn test_clone_of_borrowed_module_stays_borrowed() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();

    let copy = root.try_clone().unwrap();
    let cloned = copy.lookup("SelectElite").and_then(Symbol::as_object).unwrap();
    assert!(!cloned.owns_object());

    drop(copy);
    assert_eq!(Arc::strong_count(&elite), 1);
    assert_eq!(value_at(&root, "SelectElite.top_count"), Value::Int(1));
}

// =============================================================================
// Organism types
// =============================================================================

fn organism(name: &str, genome_size: i64) -> OrganismType {
    let mut org = OrganismType::new(name);
    org.set_var("genome_size", genome_size);
    org
}

#[test]
fn test_organism_assignment_uses_custom_copy() {
    init_tracing();
    let mut root = Scope::new("root", "");
    root.add_owned_object("bits", "", organism("Bits", 100)).unwrap();
    root.add_owned_object("wide", "", organism("Wide", 400)).unwrap();

    root.assign(&path("bits"), &path("wide")).unwrap();

    let bits = root.lookup("bits").and_then(Symbol::as_object).unwrap();
    let (name, size) = bits
        .with_native(|org: &OrganismType| (org.name().to_string(), org.var("genome_size").cloned()))
        .unwrap();
    assert_eq!(name, "Bits");
    assert_eq!(size, Some(Value::Int(400)));
}

#[test]
fn test_organism_into_module_is_incompatible() {
    init_tracing();
    let elite = Arc::new(RwLock::new(SelectElite::default()));
    let mut root = Scope::new("root", "");
    register_module(&mut root, &elite).unwrap();
    root.add_owned_object("bits", "", organism("Bits", 100)).unwrap();

    let err = root.assign(&path("SelectElite"), &path("bits")).unwrap_err();
    assert!(err.is_incompatible_native_type());
    assert_eq!(elite.read().unwrap().top_count, 1);
}

#[test]
fn test_owned_organism_clone_is_independent() {
    init_tracing();
    let mut root = Scope::new("root", "");
    root.add_owned_object("bits", "", organism("Bits", 100)).unwrap();

    let copy = root.try_clone().unwrap();
    root.lookup("bits")
        .and_then(Symbol::as_object)
        .unwrap()
        .with_native_mut(|org: &mut OrganismType| org.set_var("genome_size", 1))
        .unwrap();

    let cloned = copy.lookup("bits").and_then(Symbol::as_object).unwrap();
    assert!(cloned.owns_object());
    let size = cloned
        .with_native(|org: &OrganismType| org.var("genome_size").cloned())
        .unwrap();
    assert_eq!(size, Some(Value::Int(100)));
}
