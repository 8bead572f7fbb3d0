//! Ownership of bound native objects across drop, move and clone.
//!
//! A binding that owns its object drops it exactly once; a binding that
//! borrows never drops it.

mod common;

use std::sync::{Arc, RwLock};

use common::{Counter, DropCounter, Socket, add_counter, init_tracing, path, value_at};
use emplode::prelude::*;

// =============================================================================
// Drop
// =============================================================================

#[test]
fn test_owned_object_dropped_once() {
    init_tracing();
    let drops = DropCounter::default();
    {
        let mut root = Scope::new("root", "");
        root.add_owned_object("counter", "", Counter::new(0, &drops))
            .unwrap();
        assert_eq!(drops.count(), 0);
    }
    assert_eq!(drops.count(), 1);
}

#[test]
fn test_borrowed_object_never_dropped() {
    init_tracing();
    let drops = DropCounter::default();
    let host = Arc::new(RwLock::new(Counter::new(0, &drops)));
    {
        let mut root = Scope::new("root", "");
        root.add_borrowed_object("counter", "", &host).unwrap();
    }
    assert_eq!(drops.count(), 0);
    assert_eq!(Arc::strong_count(&host), 1);

    drop(host);
    assert_eq!(drops.count(), 1);
}

#[test]
fn test_removed_owned_object_dropped_with_symbol() {
    init_tracing();
    let drops = DropCounter::default();
    let mut root = Scope::new("root", "");
    add_counter(&mut root, "counter", 0, &drops);

    let removed = root.remove("counter").unwrap();
    assert_eq!(drops.count(), 0);
    drop(removed);
    assert_eq!(drops.count(), 1);
}

#[test]
fn test_end_to_end_counter() {
    init_tracing();
    let drops = DropCounter::default();
    let mut root = Scope::new("root", "");
    add_counter(&mut root, "counter", 0, &drops);

    root.assign_value(&path("counter.count"), Value::Int(5))
        .unwrap();

    let counter = root.lookup("counter").and_then(Symbol::as_object).unwrap();
    assert_eq!(counter.with_native(|c: &Counter| c.count).unwrap(), 5);
    assert_eq!(value_at(&root, "counter.count"), Value::Int(5));

    drop(root);
    assert_eq!(drops.count(), 1);
}

// =============================================================================
// Move
// =============================================================================

#[test]
fn test_take_transfers_ownership() {
    init_tracing();
    let drops = DropCounter::default();
    let mut root = Scope::new("root", "");
    add_counter(&mut root, "counter", 3, &drops);

    let source = root
        .lookup_mut("counter")
        .and_then(Symbol::as_object_mut)
        .unwrap();
    let moved = source.take();

    assert!(!source.is_bound());
    assert!(!source.owns_object());
    assert!(source.scope().is_empty());
    assert_eq!(source.object_type(), TypeDescriptor::void());

    assert!(moved.owns_object());
    assert_eq!(moved.name(), "counter");
    assert_eq!(moved.scope().len(), 1);

    drop(root);
    assert_eq!(drops.count(), 0);

    assert_eq!(moved.with_native(|c: &Counter| c.count).unwrap(), 3);
    drop(moved);
    assert_eq!(drops.count(), 1);
}

#[test]
fn test_taken_binding_reports_unbound() {
    init_tracing();
    let drops = DropCounter::default();
    let mut binding = ObjectBinding::owned("counter", "", Counter::new(1, &drops));
    let _moved = binding.take();

    let err = binding.with_object(|_| ()).unwrap_err();
    assert!(matches!(err, SymbolError::Unbound { .. }));
}

// =============================================================================
// Clone
// =============================================================================

#[test]
fn test_clone_owned_object_is_independent() {
    init_tracing();
    let drops = DropCounter::default();
    let mut root = Scope::new("root", "");
    add_counter(&mut root, "counter", 2, &drops);

    let mut copy = root.try_clone().unwrap();
    copy.assign_value(&path("counter.count"), Value::Int(9))
        .unwrap();

    assert_eq!(value_at(&root, "counter.count"), Value::Int(2));
    assert_eq!(value_at(&copy, "counter.count"), Value::Int(9));

    let cloned = copy.lookup("counter").and_then(Symbol::as_object).unwrap();
    assert!(cloned.owns_object());
    assert_eq!(cloned.with_native(|c: &Counter| c.count).unwrap(), 9);

    drop(copy);
    assert_eq!(drops.count(), 1);
    drop(root);
    assert_eq!(drops.count(), 2);
}

#[test]
fn test_clone_without_support_fails() {
    init_tracing();
    let mut root = Scope::new("root", "");
    root.add_owned_object("socket", "", Socket { port: 80 })
        .unwrap();

    let err = root.try_clone().unwrap_err();
    assert!(matches!(
        err,
        SymbolError::CloneUnsupported {
            type_name: "Socket",
            ..
        }
    ));

    let socket = root.lookup("socket").and_then(Symbol::as_object).unwrap();
    assert!(socket.owns_object());
    assert_eq!(socket.with_native(|s: &Socket| s.port).unwrap(), 80);
}

#[test]
fn test_clone_borrowed_object_stays_borrowed() {
    init_tracing();
    let drops = DropCounter::default();
    let host = Arc::new(RwLock::new(Counter::new(4, &drops)));
    let mut root = Scope::new("root", "");
    root.add_borrowed_object("counter", "", &host)
        .unwrap()
        .link_field::<Counter, i64>("count", "", 4, |c| &mut c.count)
        .unwrap();

    let mut copy = root.try_clone().unwrap();
    copy.assign_value(&path("counter.count"), Value::Int(8))
        .unwrap();
    assert_eq!(host.read().unwrap().count, 8);
    assert_eq!(value_at(&root, "counter.count"), Value::Int(8));

    drop(copy);
    drop(root);
    assert_eq!(drops.count(), 0);
    assert_eq!(Arc::strong_count(&host), 1);
}

// =============================================================================
// Dangling borrows
// =============================================================================

#[test]
fn test_dropped_host_object_reports_unbound() {
    init_tracing();
    let drops = DropCounter::default();
    let host = Arc::new(RwLock::new(Counter::new(0, &drops)));
    let mut root = Scope::new("root", "");
    root.add_borrowed_object("counter", "", &host).unwrap();
    add_counter(&mut root, "other", 1, &drops);
    drop(host);

    let counter = root.lookup("counter").and_then(Symbol::as_object).unwrap();
    assert!(!counter.is_bound());
    assert_eq!(counter.object_type(), TypeDescriptor::void());

    let err = root.assign(&path("counter"), &path("other")).unwrap_err();
    assert!(matches!(err, SymbolError::Unbound { .. }));
    assert_eq!(value_at(&root, "other.count"), Value::Int(1));
}
