//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use emplode::prelude::*;

/// Install a subscriber once so `RUST_LOG` shows the tree's tracing output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn path(s: &str) -> SymbolPath {
    SymbolPath::from(s)
}

/// Current value of the scalar at `at`, panicking if there is none.
pub fn value_at(root: &Scope, at: &str) -> Value {
    root.resolve(&path(at))
        .and_then(Symbol::as_scalar)
        .unwrap_or_else(|| panic!("no scalar at {at}"))
        .value()
        .unwrap_or_else(|e| panic!("cannot read {at}: {e}"))
}

/// Counts how many times instances sharing it were dropped.
#[derive(Debug, Clone, Default)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A native object with one integer field. Cloning is supported.
#[derive(Debug)]
pub struct Counter {
    pub count: i64,
    drops: DropCounter,
}

impl Counter {
    pub fn new(count: i64, drops: &DropCounter) -> Self {
        Self {
            count,
            drops: drops.clone(),
        }
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        self.drops.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl NativeType for Counter {
    fn type_name() -> &'static str {
        "Counter"
    }
}

impl NativeBinding for Counter {
    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
        match other.downcast_ref::<Counter>() {
            Some(other) => {
                self.count = other.count;
                true
            }
            None => false,
        }
    }

    fn clone_native(&self) -> Option<NativeObject> {
        Some(NativeObject::owned(Counter::new(self.count, &self.drops)))
    }
}

/// A native object that does not support cloning.
#[derive(Debug, Default)]
pub struct Socket {
    pub port: i64,
}

impl NativeType for Socket {
    fn type_name() -> &'static str {
        "Socket"
    }
}

impl NativeBinding for Socket {
    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
        match other.downcast_ref::<Socket>() {
            Some(other) => {
                self.port = other.port;
                true
            }
            None => false,
        }
    }
}

/// Register an owned counter at `name` with its `count` field linked.
pub fn add_counter<'a>(
    scope: &'a mut Scope,
    name: &str,
    count: i64,
    drops: &DropCounter,
) -> &'a mut ObjectBinding {
    let binding = scope
        .add_owned_object(name, "counts things", Counter::new(count, drops))
        .unwrap();
    binding
        .link_field::<Counter, i64>("count", "current count", count, |c| &mut c.count)
        .unwrap();
    binding
}
