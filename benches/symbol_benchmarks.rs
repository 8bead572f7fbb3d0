//! Benchmarks for building, assigning and cloning symbol trees.
//!
//! ```bash
//! cargo bench --bench symbol_benchmarks
//! cargo bench --features profiling --bench symbol_benchmarks -- "clone"
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use emplode::prelude::*;
use std::hint::black_box;

#[derive(Debug, Clone, Default)]
struct Cell {
    value: i64,
    rate: f64,
}

impl NativeType for Cell {
    fn type_name() -> &'static str {
        "Cell"
    }
}

impl NativeBinding for Cell {
    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn default_copy(&mut self, other: &dyn NativeBinding) -> bool {
        match other.downcast_ref::<Cell>() {
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

/// `width` scopes, each holding `width` scalars and one linked object.
fn build_tree(width: usize) -> Scope {
    let mut root = Scope::new("root", "");
    for i in 0..width {
        let scope = root.add_scope(format!("s{i}"), "").unwrap();
        for j in 0..width {
            scope.add_scalar(format!("v{j}"), "", j as i64).unwrap();
        }
        let cell = scope.add_owned_object("cell", "", Cell::default()).unwrap();
        cell.link_field::<Cell, i64>("value", "", 0, |c| &mut c.value)
            .unwrap();
        cell.link_field::<Cell, f64>("rate", "", 0.5, |c| &mut c.rate)
            .unwrap();
    }
    root
}

fn registration_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/build");
    for width in [4usize, 16, 64] {
        group.throughput(Throughput::Elements((width * (width + 3)) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| black_box(build_tree(black_box(width))));
        });
    }
    group.finish();
}

fn assignment_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/assign");

    let mut root = build_tree(16);
    let target = SymbolPath::from("s0");
    let source = SymbolPath::from("s15");
    group.bench_function("scope_to_scope", |b| {
        b.iter(|| root.assign(black_box(&target), black_box(&source)).unwrap());
    });

    let field = SymbolPath::from("s3.cell.value");
    group.bench_function("linked_field", |b| {
        b.iter(|| root.assign_value(black_box(&field), Value::Int(7)).unwrap());
    });

    let cells = (SymbolPath::from("s1.cell"), SymbolPath::from("s2.cell"));
    group.bench_function("object_to_object", |b| {
        b.iter(|| root.assign(black_box(&cells.0), black_box(&cells.1)).unwrap());
    });

    group.finish();
}

fn clone_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/clone");
    for width in [4usize, 16, 64] {
        let root = build_tree(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &root, |b, root| {
            b.iter(|| black_box(root.try_clone().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    registration_benchmarks,
    assignment_benchmarks,
    clone_benchmarks
);

criterion_main!(benches);
