//! Geometry engine and catalog lookup benchmarks.
//!
//! Resize and drag run on every pointer-move frame, so they need to stay well
//! under a millisecond; catalog lookups happen on every layout switch.
//!
//! Run with: cargo bench --bench geometry_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridboard::catalog::LayoutCatalog;
use gridboard::floating::{drag_position, resize, GeometryLimits, ResizeHandle};
use gridboard::model::{CanvasSize, Position, Rect, Size};

fn benchmark_resize_handles(c: &mut Criterion) {
    let canvas = CanvasSize::measured(1920.0, 1080.0).expect("valid canvas");
    let start = Rect::new(400.0, 300.0, 600.0, 400.0);
    let limits = GeometryLimits::default();

    let mut group = c.benchmark_group("resize");
    for handle in ResizeHandle::ALL {
        group.bench_with_input(
            BenchmarkId::new("handle", format!("{handle:?}")),
            &handle,
            |b, &handle| {
                b.iter(|| {
                    resize(
                        black_box(start),
                        black_box(Position::new(-137.0, 91.0)),
                        handle,
                        canvas,
                        limits,
                    )
                });
            },
        );
    }
    group.finish();
}

fn benchmark_drag(c: &mut Criterion) {
    let canvas = CanvasSize::measured(1920.0, 1080.0).expect("valid canvas");
    let size = Size::new(600.0, 400.0);

    c.bench_function("drag_position", |b| {
        b.iter(|| {
            drag_position(
                black_box(Position::new(2500.0, -40.0)),
                black_box(Position::new(25.0, 10.0)),
                size,
                canvas,
            )
        });
    });
}

fn benchmark_catalog(c: &mut Criterion) {
    let catalog = LayoutCatalog::builtin();
    let mut group = c.benchmark_group("catalog");

    for id in ["grid-1x1", "hero-over-four", "grid-8x4"] {
        group.bench_with_input(BenchmarkId::new("get_layout", id), &id, |b, &id| {
            b.iter(|| catalog.get_layout(black_box(id)));
        });
        group.bench_with_input(BenchmarkId::new("default_percentages", id), &id, |b, &id| {
            let layout = catalog.get_layout(id).expect("builtin layout");
            b.iter(|| black_box(layout).default_percentages());
        });
    }

    group.bench_function("validate_all", |b| b.iter(|| catalog.validate()));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_resize_handles,
    benchmark_drag,
    benchmark_catalog
);
criterion_main!(benches);
