// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for per-canvas collider registration churn, queries and hit testing.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use understory_collider::{ColliderHost, GroupRegistry, OwnerGeometry, Padding};
use understory_indexed_collection::IndexedCollection;

const CANVASES: u32 = 8;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// Every graphic is a 20x20 tile on a 64-wide grid.
struct Grid;

impl OwnerGeometry<u32> for Grid {
    fn layout_rect(&self, owner: u32) -> Option<Rect> {
        let x = f64::from(owner % 64) * 20.0;
        let y = f64::from(owner / 64) * 20.0;
        Some(Rect::new(x, y, x + 20.0, y + 20.0))
    }
}

fn filled_registry(len: u32) -> GroupRegistry<u32, u32> {
    let mut reg = GroupRegistry::new();
    for i in 0..len {
        reg.register(i % CANVASES, i);
    }
    reg
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("collider_registry/register");
    for len in [256_u32, 4_096, 65_536] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::new("fresh", len), &len, |b, &len| {
            b.iter(|| black_box(filled_registry(len)));
        });
        group.bench_with_input(BenchmarkId::new("reregister", len), &len, |b, &len| {
            b.iter_batched(
                || filled_registry(len),
                |mut reg| {
                    for i in 0..len {
                        reg.register(i % CANVASES, i);
                    }
                    black_box(reg);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("collider_registry/churn");
    for len in [256_u32, 4_096, 65_536] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(
            BenchmarkId::new("disable_enable_remove", len),
            &len,
            |b, &len| {
                b.iter_batched(
                    || (filled_registry(len), Lcg::new(0x5eed)),
                    |(mut reg, mut rng)| {
                        for _ in 0..len {
                            let item = rng.next_u32() % len;
                            let canvas = item % CANVASES;
                            match rng.next_u32() % 3 {
                                0 => reg.disable(canvas, item),
                                1 => reg.register(canvas, item),
                                _ => reg.unregister(canvas, item),
                            };
                        }
                        black_box(reg);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_cursor_removal(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_collection/cursor_remove_all");
    for len in [1_024_u32, 65_536] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter_batched(
                || (0..len).collect::<IndexedCollection<u32>>(),
                |mut set| {
                    let mut cursor = set.cursor();
                    while let Some(item) = cursor.next_item(&set) {
                        set.remove(item);
                    }
                    black_box(set);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("collider_host/hit_test");
    for len in [256_u32, 4_096] {
        let mut host = ColliderHost::<u32, u32>::new();
        for owner in 0..len {
            let Ok(id) = host.attach(owner, Some(0)) else {
                continue;
            };
            host.set_padding(id, Padding::uniform(-2.0));
            host.enable(id);
        }
        let mut rng = Lcg::new(7);
        let rows = f64::from(len / 64);
        let points: Vec<Point> = (0..1_024)
            .map(|_| {
                let x = f64::from(rng.next_u32() % 1_280);
                let y = f64::from(rng.next_u32() % 1_000) / 1_000.0 * rows * 20.0;
                Point::new(x, y)
            })
            .collect();

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &points, |b, points| {
            b.iter(|| {
                for &pt in points {
                    black_box(host.hit_test(0, pt, &Grid));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_register,
    bench_churn,
    bench_cursor_removal,
    bench_hit_test
);
criterion_main!(benches);
