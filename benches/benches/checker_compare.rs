// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use loon_collision::{CollisionChecker, CollisionManager, LinearChecker, RectBox, TypeTag};

const UNIT: TypeTag = TypeTag::new("unit");

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<RectBox> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(RectBox::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell));
        }
    }
    out
}

fn gen_random_boxes(count: usize, world: f64, size: f64) -> Vec<RectBox> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            RectBox::from_xywh(
                rng.next_f64() * (world - size),
                rng.next_f64() * (world - size),
                size,
                size,
            )
        })
        .collect()
}

fn fill<C: CollisionChecker<u32>>(checker: &mut C, boxes: &[RectBox]) {
    for (i, b) in boxes.iter().copied().enumerate() {
        checker.add_object(i as u32, b, UNIT);
    }
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64] {
        let boxes = gen_grid_boxes(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                || CollisionManager::<u32>::new(32).unwrap(),
                |mut idx| {
                    fill(&mut idx, &boxes);
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("linear_n{n}"), |b| {
            b.iter_batched(
                || LinearChecker::<u32>::new(32).unwrap(),
                |mut idx| {
                    fill(&mut idx, &boxes);
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let boxes = gen_random_boxes(4096, 2000.0, 12.0);
    let mut grid = CollisionManager::<u32>::new(32).unwrap();
    let mut linear = LinearChecker::<u32>::new(32).unwrap();
    fill(&mut grid, &boxes);
    fill(&mut linear, &boxes);

    let mut group = c.benchmark_group("query");
    group.bench_function("grid_point", |b| {
        b.iter(|| black_box(grid.get_objects_at(1000.0, 1000.0, None)));
    });
    group.bench_function("linear_point", |b| {
        b.iter(|| black_box(linear.get_objects_at(1000.0, 1000.0, None)));
    });
    group.bench_function("grid_range_r100", |b| {
        b.iter(|| black_box(grid.get_objects_in_range(1000.0, 1000.0, 100.0, None)));
    });
    group.bench_function("linear_range_r100", |b| {
        b.iter(|| black_box(linear.get_objects_in_range(1000.0, 1000.0, 100.0, None)));
    });
    group.bench_function("grid_intersecting", |b| {
        b.iter(|| black_box(grid.get_intersecting_objects(17, None)));
    });
    group.bench_function("linear_intersecting", |b| {
        b.iter(|| black_box(linear.get_intersecting_objects(17, None)));
    });
    group.finish();
}

fn bench_update_heavy(c: &mut Criterion) {
    let boxes = gen_random_boxes(2048, 2000.0, 12.0);
    let mut group = c.benchmark_group("update_heavy");
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("grid_move_all", |b| {
        b.iter_batched(
            || {
                let mut idx = CollisionManager::<u32>::new(32).unwrap();
                fill(&mut idx, &boxes);
                idx
            },
            |mut idx| {
                for (i, mut bx) in boxes.iter().copied().enumerate() {
                    let (ox, oy) = (bx.x, bx.y);
                    bx.offset(7.0, -3.0);
                    idx.update_object_location(i as u32, bx, ox, oy);
                }
                black_box(idx.occupied_cells());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_queries, bench_update_heavy);
criterion_main!(benches);
