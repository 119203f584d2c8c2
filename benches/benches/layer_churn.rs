// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use loon_layer::{Actor, ActorLayer, ActorRef, LayerConfig, RectBox, TypeTag};

const UNIT: TypeTag = TypeTag::new("unit");

fn actors(n: usize) -> Vec<ActorRef> {
    (0..n)
        .map(|i| {
            let x = (i % 64) as f64 * 30.0;
            let y = (i / 64) as f64 * 30.0;
            Actor::new(UNIT, RectBox::new(x, y, 24, 24))
        })
        .collect()
}

fn layer() -> ActorLayer {
    ActorLayer::new(LayerConfig {
        width: 2048,
        height: 2048,
        ..LayerConfig::default()
    })
    .unwrap()
}

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer");
    group.bench_function("add_then_remove_1024", |b| {
        b.iter_batched(
            || (layer(), actors(1024)),
            |(layer, actors)| {
                for a in &actors {
                    layer.add_object(a);
                }
                black_box(layer.remove_objects(&actors));
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("move_and_query_1024", |b| {
        b.iter_batched(
            || {
                let layer = layer();
                let actors = actors(1024);
                for a in &actors {
                    layer.add_object(a);
                }
                (layer, actors)
            },
            |(layer, actors)| {
                for a in &actors {
                    a.move_by(3.0, 1.0);
                }
                black_box(layer.get_collision_objects_at(Point::new(500.0, 200.0), None));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_add_remove);
criterion_main!(benches);
