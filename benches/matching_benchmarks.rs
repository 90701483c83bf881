use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rust_decimal_macros::dec;

use scan_matching_engine::{
    loadgen::RandomOrderGenerator, EngineConfig, MatchingEngine, Order, PolicyKind,
};

fn engine_for(policy: PolicyKind) -> MatchingEngine {
    MatchingEngine::from_config(&EngineConfig {
        policy,
        ..EngineConfig::default()
    })
}

fn bench_resting_submit(c: &mut Criterion) {
    c.bench_function("submit_resting_order", |b| {
        b.iter_batched(
            MatchingEngine::new,
            |mut engine| {
                engine
                    .submit(black_box(Order::buy(dec!(10.00), dec!(1))))
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_crossing_submit(c: &mut Criterion) {
    c.bench_function("submit_crossing_pair", |b| {
        let mut engine = MatchingEngine::new();
        b.iter(|| {
            engine.submit(Order::sell(dec!(10.00), dec!(1))).unwrap();
            engine
                .submit(black_box(Order::buy(dec!(10.00), dec!(1))))
                .unwrap()
        });
    });
}

fn bench_random_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_flow");

    for policy in [PolicyKind::ScanOrder, PolicyKind::PriceTime] {
        for size in [1_000usize, 10_000] {
            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), size),
                &size,
                |b, &size| {
                    let orders = RandomOrderGenerator::seeded(17).orders(size);
                    b.iter(|| {
                        let mut engine = engine_for(policy);
                        engine.submit_many(orders.iter().cloned()).unwrap();
                        black_box(engine.statistics())
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resting_submit,
    bench_crossing_submit,
    bench_random_flow
);
criterion_main!(benches);
