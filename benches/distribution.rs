use cashflow_core::{
    distribution::{equal_split, weighted_split},
    money::{Money, Percentage},
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

fn bench_equal_split(c: &mut Criterion) {
    let total = Money::new(dec!(9876.54));
    c.bench_function("equal_split_12_parts", |b| {
        b.iter(|| equal_split(black_box(total), black_box(12)).unwrap())
    });
}

fn bench_weighted_split(c: &mut Criterion) {
    let total = Money::new(dec!(9876.54));
    let weights: Vec<Percentage> = vec![
        Percentage::from_percent(dec!(40)),
        Percentage::from_percent(dec!(25)),
        Percentage::from_percent(dec!(15)),
        Percentage::from_percent(dec!(10)),
        Percentage::from_percent(dec!(10)),
    ];
    c.bench_function("weighted_split_5_weights", |b| {
        b.iter(|| weighted_split(black_box(total), black_box(&weights)).unwrap())
    });
}

criterion_group!(benches, bench_equal_split, bench_weighted_split);
criterion_main!(benches);
