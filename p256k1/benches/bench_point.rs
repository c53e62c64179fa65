#![allow(non_snake_case)]
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use p256k1::{Context, Point, Scalar};

fn point_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_add");

    group.bench_function("point,point", |b| {
        b.iter_batched(
            || {
                (
                    Point::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()),
                )
            },
            |(lhs, rhs)| lhs + rhs,
            BatchSize::SmallInput,
        )
    });

    group.bench_function("point,point:to_bytes", |b| {
        b.iter_batched(
            || {
                (
                    Point::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()),
                )
            },
            |(lhs, rhs)| (lhs + rhs).to_bytes(),
            BatchSize::SmallInput,
        )
    });
}

fn point_eq(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_eq");

    group.bench_function("point,point", |b| {
        b.iter_batched(
            || {
                (
                    Point::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()),
                )
            },
            |(lhs, rhs)| lhs == rhs,
            BatchSize::SmallInput,
        )
    });
}

fn point_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_codec");

    group.bench_function("from_bytes", |b| {
        b.iter_batched(
            || Point::random(&mut rand::thread_rng()).to_bytes(),
            Point::from_bytes,
            BatchSize::SmallInput,
        )
    });

    group.bench_function("x_eq_scalar", |b| {
        b.iter_batched(
            || {
                let point = Point::random(&mut rand::thread_rng());
                (point, Scalar::from_bytes_mod_order(point.x().to_bytes()))
            },
            |(point, r)| point.x_eq_scalar(&r),
            BatchSize::SmallInput,
        )
    });
}

fn context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");
    group.sample_size(10);
    group.bench_function("new", |b| b.iter(Context::new));
}

criterion_group!(benches, point_add, point_eq, point_codec, context);
criterion_main!(benches);
