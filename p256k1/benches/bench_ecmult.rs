#![allow(non_snake_case)]
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use p256k1::{
    Context, Point, Scalar,
    ecmult::{Scratch, ecmult_const},
    group::Gej,
};

lazy_static::lazy_static! {
    static ref CTX: Context = Context::new();
}

fn scalar_mul_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecmult");

    group.bench_function("ecmult_gen", |b| {
        b.iter_batched(
            || Scalar::random(&mut rand::thread_rng()),
            |scalar| CTX.ecmult_gen(&scalar),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("ecmult_const", |b| {
        b.iter_batched(
            || {
                (
                    Scalar::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()).to_ge(),
                )
            },
            |(scalar, point)| ecmult_const(&point, &scalar),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("ecmult:basepoint", |b| {
        b.iter_batched(
            || Scalar::random(&mut rand::thread_rng()),
            |scalar| CTX.ecmult().ecmult(&Gej::INFINITY, &Scalar::ZERO, &scalar),
            BatchSize::SmallInput,
        )
    });
}

fn double_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_mul");

    group.bench_function("ecmult:basepoint,point", |b| {
        b.iter_batched(
            || {
                (
                    Scalar::random(&mut rand::thread_rng()),
                    Scalar::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()).to_gej(),
                )
            },
            |(x, y, B)| CTX.ecmult().ecmult(&B, &y, &x),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("operators:point,point", |b| {
        b.iter_batched(
            || {
                (
                    Scalar::random(&mut rand::thread_rng()),
                    Scalar::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()),
                    Point::random(&mut rand::thread_rng()),
                )
            },
            |(x, y, A, B)| A * x + B * y,
            BatchSize::SmallInput,
        )
    });
}

fn multi_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecmult_multi_var");

    for n in [2usize, 8, 32] {
        group.bench_function(format!("{} points", n), |b| {
            let mut scratch = Scratch::with_capacity(n);
            b.iter_batched(
                || {
                    (0..n)
                        .map(|_| {
                            (
                                Scalar::random(&mut rand::thread_rng()),
                                Point::random(&mut rand::thread_rng()),
                            )
                        })
                        .collect::<Vec<_>>()
                },
                |terms| CTX.ecmult().ecmult_multi_var(&mut scratch, None, &terms[..]),
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, scalar_mul_point, double_mul, multi_mul);
criterion_main!(benches);
