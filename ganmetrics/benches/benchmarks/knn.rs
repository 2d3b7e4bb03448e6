/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use criterion::{BenchmarkId, Criterion};
use ganmetrics::knn_scores;
use ganmetrics_utils::views::Matrix;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// Euclidean distances between the rows of `a` and the rows of `b`.
fn distances(a: &Matrix<f32>, b: &Matrix<f32>) -> Matrix<f32> {
    let mut out = Matrix::new(0.0f32, a.nrows(), b.nrows());
    for (i, x) in a.row_iter().enumerate() {
        for (j, y) in b.row_iter().enumerate() {
            let d: f32 = std::iter::zip(x, y).map(|(p, q)| (p - q) * (p - q)).sum();
            out[(i, j)] = d.sqrt();
        }
    }
    out
}

fn samples(n: usize, dim: usize, mean: f32, rng: &mut StdRng) -> Matrix<f32> {
    let dist = Normal::<f32>::new(mean, 1.0).unwrap();
    let mut m = Matrix::new(0.0f32, n, dim);
    m.as_mut_slice()
        .iter_mut()
        .for_each(|x| *x = dist.sample(rng));
    m
}

pub(crate) fn benchmark_f32(c: &mut Criterion) {
    const DIM: usize = 64;

    let mut group = c.benchmark_group("knn-scores-f32");
    let mut rng = StdRng::seed_from_u64(0xc0ff33);

    for n in [128, 512] {
        let real = samples(n, DIM, 0.0, &mut rng);
        let fake = samples(n, DIM, 0.25, &mut rng);

        let d_xx = distances(&real, &real);
        let d_xy = distances(&real, &fake);
        let d_yy = distances(&fake, &fake);

        for k in [1, 10] {
            group.bench_with_input(BenchmarkId::new(format!("k={k}"), n), &n, |f, _| {
                f.iter(|| {
                    knn_scores(d_xx.as_view(), d_xy.as_view(), d_yy.as_view(), k).unwrap()
                })
            });
        }
    }
}
