/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use criterion::{BenchmarkId, Criterion};
use ganmetrics::frechet_inception_distance;
use ganmetrics_utils::views::Matrix;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};

pub(crate) fn benchmark_f64(c: &mut Criterion) {
    const NSAMPLES: usize = 1024;

    let mut group = c.benchmark_group("frechet-f64");
    let mut rng = StdRng::seed_from_u64(0xc0ff33);

    for dim in [16, 64, 256] {
        let mut a = Matrix::new(0.0f64, NSAMPLES, dim);
        let mut b = Matrix::new(0.0f64, NSAMPLES, dim);
        a.as_mut_slice()
            .iter_mut()
            .for_each(|x| *x = StandardNormal.sample(&mut rng));
        b.as_mut_slice()
            .iter_mut()
            .for_each(|x| {
                let noise: f64 = StandardNormal.sample(&mut rng);
                *x = 0.5 + noise;
            });

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |f, _| {
            f.iter(|| frechet_inception_distance(&a, &b).unwrap())
        });
    }
}
