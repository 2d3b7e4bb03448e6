/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use super::common::Transpose;

/// Triple-loop GEMM used to validate the faer-backed implementation.
#[allow(clippy::too_many_arguments)]
pub(super) fn gemm_reference(
    atranspose: Transpose,
    btranspose: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    b: &[f64],
    beta: Option<f64>,
    c: &mut [f64],
) {
    let beta: f64 = beta.unwrap_or(0.0);

    for i in 0..m {
        for j in 0..n {
            let mut temp = 0.0;
            for l in 0..k {
                let a_val = match atranspose {
                    Transpose::None => a[(i * k) + l],
                    Transpose::Ordinary => a[(l * m) + i],
                };
                let b_val = match btranspose {
                    Transpose::None => b[(n * l) + j],
                    Transpose::Ordinary => b[(j * k) + l],
                };
                temp += a_val * b_val;
            }
            let prior = if beta == 0.0 { 0.0 } else { beta * c[i * n + j] };
            c[i * n + j] = alpha * temp + prior;
        }
    }
}

/// Two-pass column covariance (divide by `n - 1`) used to validate `covariance`.
pub(super) fn covariance_reference(data: &[f64], nrows: usize, ncols: usize) -> Vec<f64> {
    let mean: Vec<f64> = (0..ncols)
        .map(|j| (0..nrows).map(|i| data[i * ncols + j]).sum::<f64>() / nrows as f64)
        .collect();

    let mut cov = vec![0.0; ncols * ncols];
    for p in 0..ncols {
        for q in 0..ncols {
            let s: f64 = (0..nrows)
                .map(|i| (data[i * ncols + p] - mean[p]) * (data[i * ncols + q] - mean[q]))
                .sum();
            cov[p * ncols + q] = s / (nrows as f64 - 1.0);
        }
    }
    cov
}
