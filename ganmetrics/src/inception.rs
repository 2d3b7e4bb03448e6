/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use ganmetrics_utils::{Element, views::MatrixView};
use tracing::{debug, warn};

use crate::{MetricResult, ShapeError};

/// Compute the Inception Score of the class-probability rows in `probabilities`.
///
/// For each row `x_i`, the divergence from the batch marginal `p` is
/// ```text
/// kl_i = sum_j x_ij * (ln(x_ij + eps) - ln(p_j + eps))
/// ```
/// and the score is `exp(mean_i kl_i)`.
///
/// A single row or a batch of identical rows scores `1`. An empty batch yields `NaN`.
pub fn inception_score<T>(probabilities: MatrixView<'_, T>, eps: f64) -> f64
where
    T: Element,
{
    debug!(
        "inception score over {} samples and {} classes, eps = {:e}",
        probabilities.nrows(),
        probabilities.ncols(),
        eps
    );

    let marginal = marginal(probabilities);
    let score = mean_divergence(probabilities, &marginal, eps).exp();
    if !score.is_finite() {
        warn!("inception score is not finite: {}", score);
    }
    score
}

/// Compute the Mode Score of `generated` against the class marginal of `real`.
///
/// This is the Inception Score exponent of `generated` minus the divergence between the
/// marginal of `generated` and the marginal of `real`:
/// ```text
/// exp(mean_i kl_i - sum_j p_j * (ln(p_j + eps) - ln(q_j + eps)))
/// ```
///
/// # Errors
///
/// Returns a [`ShapeError::ClassMismatch`] if the two inputs have different numbers of
/// columns.
pub fn mode_score<T>(
    generated: MatrixView<'_, T>,
    real: MatrixView<'_, T>,
    eps: f64,
) -> MetricResult<f64>
where
    T: Element,
{
    if generated.ncols() != real.ncols() {
        return Err(ShapeError::ClassMismatch {
            left: generated.ncols(),
            right: real.ncols(),
        }
        .into());
    }

    debug!(
        "mode score over {} generated and {} real samples with {} classes, eps = {:e}",
        generated.nrows(),
        real.nrows(),
        generated.ncols(),
        eps
    );

    let p = marginal(generated);
    let q = marginal(real);

    let within = mean_divergence(generated, &p, eps);
    let between: f64 = std::iter::zip(p.iter(), q.iter())
        .map(|(&pj, &qj)| pj * ((pj + eps).ln() - (qj + eps).ln()))
        .sum();

    let score = (within - between).exp();
    if !score.is_finite() {
        warn!("mode score is not finite: {}", score);
    }
    Ok(score)
}

/// Mean over rows, accumulated in `f64`.
fn marginal<T: Element>(x: MatrixView<'_, T>) -> Vec<f64> {
    let mut sums = vec![0.0; x.ncols()];
    for row in x.row_iter() {
        std::iter::zip(sums.iter_mut(), row).for_each(|(s, v)| *s += v.to_f64());
    }

    let n = x.nrows() as f64;
    sums.iter_mut().for_each(|s| *s /= n);
    sums
}

/// Mean over rows of the smoothed divergence of each row from `marginal`.
fn mean_divergence<T: Element>(x: MatrixView<'_, T>, marginal: &[f64], eps: f64) -> f64 {
    let log_marginal: Vec<f64> = marginal.iter().map(|p| (p + eps).ln()).collect();

    let total: f64 = x
        .row_iter()
        .map(|row| {
            std::iter::zip(row, log_marginal.iter())
                .map(|(v, lp)| {
                    let v = v.to_f64();
                    v * ((v + eps).ln() - lp)
                })
                .sum::<f64>()
        })
        .sum();

    total / x.nrows() as f64
}
