/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Leave-one-out k-nearest-neighbor two-sample test.

use std::cmp::Ordering;

use ganmetrics_utils::{
    Element,
    views::{Matrix, MatrixView},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{MetricResult, ShapeError, config::KnnParams};

/// Confusion counts of the leave-one-out classifier with "real" as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_negative: usize,
}

impl Confusion {
    /// The number of classified points.
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.false_negative + self.true_negative
    }
}

/// Result of [`knn_scores`].
///
/// Accuracies close to `0.5` mean the real and generated samples are hard to tell apart.
/// A class with no members yields a `NaN` accuracy for that class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KnnScores {
    /// Fraction of all points whose prediction matches their label.
    pub accuracy: f64,
    /// `tp / (tp + fn)`
    pub real_accuracy: f64,
    /// `tn / (tn + fp)`
    pub fake_accuracy: f64,
    pub confusion: Confusion,
}

impl KnnScores {
    /// Return `(accuracy, real_accuracy, fake_accuracy)`.
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.accuracy, self.real_accuracy, self.fake_accuracy)
    }

    fn from_confusion(confusion: Confusion) -> Self {
        let Confusion {
            true_positive: tp,
            false_positive: fp,
            false_negative: fn_,
            true_negative: tn,
        } = confusion;

        Self {
            accuracy: (tp + tn) as f64 / confusion.total() as f64,
            real_accuracy: tp as f64 / (tp + fn_) as f64,
            fake_accuracy: tn as f64 / (tn + fp) as f64,
            confusion,
        }
    }
}

/// Score how well a leave-one-out `k`-NN classifier separates real from generated samples.
///
/// The inputs are precomputed distances between `nx` real and `ny` generated points:
///
/// * `d_xx`: `nx x nx` real-to-real distances.
/// * `d_xy`: `nx x ny` real-to-generated distances.
/// * `d_yy`: `ny x ny` generated-to-generated distances.
///
/// The neighbors of point `j` are the `k` smallest entries of column `j` of
/// `[[d_xx, d_xy], [d_xy', d_yy]]` with the diagonal excluded. Equal distances are
/// resolved in favor of the lower index. NaN distances are never preferred over numbers,
/// including `+inf`. A point is predicted real when at least `k / 2` of its neighbors are
/// real.
///
/// The caller's matrices are never modified.
///
/// # Errors
///
/// * A configuration error if `k == 0`.
/// * [`ShapeError::NotSquare`] if `d_xx` or `d_yy` is not square.
/// * [`ShapeError::BlockMismatch`] if `d_xy` is not `nx x ny`.
/// * [`ShapeError::TooFewCandidates`] if `k > nx + ny`.
pub fn knn_scores<T>(
    d_xx: MatrixView<'_, T>,
    d_xy: MatrixView<'_, T>,
    d_yy: MatrixView<'_, T>,
    k: usize,
) -> MetricResult<KnnScores>
where
    T: Element,
{
    knn_scores_with(d_xx, d_xy, d_yy, KnnParams::new(k)?)
}

pub(crate) fn knn_scores_with<T>(
    d_xx: MatrixView<'_, T>,
    d_xy: MatrixView<'_, T>,
    d_yy: MatrixView<'_, T>,
    params: KnnParams,
) -> MetricResult<KnnScores>
where
    T: Element,
{
    let k = params.k().get();
    let (nx, ny) = check_blocks(&d_xx, &d_xy, &d_yy)?;
    let n = nx + ny;
    if k > n {
        return Err(ShapeError::TooFewCandidates { k, candidates: n }.into());
    }

    debug!("knn scores with k = {} over {} real and {} fake points", k, nx, ny);

    let columns = assemble_columns(d_xx, d_xy, d_yy);
    let threshold = k as f64 / 2.0;

    let mut confusion = Confusion::default();
    let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(n);
    for (point, column) in columns.row_iter().enumerate() {
        candidates.clear();
        candidates.extend(column.iter().copied().zip(0..n));
        let (nearest, kth, _) = candidates.select_nth_unstable_by(k - 1, by_distance);

        let votes = nearest
            .iter()
            .chain(std::iter::once(&*kth))
            .filter(|(_, index)| *index < nx)
            .count();

        let predicted_real = votes as f64 >= threshold;
        match (point < nx, predicted_real) {
            (true, true) => confusion.true_positive += 1,
            (true, false) => confusion.false_negative += 1,
            (false, true) => confusion.false_positive += 1,
            (false, false) => confusion.true_negative += 1,
        }
    }

    let scores = KnnScores::from_confusion(confusion);
    if !(scores.real_accuracy.is_finite() && scores.fake_accuracy.is_finite()) {
        warn!(
            "knn scores are not finite: {:?} ({} real and {} fake points)",
            scores.as_tuple(),
            nx,
            ny
        );
    }
    Ok(scores)
}

fn check_blocks<T>(
    d_xx: &MatrixView<'_, T>,
    d_xy: &MatrixView<'_, T>,
    d_yy: &MatrixView<'_, T>,
) -> Result<(usize, usize), ShapeError> {
    let square = |name: &'static str, m: &MatrixView<'_, T>| {
        if m.is_square() {
            Ok(m.nrows())
        } else {
            Err(ShapeError::NotSquare {
                name,
                nrows: m.nrows(),
                ncols: m.ncols(),
            })
        }
    };

    let nx = square("d_xx", d_xx)?;
    let ny = square("d_yy", d_yy)?;
    if d_xy.shape() != (nx, ny) {
        return Err(ShapeError::BlockMismatch {
            name: "d_xy",
            expected: (nx, ny),
            got: d_xy.shape(),
        });
    }
    Ok((nx, ny))
}

/// Build the transpose of the block matrix `[[d_xx, d_xy], [d_xy', d_yy]]` with `+inf`
/// on the diagonal, so row `p` holds the distances from every point to point `p`.
fn assemble_columns<T: Element>(
    d_xx: MatrixView<'_, T>,
    d_xy: MatrixView<'_, T>,
    d_yy: MatrixView<'_, T>,
) -> Matrix<f64> {
    let nx = d_xx.nrows();
    let ny = d_yy.nrows();
    let n = nx + ny;

    let mut columns = Matrix::new(0.0, n, n);
    for (p, row) in columns.row_iter_mut().enumerate() {
        let (upper, lower) = row.split_at_mut(nx);
        if p < nx {
            for (q, x) in upper.iter_mut().enumerate() {
                *x = d_xx[(q, p)].to_f64();
            }
            std::iter::zip(lower.iter_mut(), d_xy.row(p)).for_each(|(x, d)| *x = d.to_f64());
        } else {
            let p = p - nx;
            for (q, x) in upper.iter_mut().enumerate() {
                *x = d_xy[(q, p)].to_f64();
            }
            for (q, x) in lower.iter_mut().enumerate() {
                *x = d_yy[(q, p)].to_f64();
            }
        }
    }

    for i in 0..n {
        columns[(i, i)] = f64::INFINITY;
    }
    columns
}

/// NaN of either sign orders after every number, then by distance, then by index.
fn by_distance(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.is_nan()
        .cmp(&b.0.is_nan())
        .then_with(|| a.0.total_cmp(&b.0))
        .then(a.1.cmp(&b.1))
}
