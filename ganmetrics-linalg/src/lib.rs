/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod common;
pub use common::Transpose;

mod faer;
use faer::{gemm_impl, symmetric_eigen_impl};
use ganmetrics_utils::views::{Matrix, MatrixView};
use thiserror::Error;

// Make the reference implementation available for internal testing.
#[cfg(test)]
mod reference;

/// Failures raised by the dense routines in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("expected a square matrix, instead got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
    #[error("operand shapes {left:?} and {right:?} are incompatible")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("array must not contain infs or NaNs")]
    NonFinite,
    #[error("eigendecomposition of a {dim}x{dim} matrix failed: {reason}")]
    NoConvergence { dim: usize, reason: String },
}

/// Matrix-matrix multiplication for implicit row-major matrices `a` and `b` using the
/// implicit row-major matrix `c` as the destination.
///
/// Performs one of the following operations:
/// ```ignore
/// 1. c = [beta * c] + alpha * a * b
/// 2. c = [beta * c] + alpha * a' * b
/// 3. c = [beta * c] + alpha * a * b'
/// 4. c = [beta * c] + alpha * a' * b'
/// ```
/// Where `x'` indicates the ordinary transpose of `x`.
///
/// If `beta` is `None`, the destination `c` is completely over-written.
///
/// * `m`: The number of rows in `c` and in `a` (after transposing).
/// * `n`: The number of columns in `c` and in `b` (after transposing).
/// * `k`: The number of columns in `a` and rows in `b` (after transposing).
///
/// # Panics
///
/// Panics if
/// * `a.len() != m * k`
/// * `b.len() != k * n`
/// * `c.len() != m * n`.
#[allow(clippy::too_many_arguments)]
pub fn gemm(
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
    // Check size requirements.
    assert_eq!(
        a.len(),
        m * k,
        "expected {}x{} matrix `a` to have length {}, instead got {}",
        m,
        k,
        m * k,
        a.len()
    );
    assert_eq!(
        b.len(),
        k * n,
        "expected {}x{} matrix `b` to have length {}, instead got {}",
        k,
        n,
        k * n,
        b.len()
    );
    assert_eq!(
        c.len(),
        m * n,
        "expected {}x{} matrix `c` to have length {}, instead got {}",
        m,
        n,
        m * n,
        c.len()
    );

    // Invoke the actual implementation.
    gemm_impl(atranspose, btranspose, m, n, k, alpha, a, b, beta, c)
}

fn check_square(a: &MatrixView<'_, f64>) -> Result<usize, LinalgError> {
    if a.is_square() {
        Ok(a.nrows())
    } else {
        Err(LinalgError::NotSquare {
            nrows: a.nrows(),
            ncols: a.ncols(),
        })
    }
}

fn check_finite(a: &[f64]) -> Result<(), LinalgError> {
    if a.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(LinalgError::NonFinite)
    }
}

/// Eigendecomposition of the symmetric matrix `a`.
///
/// Returns the eigenvalues together with a row-major matrix whose column `i` is the
/// eigenvector for eigenvalue `i`. Only the lower triangle of `a` is read.
pub fn symmetric_eigen(a: MatrixView<'_, f64>) -> Result<(Vec<f64>, Matrix<f64>), LinalgError> {
    let dim = check_square(&a)?;

    let mut eigenvalues = vec![0.0; dim];
    let mut eigenvectors = Matrix::new(0.0, dim, dim);
    symmetric_eigen_impl(
        dim,
        a.as_slice(),
        &mut eigenvalues,
        eigenvectors.as_mut_slice(),
    )?;

    Ok((eigenvalues, eigenvectors))
}

/// Per-column mean of `data`.
///
/// An empty matrix yields `NaN` for every column.
pub fn column_means(data: MatrixView<'_, f64>) -> Vec<f64> {
    let mut sums = vec![0.0; data.ncols()];
    for row in data.row_iter() {
        std::iter::zip(sums.iter_mut(), row).for_each(|(s, x)| *s += *x);
    }

    let n = data.nrows() as f64;
    sums.iter_mut().for_each(|s| *s /= n);
    sums
}

/// Unbiased covariance of the columns of `data`, normalized by `nrows - 1`.
///
/// Every entry is `NaN` when fewer than two rows are supplied.
pub fn covariance(data: MatrixView<'_, f64>) -> Matrix<f64> {
    let (nrows, ncols) = data.shape();
    if nrows < 2 {
        return Matrix::new(f64::NAN, ncols, ncols);
    }

    let means = column_means(data);
    let mut centered = data.to_owned();
    for row in centered.row_iter_mut() {
        std::iter::zip(row.iter_mut(), means.iter()).for_each(|(x, m)| *x -= *m);
    }

    let mut cov = Matrix::new(0.0, ncols, ncols);
    gemm(
        Transpose::Ordinary,
        Transpose::None,
        ncols,
        ncols,
        nrows,
        1.0 / (nrows as f64 - 1.0),
        centered.as_slice(),
        centered.as_slice(),
        None,
        cov.as_mut_slice(),
    );
    cov
}

/// Principal square root of the symmetric positive semi-definite matrix `a`.
///
/// Eigenvalues that come out slightly negative through rounding are treated as zero.
pub fn sqrtm_psd(a: MatrixView<'_, f64>) -> Result<Matrix<f64>, LinalgError> {
    let dim = check_square(&a)?;
    check_finite(a.as_slice())?;

    let (eigenvalues, eigenvectors) = symmetric_eigen(a)?;

    // U * diag(sqrt(lambda)), then multiply by U' on the right.
    let mut scaled = eigenvectors.clone();
    for row in scaled.row_iter_mut() {
        std::iter::zip(row.iter_mut(), eigenvalues.iter())
            .for_each(|(x, lambda)| *x *= lambda.max(0.0).sqrt());
    }

    let mut root = Matrix::new(0.0, dim, dim);
    gemm(
        Transpose::None,
        Transpose::Ordinary,
        dim,
        dim,
        dim,
        1.0,
        scaled.as_slice(),
        eigenvectors.as_slice(),
        None,
        root.as_mut_slice(),
    );
    Ok(root)
}

/// Real part of `trace(sqrtm(a * b))` for symmetric positive semi-definite `a` and `b`.
///
/// With `s = sqrtm(a)`, the product `a * b` is similar to the symmetric matrix `s * b * s`,
/// so the trace of the principal root is the sum of the square roots of its eigenvalues.
/// Negative eigenvalues contribute zero to the real part.
///
/// Returns [`LinalgError::NonFinite`] if either operand or their product contains a
/// non-finite value.
pub fn trace_sqrtm_product(
    a: MatrixView<'_, f64>,
    b: MatrixView<'_, f64>,
) -> Result<f64, LinalgError> {
    let dim = check_square(&a)?;
    check_square(&b)?;
    if a.shape() != b.shape() {
        return Err(LinalgError::DimensionMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    if dim == 0 {
        return Ok(0.0);
    }

    check_finite(a.as_slice())?;
    check_finite(b.as_slice())?;

    let mut product = vec![0.0; dim * dim];
    gemm(
        Transpose::None,
        Transpose::None,
        dim,
        dim,
        dim,
        1.0,
        a.as_slice(),
        b.as_slice(),
        None,
        &mut product,
    );
    check_finite(&product)?;

    let root = sqrtm_psd(a)?;

    let mut temp = vec![0.0; dim * dim];
    gemm(
        Transpose::None,
        Transpose::None,
        dim,
        dim,
        dim,
        1.0,
        root.as_slice(),
        b.as_slice(),
        None,
        &mut temp,
    );

    let mut similar = Matrix::new(0.0, dim, dim);
    gemm(
        Transpose::None,
        Transpose::None,
        dim,
        dim,
        dim,
        1.0,
        &temp,
        root.as_slice(),
        None,
        similar.as_mut_slice(),
    );

    // Rounding leaves `s * b * s` slightly asymmetric.
    for i in 0..dim {
        for j in 0..i {
            let avg = 0.5 * (similar[(i, j)] + similar[(j, i)]);
            similar[(i, j)] = avg;
            similar[(j, i)] = avg;
        }
    }

    let (eigenvalues, _) = symmetric_eigen(similar.as_view())?;
    Ok(eigenvalues.iter().map(|mu| mu.max(0.0).sqrt()).sum())
}
