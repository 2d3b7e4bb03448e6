/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use faer::{self, Par};

use super::{LinalgError, common::Transpose};

/// See the documentation for `gemm`.
///
/// The implementation may assume the the specified invariants hold for the sizes of the
/// intermediate arrays.
#[allow(clippy::too_many_arguments)]
pub(super) fn gemm_impl(
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
    let a = atranspose.call(
        || faer::mat::MatRef::from_row_major_slice(a, m, k),
        || faer::mat::MatRef::from_row_major_slice(a, k, m).transpose(),
    );

    let b = btranspose.call(
        || faer::mat::MatRef::from_row_major_slice(b, k, n),
        || faer::mat::MatRef::from_row_major_slice(b, n, k).transpose(),
    );

    let mut c = faer::mat::MatMut::from_row_major_slice_mut(c, m, n);

    // faer only accumulates or replaces, so an arbitrary `beta` is applied up front.
    let beta = match beta {
        Some(scale) => {
            if scale != 1.0 {
                c *= faer::Scale(scale);
            }
            faer::Accum::Add
        }
        None => faer::Accum::Replace,
    };

    // Sequential on purpose: repeated calls must be bit-for-bit reproducible.
    faer::linalg::matmul::matmul(c, beta, a, b, alpha, Par::Seq)
}

/// See the documentation for `symmetric_eigen`.
///
/// Only the lower triangle of `a` is read.
pub(super) fn symmetric_eigen_impl(
    dim: usize,
    a: &[f64],
    eigenvalues: &mut [f64],
    eigenvectors: &mut [f64],
) -> Result<(), LinalgError> {
    let a = faer::mat::MatRef::from_row_major_slice(a, dim, dim);
    let evd = a
        .self_adjoint_eigen(faer::Side::Lower)
        .map_err(|err| LinalgError::NoConvergence {
            dim,
            reason: format!("{err:?}"),
        })?;

    let mut eigenvalues = faer::col::ColMut::from_slice_mut(eigenvalues);
    eigenvalues.copy_from(evd.S().column_vector());

    let mut eigenvectors = faer::mat::MatMut::from_row_major_slice_mut(eigenvectors, dim, dim);
    eigenvectors.copy_from(evd.U());

    Ok(())
}
