/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use ganmetrics_linalg::{column_means, covariance, trace_sqrtm_product};
use ganmetrics_utils::{
    Element, TensorView,
    views::{Matrix, MatrixView},
};
use tracing::{debug, warn};

use crate::{MetricResult, ShapeError, error::ErrorContext};

/// Conversion of caller-side sample containers into an owned host matrix of `f64`
/// with shape `(n_samples, n_features)`.
///
/// Only the Fréchet distance goes through this adapter. The other metrics borrow their
/// inputs directly.
pub trait HostSamples {
    fn to_host_samples(&self) -> MetricResult<Matrix<f64>>;
}

impl<T: Element> HostSamples for MatrixView<'_, T> {
    fn to_host_samples(&self) -> MetricResult<Matrix<f64>> {
        Ok(self.to_f64())
    }
}

impl<T: Element> HostSamples for Matrix<T> {
    fn to_host_samples(&self) -> MetricResult<Matrix<f64>> {
        Ok(self.to_f64())
    }
}

/// Tensors of rank greater than two have their trailing dimensions flattened into the
/// feature dimension. Rank 0 and 1 tensors are a shape error.
impl<T: Element> HostSamples for TensorView<'_, T> {
    fn to_host_samples(&self) -> MetricResult<Matrix<f64>> {
        Ok(self.flatten_trailing()?.to_f64())
    }
}

/// Compute the Fréchet distance between Gaussians fitted to `samples_a` and `samples_b`.
///
/// ```text
/// |mu_a - mu_b|^2 + tr(cov_a) + tr(cov_b) - 2 * Re tr(sqrtm(cov_a * cov_b))
/// ```
/// where the covariances are unbiased (normalized by `n - 1`).
///
/// # Errors
///
/// * [`ShapeError::FeatureMismatch`] if the inputs disagree on the feature count.
/// * A shape error if a tensor input has rank below two.
/// * [`ganmetrics_linalg::LinalgError::NonFinite`] if either covariance or their product
///   is not finite. This is always the case with fewer than two samples in a set.
/// * [`ganmetrics_linalg::LinalgError::NoConvergence`] if an eigendecomposition fails.
pub fn frechet_inception_distance<A, B>(samples_a: &A, samples_b: &B) -> MetricResult<f64>
where
    A: HostSamples + ?Sized,
    B: HostSamples + ?Sized,
{
    let a = samples_a.to_host_samples()?;
    let b = samples_b.to_host_samples()?;
    if a.ncols() != b.ncols() {
        return Err(ShapeError::FeatureMismatch {
            left: a.ncols(),
            right: b.ncols(),
        }
        .into());
    }

    debug!(
        "frechet distance between {} and {} samples of dimension {}",
        a.nrows(),
        b.nrows(),
        a.ncols()
    );

    let mu_a = column_means(a.as_view());
    let mu_b = column_means(b.as_view());
    let mean_term = dot(&mu_a, &mu_a) + dot(&mu_b, &mu_b) - 2.0 * dot(&mu_a, &mu_b);

    let cov_a = covariance(a.as_view());
    let cov_b = covariance(b.as_view());
    let cross = trace_sqrtm_product(cov_a.as_view(), cov_b.as_view())
        .context("while taking the square root of the covariance product")?;

    let trace_a: f64 = cov_a.diagonal().sum();
    let trace_b: f64 = cov_b.diagonal().sum();

    let distance = mean_term + (trace_a + trace_b - 2.0 * cross);
    if !distance.is_finite() {
        warn!("frechet distance is not finite: {}", distance);
    }
    Ok(distance)
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    std::iter::zip(x, y).map(|(a, b)| a * b).sum()
}
