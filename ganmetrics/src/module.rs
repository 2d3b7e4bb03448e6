/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Uniform calling convention for the metrics in this crate.
//!
//! A [`MetricModule`] binds one metric function to a fixed set of parameters, so an
//! evaluation harness can hold every metric behind the same `call(samples)` shape:
//! ```rust
//! use ganmetrics::{InceptionScore, config::ScoreParams};
//! use ganmetrics_utils::views::MatrixView;
//!
//! let metric = InceptionScore::new(ScoreParams::new(1e-6).unwrap());
//! let probabilities = [0.9f32, 0.1, 0.2, 0.8];
//! let score = metric
//!     .call(MatrixView::try_from(&probabilities[..], 2, 2).unwrap())
//!     .unwrap();
//!
//! assert_eq!(metric.name(), "inception_score");
//! assert!(score > 1.0);
//! ```

use std::fmt::Debug;

use ganmetrics_utils::{Element, views::MatrixView};

use crate::{
    MetricResult,
    config::{Config, KnnParams, ScoreParams},
    frechet::{HostSamples, frechet_inception_distance},
    inception::{inception_score, mode_score},
    knn::{KnnScores, knn_scores_with},
};

/// A metric function with a fixed parameter type.
pub trait MetricFn {
    /// Name used when reporting the metric.
    const NAME: &'static str;

    /// The parameters bound once when the metric is constructed.
    type Params: Debug + Clone + Send + Sync;
}

/// Evaluation of a [`MetricFn`] on one argument pattern.
pub trait Evaluate<Args>: MetricFn {
    type Output;

    fn evaluate(&self, args: Args, params: &Self::Params) -> MetricResult<Self::Output>;
}

/// A metric function bound to fixed parameters.
///
/// Calling the module is exactly equivalent to calling the underlying function with the
/// bound parameters. The module holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct MetricModule<F>
where
    F: MetricFn,
{
    metric_fn: F,
    params: F::Params,
}

impl<F> MetricModule<F>
where
    F: MetricFn,
{
    /// Bind `metric_fn` to `params`.
    pub fn with_params(metric_fn: F, params: F::Params) -> Self {
        Self { metric_fn, params }
    }

    /// Invoke the bound function on `args`.
    pub fn call<Args>(&self, args: Args) -> MetricResult<F::Output>
    where
        F: Evaluate<Args>,
    {
        self.metric_fn.evaluate(args, &self.params)
    }

    pub fn params(&self) -> &F::Params {
        &self.params
    }

    pub fn name(&self) -> &'static str {
        F::NAME
    }
}

///////////////
// Functions //
///////////////

/// See [`inception_score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InceptionFn;

impl MetricFn for InceptionFn {
    const NAME: &'static str = "inception_score";
    type Params = ScoreParams;
}

impl<'a, T: Element> Evaluate<MatrixView<'a, T>> for InceptionFn {
    type Output = f64;

    fn evaluate(
        &self,
        probabilities: MatrixView<'a, T>,
        params: &ScoreParams,
    ) -> MetricResult<f64> {
        Ok(inception_score(probabilities, params.eps()))
    }
}

/// See [`mode_score`]. Arguments are `(generated, real)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFn;

impl MetricFn for ModeFn {
    const NAME: &'static str = "mode_score";
    type Params = ScoreParams;
}

impl<'a, 'b, T: Element> Evaluate<(MatrixView<'a, T>, MatrixView<'b, T>)> for ModeFn {
    type Output = f64;

    fn evaluate(
        &self,
        (generated, real): (MatrixView<'a, T>, MatrixView<'b, T>),
        params: &ScoreParams,
    ) -> MetricResult<f64> {
        mode_score(generated, real, params.eps())
    }
}

/// See [`frechet_inception_distance`]. Arguments are `(&samples_a, &samples_b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrechetFn;

impl MetricFn for FrechetFn {
    const NAME: &'static str = "frechet_inception_distance";
    type Params = ();
}

impl<A, B> Evaluate<(&A, &B)> for FrechetFn
where
    A: HostSamples + ?Sized,
    B: HostSamples + ?Sized,
{
    type Output = f64;

    fn evaluate(&self, (samples_a, samples_b): (&A, &B), _: &()) -> MetricResult<f64> {
        frechet_inception_distance(samples_a, samples_b)
    }
}

/// See [`crate::knn_scores`]. Arguments are `(d_xx, d_xy, d_yy)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnnFn;

impl MetricFn for KnnFn {
    const NAME: &'static str = "knn_scores";
    type Params = KnnParams;
}

impl<'a, T: Element> Evaluate<(MatrixView<'a, T>, MatrixView<'a, T>, MatrixView<'a, T>)>
    for KnnFn
{
    type Output = KnnScores;

    fn evaluate(
        &self,
        (d_xx, d_xy, d_yy): (MatrixView<'a, T>, MatrixView<'a, T>, MatrixView<'a, T>),
        params: &KnnParams,
    ) -> MetricResult<KnnScores> {
        knn_scores_with(d_xx, d_xy, d_yy, *params)
    }
}

/////////////
// Modules //
/////////////

pub type InceptionScore = MetricModule<InceptionFn>;
pub type ModeScore = MetricModule<ModeFn>;
pub type FrechetInceptionDistance = MetricModule<FrechetFn>;
pub type KnnScoresModule = MetricModule<KnnFn>;

impl MetricModule<InceptionFn> {
    pub fn new(params: ScoreParams) -> Self {
        Self::with_params(InceptionFn, params)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.score_params())
    }
}

impl MetricModule<ModeFn> {
    pub fn new(params: ScoreParams) -> Self {
        Self::with_params(ModeFn, params)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.score_params())
    }
}

impl MetricModule<FrechetFn> {
    pub fn new() -> Self {
        Self::with_params(FrechetFn, ())
    }
}

impl Default for MetricModule<FrechetFn> {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricModule<KnnFn> {
    pub fn new(params: KnnParams) -> Self {
        Self::with_params(KnnFn, params)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.knn_params())
    }
}
