/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod defaults;

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//////////////////
// Score Params //
//////////////////

/// Parameters shared by the Inception and Mode scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    eps: f64,
}

impl ScoreParams {
    /// Construct parameters with the given logarithm guard.
    ///
    /// `eps` must be finite and non-negative.
    pub fn new(eps: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            eps: check_eps(eps)?,
        })
    }

    /// The value added inside each logarithm.
    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self { eps: defaults::EPS }
    }
}

////////////////
// Knn Params //
////////////////

/// Parameters of the k-NN two-sample score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnParams {
    k: NonZeroUsize,
}

impl KnnParams {
    /// Construct parameters voting with `k` neighbors. Fails if `k == 0`.
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        Ok(Self { k: check_k(k)? })
    }

    pub fn k(&self) -> NonZeroUsize {
        self.k
    }
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { k: defaults::K }
    }
}

////////////
// Config //
////////////

/// Validated parameters for every metric in this crate.
///
/// Obtain one through [`Builder::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    eps: f64,
    k: NonZeroUsize,
}

impl Config {
    /// Attempt to construct a [`Config`] from a builder.
    ///
    /// See: [`Builder::build`].
    pub fn try_from_builder(builder: Builder) -> Result<Self, ConfigError> {
        let eps = match builder.eps {
            Some(eps) => check_eps(eps)?,
            None => defaults::EPS,
        };

        let k = match builder.k {
            Some(k) => check_k(k)?,
            None => defaults::K,
        };

        Ok(Self { eps, k })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn k(&self) -> NonZeroUsize {
        self.k
    }

    /// Parameters for [`crate::InceptionScore`] and [`crate::ModeScore`].
    pub fn score_params(&self) -> ScoreParams {
        ScoreParams { eps: self.eps }
    }

    /// Parameters for [`crate::KnnScoresModule`].
    pub fn knn_params(&self) -> KnnParams {
        KnnParams { k: self.k }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eps: defaults::EPS,
            k: defaults::K,
        }
    }
}

fn check_eps(eps: f64) -> Result<f64, ConfigErrorInner> {
    if eps.is_finite() && eps >= 0.0 {
        Ok(eps)
    } else {
        Err(ConfigErrorInner::Eps(eps))
    }
}

fn check_k(k: usize) -> Result<NonZeroUsize, ConfigErrorInner> {
    NonZeroUsize::new(k).ok_or(ConfigErrorInner::ZeroK)
}

/// Errors that can occur when building a [`Config`] or one of the parameter structs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(transparent)]
pub struct ConfigError {
    #[from]
    inner: ConfigErrorInner,
}

impl From<ConfigError> for crate::MetricError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        crate::MetricError::new(crate::MetricErrorKind::Config, error)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
enum ConfigErrorInner {
    #[error("parameter \"eps\" ({0}) must be finite and non-negative")]
    Eps(f64),
    #[error("parameter \"k\" invalid because it cannot be zero")]
    ZeroK,
}

/////////////
// Builder //
/////////////

/// Unvalidated metric parameters.
///
/// The builder deserializes from the parameter block of an evaluation harness, with every
/// field optional:
/// ```rust
/// let builder: ganmetrics::config::Builder =
///     serde_json::from_str(r#"{ "eps": 1e-6, "k": 3 }"#).unwrap();
/// let config = builder.build().unwrap();
/// assert_eq!(config.eps(), 1e-6);
/// assert_eq!(config.k().get(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Builder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    k: Option<usize>,
}

impl Builder {
    /// Create a builder where every parameter takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the value added inside each logarithm of the Inception and Mode scores.
    ///
    /// Parameter `eps` must be finite and non-negative.
    pub fn eps(&mut self, eps: f64) -> &mut Self {
        self.eps = Some(eps);
        self
    }

    /// Configure the number of neighbors voting in the k-NN two-sample score.
    ///
    /// Parameter `k` must be non-zero.
    pub fn k(&mut self, k: usize) -> &mut Self {
        self.k = Some(k);
        self
    }

    /// Attempt to build the config. Fails if:
    ///
    /// * `eps` is negative, infinite or NaN.
    /// * `k` is zero.
    pub fn build(self) -> Result<Config, ConfigError> {
        Config::try_from_builder(self)
    }
}

///////////
// Tests //
///////////
