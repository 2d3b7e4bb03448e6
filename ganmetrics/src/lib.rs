/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod config;
pub mod error;

// Metrics
mod frechet;
mod inception;
mod knn;

pub mod module;

// Top level exports.
pub use error::{MetricError, MetricErrorKind, MetricResult, ShapeError};
pub use frechet::{HostSamples, frechet_inception_distance};
pub use inception::{inception_score, mode_score};
pub use knn::{Confusion, KnnScores, knn_scores};
pub use module::{
    FrechetInceptionDistance, InceptionScore, KnnScoresModule, MetricModule, ModeScore,
};
