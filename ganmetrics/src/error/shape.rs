/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

/// Input matrices whose shapes are incompatible with the requested metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("class probabilities have {left} and {right} classes")]
    ClassMismatch { left: usize, right: usize },
    #[error("sample sets have {left} and {right} features")]
    FeatureMismatch { left: usize, right: usize },
    #[error("distance matrix `{name}` must be square, instead got {nrows}x{ncols}")]
    NotSquare {
        name: &'static str,
        nrows: usize,
        ncols: usize,
    },
    #[error("distance matrix `{name}` should be {expected:?}, instead got {got:?}")]
    BlockMismatch {
        name: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("cannot select {k} neighbors among {candidates} points")]
    TooFewCandidates { k: usize, candidates: usize },
}
