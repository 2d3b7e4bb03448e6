/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

use crate::views::MatrixView;

/// A borrowed, row-major n-dimensional array with a leading sample dimension.
///
/// This is the host-side form of activations exported from a deep learning framework
/// (for example a `(batch, channels, height, width)` feature map). It exists so such
/// values can be handed to sample-based metrics after an explicit conversion to a
/// 2-dimensional [`MatrixView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensorView<'a, T> {
    data: &'a [T],
    shape: &'a [usize],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TensorError {
    #[error("tensor with shape {shape:?} needs {expected} elements but was given {len}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        len: usize,
    },
    #[error("tensor shape {0:?} overflows usize")]
    Overflow(Vec<usize>),
    #[error("expected a tensor with at least 2 dimensions, got {0}")]
    RankTooLow(usize),
}

impl<'a, T> TensorView<'a, T> {
    /// Construct a tensor view over `data` with the given `shape`.
    ///
    /// The product of `shape` must equal `data.len()`. A rank-0 shape describes a single
    /// scalar.
    pub fn try_new(data: &'a [T], shape: &'a [usize]) -> Result<Self, TensorError> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| TensorError::Overflow(shape.to_vec()))?;

        if expected != data.len() {
            return Err(TensorError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                len: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Return the shape of the tensor.
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Return the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Return the flat row-major data.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Reinterpret the tensor as a `(shape[0], prod(shape[1..]))` matrix.
    ///
    /// Rank-2 tensors map directly onto a matrix. Tensors of higher rank have all trailing
    /// dimensions collapsed into a single feature dimension. Tensors of rank 0 or 1 are
    /// rejected; no other reshaping is attempted.
    pub fn flatten_trailing(&self) -> Result<MatrixView<'a, T>, TensorError> {
        let (&nrows, trailing) = match self.shape.split_first() {
            Some(split) if self.rank() >= 2 => split,
            _ => return Err(TensorError::RankTooLow(self.rank())),
        };

        // The overall product was checked on construction, so the trailing product fits.
        let ncols: usize = trailing.iter().product();
        MatrixView::try_from(self.data, nrows, ncols).map_err(|err| {
            let err = err.as_static();
            TensorError::LengthMismatch {
                shape: self.shape.to_vec(),
                expected: err.nrows * err.ncols,
                len: err.len,
            }
        })
    }
}
