/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use thiserror::Error;

use crate::Element;

/// Backing storage for the view types in this module.
///
/// Implementations wrap an immutable or mutable slice reference (or an owned boxed slice)
/// so that [`MatrixBase`] can share one code path across borrowed and owned data.
///
/// # Safety
///
/// `as_slice` must be idempotent: it must **always** return the same slice with the same
/// length. Unsafe row accessors rely on this.
pub unsafe trait DenseData {
    type Elem;

    /// Return the underlying data as a slice.
    fn as_slice(&self) -> &[Self::Elem];
}

/// A mutable companion to `DenseData`.
///
/// # Safety
///
/// In addition to the requirements of [`DenseData`], `as_mut_slice` must span the exact
/// same memory as `as_slice`.
pub unsafe trait MutDenseData: DenseData {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

// SAFETY: Returns the wrapped slice unchanged.
unsafe impl<T> DenseData for &[T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the wrapped slice unchanged.
unsafe impl<T> DenseData for &mut [T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the wrapped slice unchanged, spanning the same memory as `as_slice`.
unsafe impl<T> MutDenseData for &mut [T] {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

// SAFETY: Returns the owned allocation unchanged.
unsafe impl<T> DenseData for Box<[T]> {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the owned allocation unchanged, spanning the same memory as `as_slice`.
unsafe impl<T> MutDenseData for Box<[T]> {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

////////////
// Matrix //
////////////

/// A dense, row-major 2-dimensional matrix.
///
/// Sample matrices are laid out as `(n_samples, n_features)` and distance matrices as
/// `(n_query, n_reference)`. When the storage is an immutable slice, the view is `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBase<T>
where
    T: DenseData,
{
    data: T,
    nrows: usize,
    ncols: usize,
}

/// A `'static` variant of [`TryFromError`] that only records the offending sizes.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix view with {nrows} rows and {ncols} columns over a slice \
     of length {len}"
)]
pub struct TryFromErrorLight {
    pub len: usize,
    pub nrows: usize,
    pub ncols: usize,
}

/// Returned when the length of the backing data does not equal `nrows * ncols`.
#[derive(Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix view with {nrows} rows and {ncols} columns over a slice \
     of length {}", data.as_slice().len()
)]
pub struct TryFromError<T: DenseData> {
    data: T,
    nrows: usize,
    ncols: usize,
}

// Manually implement `fmt::Debug` so we don't require `T::Debug`.
impl<T: DenseData> fmt::Debug for TryFromError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFromError")
            .field("data_len", &self.data.as_slice().len())
            .field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .finish()
    }
}

impl<T: DenseData> TryFromError<T> {
    /// Drop the borrowed data so the error can outlive it.
    pub fn as_static(&self) -> TryFromErrorLight {
        TryFromErrorLight {
            len: self.data.as_slice().len(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T> MatrixBase<Box<[T]>> {
    /// Construct a new matrix with every entry set to `value`.
    pub fn new(value: T, nrows: usize, ncols: usize) -> Self
    where
        T: Clone,
    {
        let data: Box<[T]> = vec![value; nrows * ncols].into_boxed_slice();
        Self { data, nrows, ncols }
    }
}

impl<T> MatrixBase<T>
where
    T: DenseData,
{
    /// Try to construct a `MatrixBase` over the provided base. If the size of the base
    /// is incorrect, return a `TryFromError` containing the base.
    ///
    /// The length of the base must be equal to `nrows * ncols`.
    pub fn try_from(data: T, nrows: usize, ncols: usize) -> Result<Self, TryFromError<T>> {
        let len = data.as_slice().len();
        if len != nrows * ncols {
            Err(TryFromError { data, nrows, ncols })
        } else {
            Ok(Self { data, nrows, ncols })
        }
    }

    /// Construct a single-row matrix over `data`.
    pub fn row_vector(data: T) -> Self {
        let ncols = data.as_slice().len();
        Self {
            data,
            nrows: 1,
            ncols,
        }
    }

    /// Return the number of columns in the matrix.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the number of rows in the matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return `true` if the matrix has the same number of rows and columns.
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Return the underlying data as a slice.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    /// Return the underlying data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[T::Elem] {
        assert!(
            row < self.nrows(),
            "tried to access row {row} of a matrix with {} rows",
            self.nrows()
        );

        // SAFETY: `row` is in-bounds.
        unsafe { self.get_row_unchecked(row) }
    }

    /// Returns the requested row without boundschecking.
    ///
    /// # Safety
    ///
    /// `row < self.nrows()` must hold.
    pub unsafe fn get_row_unchecked(&self, row: usize) -> &[T::Elem] {
        debug_assert!(row < self.nrows);
        let ncols = self.ncols;
        let start = row * ncols;

        debug_assert!(start + ncols <= self.as_slice().len());
        // SAFETY: Constructors guarantee `self.as_slice().len() == nrows * ncols` and
        // `as_slice` is idempotent, so `start..start + ncols` is in-bounds.
        unsafe { self.as_slice().get_unchecked(start..start + ncols) }
    }

    /// Return a iterator over all rows in the matrix.
    ///
    /// Rows are yielded sequentially beginning with row 0. A matrix with zero columns
    /// yields no rows.
    pub fn row_iter(&self) -> impl ExactSizeIterator<Item = &[T::Elem]> {
        // `chunks_exact` panics on a zero chunk size.
        self.data.as_slice().chunks_exact(self.ncols.max(1))
    }

    /// Return a mutable iterator over all rows in the matrix.
    pub fn row_iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T::Elem]>
    where
        T: MutDenseData,
    {
        let ncols = self.ncols.max(1);
        self.data.as_mut_slice().chunks_exact_mut(ncols)
    }

    /// Iterate over the diagonal entries `(i, i)` for `i < min(nrows, ncols)`.
    pub fn diagonal(&self) -> impl Iterator<Item = &T::Elem> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(move |i| &self[(i, i)])
    }

    /// Return a view over the matrix.
    pub fn as_view(&self) -> MatrixView<'_, T::Elem> {
        MatrixBase {
            data: self.as_slice(),
            nrows: self.nrows(),
            ncols: self.ncols(),
        }
    }

    /// Return a copy of the matrix that owns its data.
    pub fn to_owned(&self) -> Matrix<T::Elem>
    where
        T::Elem: Clone,
    {
        Matrix {
            data: self.data.as_slice().into(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Convert every entry to `f64`, preserving the shape.
    pub fn to_f64(&self) -> Matrix<f64>
    where
        T::Elem: Element,
    {
        Matrix {
            data: self.as_slice().iter().map(|&x| x.to_f64()).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Returns a reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// `row < self.nrows()` and `col < self.ncols()` must hold.
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> &T::Elem {
        debug_assert!(row < self.nrows);
        debug_assert!(col < self.ncols);
        // SAFETY: Forwarded to the caller.
        unsafe { self.as_slice().get_unchecked(row * self.ncols + col) }
    }
}

/// An owning row-major matrix.
pub type Matrix<T> = MatrixBase<Box<[T]>>;

/// A borrowed row-major matrix. Metrics accept this so callers keep ownership of their
/// samples and distance matrices.
pub type MatrixView<'a, T> = MatrixBase<&'a [T]>;

/// Return a reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> Index<(usize, usize)> for MatrixBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );

        // SAFETY: We have checked that `row` and `col` are in-bounds.
        unsafe { self.get_unchecked(row, col) }
    }
}

/// Return a mutable reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> IndexMut<(usize, usize)> for MatrixBase<T>
where
    T: MutDenseData,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );

        let ncols = self.ncols;
        &mut self.data.as_mut_slice()[row * ncols + col]
    }
}

///////////
// Tests //
///////////
