/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::{Debug, Display};

use ganmetrics_linalg::LinalgError;
use ganmetrics_utils::TensorError;

use super::ShapeError;

/// Convenience alias for a `Result<T, MetricError>`.
pub type MetricResult<T> = Result<T, MetricError>;

/// Common error type returned by every metric.
///
/// The runtime origin of an error is recorded by [`MetricError::kind`], while the typed
/// leaf error stays recoverable through the downcasting API.
/// ```rust
/// use ganmetrics::{MetricErrorKind, ShapeError, error::ErrorContext};
/// use ganmetrics_utils::views::MatrixView;
///
/// let x = [0.5f32, 0.5];
/// let y = [1.0f32, 0.0, 0.0];
/// let err = ganmetrics::mode_score(
///     MatrixView::row_vector(&x[..]),
///     MatrixView::row_vector(&y[..]),
///     1e-20,
/// )
/// .context("scoring the validation split")
/// .unwrap_err();
///
/// assert_eq!(err.kind(), MetricErrorKind::Shape);
/// assert!(err.to_string().contains("scoring the validation split"));
/// assert_eq!(
///     err.downcast_ref::<ShapeError>(),
///     Some(&ShapeError::ClassMismatch { left: 2, right: 3 }),
/// );
/// ```
///
/// # Backtraces
///
/// Backtraces are captured on construction if `RUST_BACKTRACE=1` is set.
#[derive(Debug)]
pub struct MetricError {
    kind: MetricErrorKind,
    error: anyhow::Error,
}

impl MetricError {
    /// Construct a new `MetricError` encapsulating `err`.
    ///
    /// # Attributes
    ///
    /// - `track_caller`: `err` is embedded inside a `Located` struct recording the file
    ///   and line of creation.
    ///
    /// - `inline(never)`: Keeps error construction out of the happy path.
    #[track_caller]
    #[inline(never)]
    pub fn new<E>(kind: MetricErrorKind, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            error: anyhow::Error::new(Located::new(err)),
        }
    }

    /// Attempt to downcast the error object to a concrete type.
    pub fn downcast<E>(self) -> Result<E, Self>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        match self.error.downcast::<E>() {
            Ok(value) => Ok(value),
            Err(error) => match error.downcast::<Located<E>>() {
                Ok(value) => Ok(value.err),
                Err(error) => Err(Self {
                    kind: self.kind,
                    error,
                }),
            },
        }
    }

    /// Attempt to downcast the error object by reference.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        match self.error.downcast_ref::<E>() {
            Some(err) => Some(err),
            None => self.error.downcast_ref::<Located<E>>().map(|e| &e.err),
        }
    }

    /// Attach the context to `Self` and return a new error.
    #[track_caller]
    #[inline(never)]
    pub fn context<C>(self, context: C) -> Self
    where
        C: Display + Debug + Send + Sync + 'static,
    {
        Self {
            kind: self.kind,
            error: self.error.context(Located::new(context)),
        }
    }

    /// Return the kind of the originally constructed error.
    pub fn kind(&self) -> MetricErrorKind {
        self.kind
    }
}

impl Display for MetricError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        // `{:?}` on `anyhow::Error` prints the whole context chain.
        write!(formatter, "MetricError: {:?}\n\n{:?}", self.kind, self.error)
    }
}

impl std::error::Error for MetricError {
    // The source chain is already part of `Display`.
}

impl From<ShapeError> for MetricError {
    #[track_caller]
    fn from(err: ShapeError) -> Self {
        Self::new(MetricErrorKind::Shape, err)
    }
}

impl From<LinalgError> for MetricError {
    #[track_caller]
    fn from(err: LinalgError) -> Self {
        Self::new(MetricErrorKind::Linalg, err)
    }
}

impl From<TensorError> for MetricError {
    #[track_caller]
    fn from(err: TensorError) -> Self {
        let kind = match err {
            TensorError::RankTooLow(_) => MetricErrorKind::Shape,
            _ => MetricErrorKind::Conversion,
        };
        Self::new(kind, err)
    }
}

/// Records the file and line where an error was first converted or where context was
/// attached.
#[derive(Debug)]
struct Located<T>
where
    T: Debug,
{
    err: T,
    location: &'static std::panic::Location<'static>,
}

impl<T> Located<T>
where
    T: Debug,
{
    #[track_caller]
    fn new(err: T) -> Self {
        Self {
            err,
            location: std::panic::Location::caller(),
        }
    }
}

impl<T> Display for Located<T>
where
    T: Display + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{} -- ({}:{})",
            self.err,
            self.location.file(),
            self.location.line()
        )
    }
}

impl<T> std::error::Error for Located<T>
where
    T: std::error::Error + Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.err.source()
    }
}

//////////////////
// ErrorContext //
//////////////////

/// Add context to a returned error that will be included in the source chain.
pub trait ErrorContext<T> {
    /// Attach the provided context to the error part of the result.
    fn context<C>(self, context: C) -> Result<T, MetricError>
    where
        C: Display + Debug + Send + Sync + 'static;

    /// Attach the provided context to the error part of the result.
    ///
    /// The function `f` will only be evaluated if `self` is an `Err`.
    fn with_context<F, C>(self, f: F) -> Result<T, MetricError>
    where
        C: Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    MetricError: From<E>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T, MetricError>
    where
        C: Display + Debug + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(MetricError::from(error).context(context)),
        }
    }

    #[track_caller]
    fn with_context<F, C>(self, f: F) -> Result<T, MetricError>
    where
        C: Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(MetricError::from(error).context(f())),
        }
    }
}

/////////////////////
// MetricErrorKind //
/////////////////////

/// Tags the origin of a [`MetricError`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MetricErrorKind {
    /// Input matrices have incompatible or invalid shapes.
    Shape,
    /// A dense linear algebra routine failed or received non-finite input.
    Linalg,
    /// A metric parameter is out of range.
    Config,
    /// Input data could not be viewed as a matrix.
    Conversion,
}
