/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

/// Indicate whether a row-major operand of [`crate::gemm`] is read as stored or as its
/// transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// Use a provided matrix directly.
    None,
    /// Use the transpose of a matrix.
    Ordinary,
}

impl Transpose {
    /// Call exactly one of the arguments depending on the value of `self` and return the
    /// result.
    pub fn call<F, G, T>(&self, if_none: F, if_transpose: G) -> T
    where
        F: FnOnce() -> T,
        G: FnOnce() -> T,
    {
        match self {
            Self::None => if_none(),
            Self::Ordinary => if_transpose(),
        }
    }
}
