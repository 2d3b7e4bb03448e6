/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::num::NonZeroUsize;

/// Added inside every logarithm of the Inception and Mode scores so that zero
/// probabilities contribute `0 * ln(eps)` rather than `0 * -inf`.
pub const EPS: f64 = 1e-20;

/// A single nearest neighbor votes for each point in the k-NN two-sample score.
pub const K: NonZeroUsize = NonZeroUsize::new(1).unwrap();
