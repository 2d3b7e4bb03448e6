/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub(crate) mod metric_error;
pub use metric_error::{ErrorContext, MetricError, MetricErrorKind, MetricResult};

mod shape;
pub use shape::ShapeError;
