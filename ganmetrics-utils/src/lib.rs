/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

mod element;
pub use element::Element;

pub mod tensor;
pub use tensor::{TensorError, TensorView};

// Views
pub mod views;

#[cfg(feature = "testing")]
#[doc(hidden)]
pub mod tracing;
