/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use half::f16;

/// Numeric element types accepted by the metrics.
///
/// All metric arithmetic happens in `f64`. Inputs may arrive in any of the element types
/// commonly produced by feature extractors or stored in embedding files: full and half
/// precision floats as well as byte-quantized values.
///
/// The conversion is exact for every implementing type.
pub trait Element: Copy + std::fmt::Debug + Send + Sync + 'static {
    /// Convert `self` to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! lossless_impl {
    ($($T:ty),+ $(,)?) => {
        $(
            impl Element for $T {
                #[inline(always)]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }
            }
        )+
    };
}

lossless_impl!(f32, f64, u8, i8);

impl Element for f16 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
}
