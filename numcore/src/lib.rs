//! Numerical core for image-processing modules.
//!
//! - [`complex`]: complex arithmetic and frequency-domain batch kernels.
//! - [`chebyshev`]: Chebyshev approximation of vector-valued functions.
//! - [`interpolation`]: Lanczos bidimensional interpolation, direct and tabulated.
//! - [`statistics`]: robust statistics over image regions.

pub mod chebyshev;
pub mod complex;
pub mod image;
pub mod interpolation;
pub mod statistics;

pub use chebyshev::{ChebyshevFit, F32ChebyshevFit, F64ChebyshevFit};
pub use complex::Complex;
pub use image::{Aabb, ImageRegion, Sample, Vec2us};
pub use interpolation::{
    BidimensionalInterpolation, BorderPolicy, LanczosConfig, LanczosInterpolation,
    LanczosLutInterpolation, LanczosLutOrder,
};
pub use statistics::{ImageStatistics, StatisticsConfig, StatisticsData};

/// Converts a primitive number to the float type `T`.
///
/// Every primitive value is representable (possibly rounded) by `f32` and `f64`,
/// the types the generic engines are instantiated with.
#[inline]
pub(crate) fn cast<T: num_traits::Float, U: num_traits::ToPrimitive>(value: U) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
