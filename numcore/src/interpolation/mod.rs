//! Lanczos interpolation of two-dimensional sample planes.
//!
//! A Lanczos filter of order n is
//!
//! ```text
//! L(x; n) = sinc(x) * sinc(x/n)   for |x| < n
//! L(x; n) = 0                     otherwise,   sinc(x) = sin(pi x) / (pi x)
//! ```
//!
//! Interpolation convolves the 2n x 2n neighborhood of the sample grid cell
//! containing `(x, y)` with `L(x) * L(y)`. Negative filter lobes produce
//! undershoot (ringing) next to sharp edges; the optional clamping mechanism
//! attenuates the negative part of the convolution once its ratio to the
//! positive part exceeds a threshold.
//!
//! - [`LanczosInterpolation`]: filter values computed on every call, any order.
//! - [`LanczosLutInterpolation`]: orders 3, 4 and 5 from shared lookup tables.
//! - [`resample`]: parallel evaluation over an output grid.

mod lanczos;
mod lut;
mod resample;


pub use lanczos::{lanczos_kernel, sinc, LanczosInterpolation};
pub use lut::{LanczosLutInterpolation, LanczosLutOrder, LANCZOS_LUT_RESOLUTION};
pub use resample::resample;

use common::Buffer2View;

use crate::image::Sample;

/// Default clamping threshold.
pub const DEFAULT_CLAMPING_THRESHOLD: f64 = 0.3;

/// Sample value used for filter taps that fall outside the source plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderPolicy {
    /// Reflect about the first/last row or column: `-i` and `2*extent - 2 - i`.
    #[default]
    Mirror,
    /// Constant value.
    Fill(f64),
}

impl BorderPolicy {
    /// Value written for positions that cannot be interpolated at all.
    #[inline]
    pub fn fill_value(&self) -> f64 {
        match *self {
            BorderPolicy::Mirror => 0.0,
            BorderPolicy::Fill(v) => v,
        }
    }
}

/// Interpolation of a sample plane at real-valued coordinates.
pub trait BidimensionalInterpolation {
    /// Interpolated value at `(x, y)`, `0 <= x < width`, `0 <= y < height`.
    fn interpolate(&self, x: f64, y: f64) -> f64;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn border(&self) -> BorderPolicy;
}

/// Lanczos interpolation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanczosConfig {
    /// Filter order n, at least 1.
    /// Ignored by [`LanczosLutInterpolation`], whose order is fixed by its table.
    pub order: usize,
    /// Enables deringing.
    pub clamping: bool,
    /// Ratio of negative to positive convolution above which the negative part
    /// is attenuated, in `[0, 1]`. Lower values dering more aggressively.
    pub clamping_threshold: f64,
    pub border: BorderPolicy,
}

impl Default for LanczosConfig {
    fn default() -> Self {
        Self {
            order: 3,
            clamping: true,
            clamping_threshold: DEFAULT_CLAMPING_THRESHOLD,
            border: BorderPolicy::Mirror,
        }
    }
}

impl LanczosConfig {
    /// Default configuration with the given filter order.
    pub fn with_order(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Configuration following the signed-threshold convention: a negative
    /// `clamp` disables clamping, anything else enables it.
    pub fn with_clamp(order: usize, clamp: f64) -> Self {
        Self {
            order,
            clamping: clamp >= 0.0,
            clamping_threshold: clamp,
            border: BorderPolicy::Mirror,
        }
        .sanitized()
    }

    /// Copy with order and threshold forced into their valid ranges.
    pub fn sanitized(self) -> Self {
        Self {
            order: self.order.max(1),
            clamping_threshold: clamp_threshold(self.clamping_threshold),
            ..self
        }
    }
}

#[inline]
fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        DEFAULT_CLAMPING_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// Runtime-tunable clamping state shared by both interpolators.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Clamping {
    enabled: bool,
    threshold: f64,
}

impl Clamping {
    fn from_config(config: &LanczosConfig) -> Self {
        Self {
            enabled: config.clamping,
            threshold: clamp_threshold(config.clamping_threshold),
        }
    }

    #[inline]
    fn active_threshold(&self) -> Option<f64> {
        self.enabled.then_some(self.threshold)
    }
}

macro_rules! impl_clamping_accessors {
    ($ty:ident) => {
        impl<T> $ty<'_, T> {
            #[inline]
            pub fn is_clamping_enabled(&self) -> bool {
                self.clamping.enabled
            }

            #[inline]
            pub fn enable_clamping(&mut self, enable: bool) {
                self.clamping.enabled = enable;
            }

            #[inline]
            pub fn disable_clamping(&mut self, disable: bool) {
                self.enable_clamping(!disable);
            }

            #[inline]
            pub fn clamping_threshold(&self) -> f64 {
                self.clamping.threshold
            }

            /// Sets the clamping threshold, clamped to `[0, 1]`.
            #[inline]
            pub fn set_clamping_threshold(&mut self, threshold: f64) {
                self.clamping.threshold = crate::interpolation::clamp_threshold(threshold);
            }

            #[inline]
            pub fn border(&self) -> crate::interpolation::BorderPolicy {
                self.border
            }

            #[inline]
            pub fn data(&self) -> &common::Buffer2View<'_, T> {
                &self.data
            }
        }
    };
}

pub(crate) use impl_clamping_accessors;

// ============================================================================
// Convolution core
// ============================================================================

/// Positive and negative partial sums of the convolution.
#[derive(Debug, Default)]
struct Accumulator {
    sp: f64,
    sn: f64,
    wp: f64,
    wn: f64,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, value: f64, weight: f64) {
        let s = value * weight;
        if s < 0.0 {
            self.sn -= s;
            self.wn -= weight;
        } else {
            self.sp += s;
            self.wp += weight;
        }
    }

    #[inline]
    fn finish(mut self, clamping_threshold: Option<f64>) -> f64 {
        if let Some(th) = clamping_threshold {
            if self.sp == 0.0 {
                return 0.0;
            }
            let r = self.sn / self.sp;
            if r >= 1.0 {
                return self.sp / self.wp;
            }
            if r > th {
                let r = (r - th) / (1.0 - th);
                let c = 1.0 - r * r;
                self.sn *= c;
                self.wn *= c;
            }
        }
        (self.sp - self.sn) / (self.wp - self.wn)
    }
}

/// Reflects index `i` into `[0, extent)`.
///
/// Indices more than one extent away (tiny planes under wide filters) are
/// clamped to the nearest edge after reflection.
#[inline]
pub(crate) fn mirror_index(i: isize, extent: usize) -> usize {
    let last = extent as isize - 1;
    let m = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    m.clamp(0, last.max(0)) as usize
}

/// Grid cell containing `v`, clamped into `[0, extent)`.
#[inline]
pub(crate) fn grid_origin(v: f64, extent: usize) -> usize {
    (v.trunc() as isize).clamp(0, extent as isize - 1) as usize
}

/// Convolves the 2n x 2n neighborhood whose top-left tap is at
/// `(x0 - n + 1, y0 - n + 1)` with the separable weights `lx[j] * ly[i]`.
pub(crate) fn convolve<T: Sample>(
    data: &Buffer2View<'_, T>,
    x0: usize,
    y0: usize,
    lx: &[f64],
    ly: &[f64],
    border: BorderPolicy,
    clamping_threshold: Option<f64>,
) -> f64 {
    debug_assert_eq!(lx.len(), ly.len());

    let width = data.width();
    let height = data.height();
    let offset = lx.len() as isize / 2 - 1;
    let mut acc = Accumulator::default();

    for (i, &wy) in ly.iter().enumerate() {
        let y = y0 as isize + i as isize - offset;
        let row = match border {
            BorderPolicy::Fill(v) if y < 0 || y >= height as isize => {
                for &wx in lx {
                    acc.add(v, wx * wy);
                }
                continue;
            }
            _ => mirror_index(y, height),
        };

        for (j, &wx) in lx.iter().enumerate() {
            let x = x0 as isize + j as isize - offset;
            let value = if x >= 0 && x < width as isize {
                data.get(x as usize, row).to_f64()
            } else {
                match border {
                    BorderPolicy::Fill(v) => v,
                    BorderPolicy::Mirror => data.get(mirror_index(x, width), row).to_f64(),
                }
            };
            acc.add(value, wx * wy);
        }
    }

    acc.finish(clamping_threshold)
}
