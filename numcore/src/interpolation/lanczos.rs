use std::f64::consts::PI;

use common::Buffer2View;

use super::{
    convolve, grid_origin, BidimensionalInterpolation, BorderPolicy, Clamping, LanczosConfig,
};
use crate::image::Sample;

/// Filter taps per axis kept on the stack; larger orders allocate.
const STACK_TAPS: usize = 64;

/// Normalized sinc, `sin(pi x) / (pi x)`, 1 near the origin.
#[inline]
pub fn sinc(x: f64) -> f64 {
    let x = x * PI;
    if x.abs() > 1.0e-7 {
        x.sin() / x
    } else {
        1.0
    }
}

/// Lanczos filter of order `n` at `x`.
///
/// Exactly zero at nonzero integers and outside `(-n, n)`.
#[inline]
pub fn lanczos_kernel(x: f64, n: usize) -> f64 {
    let a = x.abs();
    let nf = n as f64;
    if a >= nf || (a != 0.0 && a.fract() == 0.0) {
        return 0.0;
    }
    sinc(x) * sinc(x / nf)
}

/// Lanczos interpolation with filter values computed per call.
#[derive(Debug, Clone)]
pub struct LanczosInterpolation<'a, T> {
    data: Buffer2View<'a, T>,
    order: usize,
    clamping: Clamping,
    border: BorderPolicy,
}

super::impl_clamping_accessors!(LanczosInterpolation);

impl<'a, T: Sample> LanczosInterpolation<'a, T> {
    /// Order and clamping threshold are forced into their valid ranges.
    pub fn new(data: Buffer2View<'a, T>, config: LanczosConfig) -> Self {
        let config = config.sanitized();
        tracing::trace!(
            "Lanczos-{} interpolation over {}x{} samples, clamping {:?}",
            config.order,
            data.width(),
            data.height(),
            config.clamping.then_some(config.clamping_threshold)
        );
        Self {
            data,
            order: config.order,
            clamping: Clamping::from_config(&config),
            border: config.border,
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<T: Sample> BidimensionalInterpolation for LanczosInterpolation<'_, T> {
    fn interpolate(&self, x: f64, y: f64) -> f64 {
        let width = self.data.width();
        let height = self.data.height();
        debug_assert!(width > 0 && height > 0, "empty interpolation source");
        debug_assert!(
            x >= 0.0 && x < width as f64 && y >= 0.0 && y < height as f64,
            "({}, {}) outside {}x{} source",
            x,
            y,
            width,
            height
        );

        let x0 = grid_origin(x, width);
        let y0 = grid_origin(y, height);
        let dx = x - x0 as f64;
        let dy = y - y0 as f64;

        let n = self.order;
        let taps = 2 * n;
        let mut stack = [0.0; 2 * STACK_TAPS];
        let mut heap = Vec::new();
        let weights: &mut [f64] = if taps <= STACK_TAPS {
            &mut stack[..2 * taps]
        } else {
            heap.resize(2 * taps, 0.0);
            &mut heap
        };
        let (lx, ly) = weights.split_at_mut(taps);
        for k in 0..taps {
            let j = k as f64 - (n as f64 - 1.0);
            lx[k] = lanczos_kernel(j - dx, n);
            ly[k] = lanczos_kernel(j - dy, n);
        }

        convolve(
            &self.data,
            x0,
            y0,
            lx,
            ly,
            self.border,
            self.clamping.active_threshold(),
        )
    }

    #[inline]
    fn width(&self) -> usize {
        self.data.width()
    }

    #[inline]
    fn height(&self) -> usize {
        self.data.height()
    }

    #[inline]
    fn border(&self) -> BorderPolicy {
        self.border
    }
}
