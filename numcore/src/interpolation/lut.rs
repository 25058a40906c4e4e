use std::sync::OnceLock;

use common::parallel::parallel_chunked;
use common::Buffer2View;

use super::{
    convolve, grid_origin, lanczos_kernel, BidimensionalInterpolation, BorderPolicy, Clamping,
    LanczosConfig,
};
use crate::image::Sample;

/// Table entries per unit of filter argument.
///
/// Quantization error of the filter values is about 1/2^16, below one
/// 16-bit sample step.
pub const LANCZOS_LUT_RESOLUTION: usize = 65535;

/// Filter orders with precomputed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanczosLutOrder {
    Three,
    Four,
    Five,
}

impl LanczosLutOrder {
    #[inline]
    pub const fn order(self) -> usize {
        match self {
            LanczosLutOrder::Three => 3,
            LanczosLutOrder::Four => 4,
            LanczosLutOrder::Five => 5,
        }
    }

    /// Process-wide table for this order, built on first use.
    ///
    /// Entry `i` holds `L(i / LANCZOS_LUT_RESOLUTION)` for `i` in
    /// `0..=order * LANCZOS_LUT_RESOLUTION`.
    pub fn table(self) -> &'static [f32] {
        static LANCZOS3_LUT: OnceLock<Vec<f32>> = OnceLock::new();
        static LANCZOS4_LUT: OnceLock<Vec<f32>> = OnceLock::new();
        static LANCZOS5_LUT: OnceLock<Vec<f32>> = OnceLock::new();

        let cell = match self {
            LanczosLutOrder::Three => &LANCZOS3_LUT,
            LanczosLutOrder::Four => &LANCZOS4_LUT,
            LanczosLutOrder::Five => &LANCZOS5_LUT,
        };
        cell.get_or_init(|| build_table(self.order()))
    }
}

impl TryFrom<usize> for LanczosLutOrder {
    type Error = usize;

    fn try_from(order: usize) -> Result<Self, usize> {
        match order {
            3 => Ok(LanczosLutOrder::Three),
            4 => Ok(LanczosLutOrder::Four),
            5 => Ok(LanczosLutOrder::Five),
            other => Err(other),
        }
    }
}

fn build_table(n: usize) -> Vec<f32> {
    let len = n * LANCZOS_LUT_RESOLUTION + 1;
    tracing::debug!("Building Lanczos-{} lookup table ({} entries)", n, len);
    let resolution = LANCZOS_LUT_RESOLUTION as f64;
    let mut table = vec![0.0f32; len];
    parallel_chunked(&mut table, |i| lanczos_kernel(i as f64 / resolution, n) as f32);
    table
}

/// Lanczos interpolation of order 3, 4 or 5 with tabulated filter values.
#[derive(Debug, Clone)]
pub struct LanczosLutInterpolation<'a, T> {
    data: Buffer2View<'a, T>,
    order: LanczosLutOrder,
    lut: &'static [f32],
    clamping: Clamping,
    border: BorderPolicy,
}

super::impl_clamping_accessors!(LanczosLutInterpolation);

impl<'a, T: Sample> LanczosLutInterpolation<'a, T> {
    /// `config.order` is ignored; the filter order is `order`.
    pub fn new(data: Buffer2View<'a, T>, order: LanczosLutOrder, config: LanczosConfig) -> Self {
        let config = config.sanitized();
        Self {
            data,
            order,
            lut: order.table(),
            clamping: Clamping::from_config(&config),
            border: config.border,
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order.order()
    }

    /// Tabulated filter value at `|d0 - d| / LANCZOS_LUT_RESOLUTION`, zero
    /// beyond the filter support.
    #[inline]
    fn lookup(&self, d0: isize, d: isize) -> f64 {
        self.lut
            .get(d0.abs_diff(d))
            .map_or(0.0, |&v| f64::from(v))
    }
}

impl<T: Sample> BidimensionalInterpolation for LanczosLutInterpolation<'_, T> {
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
        let resolution = LANCZOS_LUT_RESOLUTION as f64;
        let dx = ((x - x0 as f64) * resolution).round() as isize;
        let dy = ((y - y0 as f64) * resolution).round() as isize;

        let n = self.order() as isize;
        let mut lx = [0.0; 10];
        let mut ly = [0.0; 10];
        for (k, j) in (-n + 1..=n).enumerate() {
            let d0 = j * LANCZOS_LUT_RESOLUTION as isize;
            lx[k] = self.lookup(d0, dx);
            ly[k] = self.lookup(d0, dy);
        }

        let taps = 2 * self.order();
        convolve(
            &self.data,
            x0,
            y0,
            &lx[..taps],
            &ly[..taps],
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
