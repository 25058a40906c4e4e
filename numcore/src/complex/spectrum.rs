//! Element-wise kernels over frequency-domain data.
//!
//! All kernels process `out.len()` elements; the operand slices must be at
//! least that long.

use num_traits::Float;
use rayon::prelude::*;

use common::parallel::chunk_len;

use super::Complex;
use crate::cast;

/// Lower bound applied to normalization divisors so empty bins yield zero
/// instead of NaN.
pub const MIN_SPECTRUM_MAGNITUDE: f64 = 1.0e-20;

/// Normalized cross-power spectrum used for phase correlation.
///
/// `out[i] = n / max(1e-20, |n|)` with `n = a[i] * conj(b[i])`.
pub fn phase_correlation_matrix<T: Float>(
    out: &mut [Complex<T>],
    a: &[Complex<T>],
    b: &[Complex<T>],
) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());

    let floor: T = cast(MIN_SPECTRUM_MAGNITUDE);
    for ((o, &a), &b) in out.iter_mut().zip(a).zip(b) {
        let n = a * b.conj();
        *o = n / n.mag().max(floor);
    }
}

/// Cross-power spectrum normalized by the operand magnitudes.
///
/// `out[i] = (b[i] * conj(a[i])) / max(1e-20, |a[i]| * |b[i]|)`.
pub fn cross_power_spectrum_matrix<T: Float>(
    out: &mut [Complex<T>],
    a: &[Complex<T>],
    b: &[Complex<T>],
) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());

    let floor: T = cast(MIN_SPECTRUM_MAGNITUDE);
    for ((o, &a), &b) in out.iter_mut().zip(a).zip(b) {
        *o = (b * a.conj()) / (a.mag() * b.mag()).max(floor);
    }
}

/// Parallel [`phase_correlation_matrix`] over disjoint output chunks.
pub fn par_phase_correlation_matrix<T: Float + Send + Sync>(
    out: &mut [Complex<T>],
    a: &[Complex<T>],
    b: &[Complex<T>],
) {
    par_kernel(out, a, b, phase_correlation_matrix);
}

/// Parallel [`cross_power_spectrum_matrix`] over disjoint output chunks.
pub fn par_cross_power_spectrum_matrix<T: Float + Send + Sync>(
    out: &mut [Complex<T>],
    a: &[Complex<T>],
    b: &[Complex<T>],
) {
    par_kernel(out, a, b, cross_power_spectrum_matrix);
}

fn par_kernel<T, F>(out: &mut [Complex<T>], a: &[Complex<T>], b: &[Complex<T>], kernel: F)
where
    T: Float + Send + Sync,
    F: Fn(&mut [Complex<T>], &[Complex<T>], &[Complex<T>]) + Sync,
{
    assert!(
        a.len() >= out.len() && b.len() >= out.len(),
        "operands ({}, {}) shorter than output ({})",
        a.len(),
        b.len(),
        out.len()
    );
    if out.is_empty() {
        return;
    }

    let chunk_size = chunk_len(out.len());
    out.par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let start = chunk_idx * chunk_size;
            let end = start + chunk.len();
            kernel(chunk, &a[start..end], &b[start..end]);
        });
}
