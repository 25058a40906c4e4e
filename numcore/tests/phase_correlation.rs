//! Shift recovery through the spectrum kernels and a real FFT.

use numcore::complex::spectrum::{
    cross_power_spectrum_matrix, par_phase_correlation_matrix, phase_correlation_matrix,
};
use numcore::complex::{as_components, from_components};
use numcore::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex as FftComplex;
use rustfft::FftPlanner;

const SIZE: usize = 32;

/// In-place 2D FFT of a square `SIZE x SIZE` row-major buffer.
fn fft2d(data: &mut [FftComplex<f64>], inverse: bool) {
    let mut planner = FftPlanner::new();
    let fft = if inverse {
        planner.plan_fft_inverse(SIZE)
    } else {
        planner.plan_fft_forward(SIZE)
    };

    fft.process(data);

    let mut column = vec![FftComplex::new(0.0, 0.0); SIZE];
    for x in 0..SIZE {
        for y in 0..SIZE {
            column[y] = data[y * SIZE + x];
        }
        fft.process(&mut column);
        for y in 0..SIZE {
            data[y * SIZE + x] = column[y];
        }
    }
}

fn spectrum(image: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<FftComplex<f64>> =
        image.iter().map(|&v| FftComplex::new(v, 0.0)).collect();
    fft2d(&mut buffer, false);

    // Both layouts are interleaved (re, im) pairs.
    let components: Vec<f64> = buffer.iter().flat_map(|c| [c.re, c.im]).collect();
    let values = from_components(&components).to_vec();
    assert_eq!(as_components(&values), &components[..]);
    values
}

fn peak(correlation: &[Complex<f64>]) -> (usize, usize) {
    let mut buffer: Vec<FftComplex<f64>> = as_components(correlation)
        .chunks_exact(2)
        .map(|c| FftComplex::new(c[0], c[1]))
        .collect();
    fft2d(&mut buffer, true);

    let (index, _) = buffer
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.re.total_cmp(&b.re))
        .unwrap();
    (index % SIZE, index / SIZE)
}

fn shifted_pair(dx: usize, dy: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(3);
    let reference: Vec<f64> = (0..SIZE * SIZE).map(|_| rng.random_range(0.0..1.0)).collect();
    let mut moved = vec![0.0; SIZE * SIZE];
    for y in 0..SIZE {
        for x in 0..SIZE {
            moved[((y + dy) % SIZE) * SIZE + (x + dx) % SIZE] = reference[y * SIZE + x];
        }
    }
    (reference, moved)
}

#[test]
fn test_cross_power_spectrum_recovers_shift() {
    let (dx, dy) = (5, 11);
    let (reference, moved) = shifted_pair(dx, dy);
    let a = spectrum(&reference);
    let b = spectrum(&moved);

    let mut out = vec![Complex::new(0.0, 0.0); a.len()];
    cross_power_spectrum_matrix(&mut out, &a, &b);

    assert_eq!(peak(&out), (dx, dy));
}

#[test]
fn test_phase_correlation_recovers_shift() {
    let (dx, dy) = (7, 3);
    let (reference, moved) = shifted_pair(dx, dy);
    let a = spectrum(&reference);
    let b = spectrum(&moved);

    let mut out = vec![Complex::new(0.0, 0.0); a.len()];
    phase_correlation_matrix(&mut out, &a, &b);
    for c in &out {
        assert!((c.mag() - 1.0).abs() < 1e-9);
    }

    // a * conj(b) correlates the reference against the moved image.
    assert_eq!(peak(&out), ((SIZE - dx) % SIZE, (SIZE - dy) % SIZE));

    let mut par_out = vec![Complex::new(0.0, 0.0); a.len()];
    par_phase_correlation_matrix(&mut par_out, &a, &b);
    assert_eq!(par_out, out);
}
