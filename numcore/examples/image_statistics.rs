//! Statistics of a synthetic star field before and after a Lanczos
//! sub-pixel shift, plus a Chebyshev fit of the background profile.
//!
//! Run with `RUST_LOG=numcore=debug` to see engine diagnostics.

use common::log_setup::{setup_logging_with, LogConfig};
use common::{Buffer2, Buffer2View};
use numcore::interpolation::resample;
use numcore::{
    Aabb, ChebyshevFit, ImageRegion, ImageStatistics, LanczosConfig, LanczosLutInterpolation,
    LanczosLutOrder, StatisticsConfig,
};

const WIDTH: usize = 128;
const HEIGHT: usize = 96;

/// Smooth background along x with a few Gaussian stars, 16-bit.
fn star_field() -> Vec<u16> {
    let stars = [(20.3, 30.7, 9000.0), (64.0, 48.5, 30000.0), (101.6, 12.2, 15000.0)];
    let mut data = Vec::with_capacity(WIDTH * HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let mut v = background(x as f64);
            for &(sx, sy, amplitude) in &stars {
                let r2 = (x as f64 - sx).powi(2) + (y as f64 - sy).powi(2);
                v += amplitude * (-r2 / 4.5).exp();
            }
            data.push(v.min(65535.0) as u16);
        }
    }
    data
}

fn background(x: f64) -> f64 {
    1000.0 + 300.0 * (x / WIDTH as f64 * std::f64::consts::PI).sin()
}

fn report(label: &str, stats: &ImageStatistics) {
    tracing::info!(
        "{}: n={} mean={:.6} median={:.6} sigma={:.6} MAD={:.6} sqrt(BWMV)={:.6} Sn={:.6} Qn={:.6}",
        label,
        stats.count(),
        stats.mean(),
        stats.median(),
        stats.std_dev(),
        stats.mad(),
        stats.bwmv().sqrt(),
        stats.sn(),
        stats.qn()
    );
    tracing::info!(
        "{}: min={:.6} at {:?}, max={:.6} at {:?}",
        label,
        stats.minimum(),
        stats.minimum_position(),
        stats.maximum(),
        stats.maximum_position()
    );
}

fn main() -> anyhow::Result<()> {
    setup_logging_with(&LogConfig {
        directory: None,
        ..LogConfig::default()
    });

    let data = star_field();
    let view = Buffer2View::new(&data, WIDTH, HEIGHT);

    let mut stats = ImageStatistics::new(StatisticsConfig {
        sn: true,
        qn: true,
        ..StatisticsConfig::default()
    });
    stats.compute(&ImageRegion::new(view));
    report("original", &stats);

    // Background only: reject everything brighter than the sky.
    let sky = stats.median() * 1.5;
    stats.config_mut().reject_high = true;
    stats.config_mut().high = sky.min(1.0);
    stats.compute(&ImageRegion::with_rect(view, Aabb::new(0, WIDTH - 1, 60, HEIGHT - 1)));
    report("sky", &stats);

    let interpolation =
        LanczosLutInterpolation::new(view, LanczosLutOrder::Three, LanczosConfig::default());
    let mut shifted = Buffer2::new_default(WIDTH, HEIGHT);
    resample(&interpolation, &mut shifted, |x, y| {
        (x as f64 + 0.37, y as f64 - 0.61)
    });

    let mut shifted_stats = ImageStatistics::new(StatisticsConfig::default());
    shifted_stats.compute(&ImageRegion::new(shifted.view()));
    report("shifted", &shifted_stats);

    let mut profile = ChebyshevFit::new(|x: f64| [background(x)], 0.0, WIDTH as f64, 1, 24)?;
    let converged = profile.truncate(1e-3);
    tracing::info!(
        "background profile: {} of {} coefficients (converged: {}), f(64) = {:.4}",
        profile.truncated_length(Some(0)),
        profile.len(),
        converged,
        profile.evaluate_component(64.0, 0)
    );

    Ok(())
}
