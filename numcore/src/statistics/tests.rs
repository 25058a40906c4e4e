use super::*;

use common::Buffer2View;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::image::Aabb;

const FIVE: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

fn all_enabled() -> StatisticsConfig {
    StatisticsConfig {
        sn: true,
        qn: true,
        ..StatisticsConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_default_config() {
    let config = StatisticsConfig::default();
    assert!(config.mean && config.variance && config.median && config.mad);
    assert!(config.bwmv && config.pbmv && config.extremes && config.sum_of_squares);
    assert!(!config.sn && !config.qn);
    assert!(!config.reject_low && !config.reject_high);
}

#[test]
fn test_rejection_limits_are_clamped_and_ordered() {
    let config = StatisticsConfig::default().with_rejection_limits(0.8, 0.2);
    assert_eq!((config.low, config.high), (0.2, 0.8));

    let config = StatisticsConfig::default().with_rejection_limits(-1.0, 3.0);
    assert_eq!((config.low, config.high), (0.0, 1.0));
}

#[test]
fn test_resolved_cascade() {
    let config = StatisticsConfig {
        mean: false,
        median: false,
        ..all_enabled()
    }
    .resolved();
    assert!(!config.variance);
    assert!(!config.avg_dev && !config.mad && !config.bwmv && !config.pbmv);
    assert!(config.sn && config.qn && config.sum_of_squares);

    let config = StatisticsConfig {
        mad: false,
        ..StatisticsConfig::default()
    }
    .resolved();
    assert!(!config.bwmv);
    assert!(config.pbmv && config.avg_dev);
}

#[test]
fn test_reversed_bounds_are_sorted() {
    let config = StatisticsConfig {
        reject_low: true,
        reject_high: true,
        low: 0.45,
        high: 0.15,
        ..StatisticsConfig::default()
    };
    let resolved = config.resolved();
    assert_eq!((resolved.low, resolved.high), (0.15, 0.45));

    // A single active bound is left alone.
    let low_only = StatisticsConfig {
        reject_low: true,
        low: 0.9,
        ..StatisticsConfig::default()
    }
    .resolved();
    assert_eq!((low_only.low, low_only.high), (0.9, 0.0));

    let view = Buffer2View::new(&FIVE, 5, 1);
    let mut stats = ImageStatistics::new(config);
    stats.compute(&ImageRegion::new(view));
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.minimum(), 0.2);
    assert_eq!(stats.maximum(), 0.4);
    assert!((stats.mean() - 0.3).abs() < 1e-12);
}

#[test]
#[should_panic(expected = "Rejection low bound must be in [0, 1]")]
fn test_out_of_range_bound_panics() {
    let config = StatisticsConfig {
        reject_low: true,
        low: 1.5,
        ..StatisticsConfig::default()
    };
    ImageStatistics::new(config);
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[test]
fn test_five_samples() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let mut stats = ImageStatistics::new(StatisticsConfig::default());
    stats.compute(&ImageRegion::new(view));

    assert_eq!(stats.count(), 5);
    assert!((stats.mean() - 0.3).abs() < 1e-12);
    assert_eq!(stats.median(), 0.3);
    assert!((stats.variance() - 0.025).abs() < 1e-12);
    assert!((stats.std_dev() - 0.025f64.sqrt()).abs() < 1e-12);
    assert!((stats.sum_of_squares() - 0.55).abs() < 1e-12);
    assert!((stats.avg_dev() - 0.12).abs() < 1e-12);
    assert!((stats.mad() - 0.1).abs() < 1e-12);
    assert_eq!(stats.minimum(), 0.1);
    assert_eq!(stats.minimum_position(), Vec2us::new(0, 0));
    assert_eq!(stats.maximum(), 0.5);
    assert_eq!(stats.maximum_position(), Vec2us::new(4, 0));
}

#[test]
fn test_five_samples_low_rejection() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let config = StatisticsConfig {
        reject_low: true,
        ..StatisticsConfig::default().with_rejection_limits(0.15, 1.0)
    };
    let mut stats = ImageStatistics::new(config);
    let data = *stats.compute(&ImageRegion::new(view));

    assert_eq!(data.count, 4);
    assert!((data.mean - 0.35).abs() < 1e-12);
    assert!((data.median - 0.35).abs() < 1e-12);
    assert_eq!(data.minimum, 0.2);
    assert_eq!(data.minimum_position, Vec2us::new(1, 0));
}

#[test]
fn test_rejection_bounds_are_exclusive() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let config = StatisticsConfig {
        reject_low: true,
        reject_high: true,
        low: 0.2,
        high: 0.4,
        ..StatisticsConfig::default()
    };
    let mut stats = ImageStatistics::new(config);
    stats.compute(&ImageRegion::new(view));
    assert_eq!(stats.count(), 1);
    assert_eq!(stats.median(), 0.3);
}

#[test]
fn test_extremes_first_occurrence_wins() {
    #[rustfmt::skip]
    let data = [
        0.5, 0.5, 0.0,
        0.0, 0.7, 0.5,
        0.5, 0.9, 0.9,
    ];
    let view = Buffer2View::new(&data, 3, 3);
    let mut stats = ImageStatistics::new(StatisticsConfig::default());
    stats.compute(&ImageRegion::new(view));

    assert_eq!(stats.maximum(), 0.9);
    assert_eq!(stats.maximum_position(), Vec2us::new(1, 2));
    assert_eq!(stats.minimum(), 0.0);
    assert_eq!(stats.minimum_position(), Vec2us::new(2, 0));
}

#[test]
fn test_rect_positions_are_absolute() {
    let mut data = vec![0.5f32; 8 * 6];
    data[4 * 8 + 5] = 1.0;
    data[2 * 8 + 3] = 0.25;
    // Outside the selection.
    data[0] = 0.0;

    let view = Buffer2View::new(&data, 8, 6);
    let region = ImageRegion::with_rect(view, Aabb::new(2, 6, 1, 4));
    let mut stats = ImageStatistics::new(StatisticsConfig::default());
    stats.compute(&region);

    assert_eq!(stats.count(), 5 * 4);
    assert_eq!(stats.maximum(), 1.0);
    assert_eq!(stats.maximum_position(), Vec2us::new(5, 4));
    assert_eq!(stats.minimum(), 0.25);
    assert_eq!(stats.minimum_position(), Vec2us::new(3, 2));
    assert_eq!(stats.median(), 0.5);
}

#[test]
fn test_integer_samples_are_normalized() {
    let data: [u16; 4] = [0, 16384, 32768, 65535];
    let view = Buffer2View::new(&data, 2, 2);
    let config = StatisticsConfig {
        reject_high: true,
        high: 0.9,
        ..StatisticsConfig::default()
    };
    let mut stats = ImageStatistics::new(config);
    stats.compute(&ImageRegion::new(view));

    assert_eq!(stats.count(), 3);
    assert_eq!(stats.minimum(), 0.0);
    assert_eq!(stats.maximum(), 32768.0 / 65535.0);
    assert_eq!(stats.maximum_position(), Vec2us::new(0, 1));
}

#[test]
fn test_interleaved_channel() {
    // RGB pixels, green carries the ramp.
    let data: Vec<u8> = (0..6u8).flat_map(|i| [255, i * 10, 0]).collect();
    let view = Buffer2View::interleaved_channel(&data, 3, 2, 3, 1);
    let mut stats = ImageStatistics::new(StatisticsConfig::default());
    stats.compute(&ImageRegion::new(view));

    assert_eq!(stats.count(), 6);
    assert_eq!(stats.minimum(), 0.0);
    assert_eq!(stats.maximum(), 50.0 / 255.0);
    assert_eq!(stats.maximum_position(), Vec2us::new(2, 1));
    assert!((stats.mean() - 25.0 / 255.0).abs() < 1e-12);
}

#[test]
fn test_empty_selection_yields_zeros() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let mut stats = ImageStatistics::new(all_enabled());

    let outside = ImageRegion::with_rect(view, Aabb::new(10, 12, 0, 0));
    assert_eq!(*stats.compute(&outside), StatisticsData::default());

    let empty: [f64; 0] = [];
    let region = ImageRegion::new(Buffer2View::new(&empty, 0, 0));
    assert_eq!(*stats.compute(&region), StatisticsData::default());
}

#[test]
fn test_everything_rejected_yields_zeros() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let config = StatisticsConfig {
        reject_low: true,
        low: 0.9,
        ..all_enabled()
    };
    let mut stats = ImageStatistics::new(config);
    assert_eq!(*stats.compute(&ImageRegion::new(view)), StatisticsData::default());
}

#[test]
fn test_single_sample() {
    let data = [0.4];
    let mut stats = ImageStatistics::new(all_enabled());
    let data = *stats.compute(&ImageRegion::new(Buffer2View::new(&data, 1, 1)));
    assert_eq!(data.count, 1);
    assert_eq!(data.mean, 0.4);
    assert_eq!(data.median, 0.4);
    assert_eq!(data.variance, 0.0);
    assert_eq!(data.mad, 0.0);
    assert_eq!(data.avg_dev, 0.0);
    assert_eq!(data.bwmv, 0.0);
    assert_eq!(data.pbmv, 0.0);
    assert_eq!(data.sn, 0.0);
    assert_eq!(data.qn, 0.0);
}

#[test]
fn test_disabled_estimators_stay_zero() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let config = StatisticsConfig {
        median: false,
        extremes: false,
        ..StatisticsConfig::default()
    };
    let mut stats = ImageStatistics::new(config);
    stats.compute(&ImageRegion::new(view));

    assert!((stats.mean() - 0.3).abs() < 1e-12);
    assert_eq!(stats.median(), 0.0);
    assert_eq!(stats.mad(), 0.0);
    assert_eq!(stats.bwmv(), 0.0);
    assert_eq!(stats.pbmv(), 0.0);
    assert_eq!(stats.maximum(), 0.0);
    assert_eq!(stats.maximum_position(), Vec2us::ZERO);
}

#[test]
fn test_engine_matches_estimators() {
    let mut rng = StdRng::seed_from_u64(21);
    let (width, height) = (23, 17);
    let data: Vec<f64> = (0..width * height)
        .map(|_| {
            // Background with a few bright outliers.
            if rng.random_bool(0.05) {
                rng.random_range(0.8..1.0)
            } else {
                0.1 + 0.02 * rng.random_range(-1.0..1.0)
            }
        })
        .collect();

    let mut stats = ImageStatistics::new(all_enabled());
    let result = *stats.compute(&ImageRegion::new(Buffer2View::new(&data, width, height)));

    let median = estimators::median(&data);
    let mad = estimators::mad(&data, median);
    assert_eq!(result.count, data.len());
    assert_eq!(result.median, median);
    assert_eq!(result.mad, mad);
    // Summation order differs after the median pass.
    let bwmv = estimators::biweight_midvariance(&data, median, mad, BWMV_K);
    let pbmv = estimators::bend_midvariance(&data, median, PBMV_BETA);
    assert!((result.bwmv - bwmv).abs() <= 1e-12 * bwmv);
    assert!((result.pbmv - pbmv).abs() <= 1e-12 * pbmv);
    assert_eq!(result.sn, robust_scale::sn(&data));
    assert_eq!(result.qn, robust_scale::qn(&data));
    assert!((result.mean - estimators::mean(&data)).abs() < 1e-12);

    // Robust scales ignore the outliers that inflate the standard deviation.
    assert!(result.bwmv.sqrt() < 0.5 * result.std_dev);
    assert!(result.mad < 0.5 * result.std_dev);
}

#[test]
fn test_config_mut_applies_to_next_pass() {
    let view = Buffer2View::new(&FIVE, 5, 1);
    let region = ImageRegion::new(view);
    let mut stats = ImageStatistics::default();
    stats.compute(&region);
    assert_eq!(stats.count(), 5);

    stats.config_mut().reject_high = true;
    stats.config_mut().high = 0.45;
    stats.compute(&region);
    assert_eq!(stats.count(), 4);
    assert_eq!(stats.maximum(), 0.4);
    assert!(stats.config().reject_high);
}
