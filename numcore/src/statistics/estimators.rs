//! Location and scale estimators over `f64` samples.
//!
//! All functions accept samples in any order. Functions with a `_mut` suffix
//! reorder their input (partial sort via quickselect).

/// Biweight midvariance tuning constant.
pub const BWMV_K: f64 = 9.0;

/// Percentage bend midvariance rejection parameter.
pub const PBMV_BETA: f64 = 0.2;

#[inline]
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Arithmetic mean, 0 for empty input.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance about `center` with the `n - 1` denominator.
///
/// Two-pass compensated form: the second sum corrects roundoff in `center`.
/// Returns 0 for fewer than two samples.
pub fn variance(values: &[f64], center: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let (var, eps) = values.iter().fold((0.0, 0.0), |(var, eps), &v| {
        let d = v - center;
        (var + d * d, eps + d)
    });
    (var - eps * eps / n as f64) / (n - 1) as f64
}

/// Median, reordering `values`. Even lengths average the two central values.
///
/// Returns 0 for empty input.
pub fn median_mut(values: &mut [f64]) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    let (left, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if len & 1 == 1 {
        upper
    } else {
        let lower = left.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) * 0.5
    }
}

/// Median of `values` computed on a scratch copy.
pub fn median(values: &[f64]) -> f64 {
    median_mut(&mut values.to_vec())
}

/// Mean absolute deviation from `center`, 0 for fewer than two samples.
pub fn avg_dev(values: &[f64], center: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    values.iter().map(|v| (v - center).abs()).sum::<f64>() / n as f64
}

/// Median absolute deviation from `center`, 0 for fewer than two samples.
///
/// Not scaled to a normal standard deviation.
pub fn mad(values: &[f64], center: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median_mut(&mut deviations)
}

/// Biweight midvariance about `center` with scale `sigma` and tuning
/// constant `k`.
///
/// Samples farther than `k * sigma` from `center` carry no weight. Returns 0
/// for fewer than two samples or a vanishing scale.
pub fn biweight_midvariance(values: &[f64], center: f64, sigma: f64, k: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let kd = k * sigma;
    if kd < 0.0 || 1.0 + kd == 1.0 {
        return 0.0;
    }

    let mut num = 0.0;
    let mut den = 0.0;
    for &v in values {
        let xc = v - center;
        let y = xc / kd;
        if y.abs() < 1.0 {
            let y2 = y * y;
            let y21 = 1.0 - y2;
            num += xc * xc * y21 * y21 * y21 * y21;
            den += y21 * (1.0 - 5.0 * y2);
        }
    }

    let den = den * den;
    if 1.0 + den == 1.0 {
        return 0.0;
    }
    n as f64 * num / den
}

/// Percentage bend midvariance about `center`.
///
/// `beta` is clamped to `[0, 0.5]`; higher values raise the breakdown point
/// at the cost of efficiency. Returns 0 for fewer than two samples or a
/// vanishing bend scale.
pub fn bend_midvariance(values: &[f64], center: f64, beta: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let beta = beta.clamp(0.0, 0.5);
    let m = (((1.0 - beta) * n as f64 + 0.5).floor() as usize).min(n - 1);

    let mut w: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    let (_, wb, _) = w.select_nth_unstable_by(m, f64::total_cmp);
    let wb = *wb;
    if 1.0 + wb == 1.0 {
        return 0.0;
    }

    let mut num = 0.0;
    let mut den = 0usize;
    for &v in values {
        let y = (v - center) / wb;
        let f = y.clamp(-1.0, 1.0);
        num += f * f;
        if y.abs() < 1.0 {
            den += 1;
        }
    }

    if den == 0 {
        return 0.0;
    }
    let den = den as f64;
    n as f64 * wb * wb * num / (den * den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[1.0, 3.0, 2.0, 5.0, 4.0]), 3.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[42.0]), 42.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_variance_matches_definition() {
        let values = [0.1, 0.2, 0.3, 0.4, 0.5];
        let m = mean(&values);
        let expected = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / 4.0;
        assert!((variance(&values, m) - expected).abs() < 1e-15);
        assert_eq!(variance(&[0.3], 0.3), 0.0);
    }

    #[test]
    fn test_deviations() {
        let values = [2.0, 4.0, 3.0];
        assert!((avg_dev(&values, 3.0) - 2.0 / 3.0).abs() < 1e-15);
        assert_eq!(mad(&values, 3.0), 1.0);
        assert_eq!(mad(&[3.0], 3.0), 0.0);
        assert_eq!(avg_dev(&[3.0], 3.0), 0.0);
    }

    #[test]
    fn test_midvariances_vanish_on_constant_data() {
        let values = [0.5; 8];
        assert_eq!(biweight_midvariance(&values, 0.5, 0.0, BWMV_K), 0.0);
        assert_eq!(bend_midvariance(&values, 0.5, PBMV_BETA), 0.0);
    }

    #[test]
    fn test_biweight_midvariance_ignores_outliers() {
        let clean = [0.48, 0.49, 0.5, 0.51, 0.52, 0.5, 0.49, 0.51];
        let mut dirty = clean.to_vec();
        dirty.push(100.0);

        let c = median(&clean);
        let reference = biweight_midvariance(&clean, c, mad(&clean, c), BWMV_K);
        let d = median(&dirty);
        let with_outlier = biweight_midvariance(&dirty, d, mad(&dirty, d), BWMV_K);

        assert!(reference > 0.0);
        // The outlier only contributes through n.
        assert!(with_outlier < 2.0 * reference);
        assert!(variance(&dirty, mean(&dirty)) > 1000.0 * with_outlier);
    }

    #[test]
    fn test_bend_midvariance_two_samples() {
        // m clamps to the last order statistic.
        let values = [0.0, 1.0];
        let wb = 0.5;
        // Both samples sit on the bend: num = 2, den = 0.
        assert_eq!(bend_midvariance(&values, 0.5, PBMV_BETA), 0.0);
        let spread = [0.0, 0.5, 1.0];
        let v = bend_midvariance(&spread, 0.5, PBMV_BETA);
        // Bend scale 0.5, only the center is inside: n * wb^2 * 2 / 1.
        assert!((v - 3.0 * wb * wb * 2.0).abs() < 1e-15);
    }
}
