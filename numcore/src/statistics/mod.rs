//! Descriptive and robust statistics of image regions.
//!
//! [`ImageStatistics`] gathers the normalized samples of an [`ImageRegion`] in
//! one scan, optionally rejecting samples outside a normalized range, and
//! evaluates the estimators enabled in its [`StatisticsConfig`].

pub mod estimators;
pub mod robust_scale;

#[cfg(test)]
mod tests;

use crate::image::{ImageRegion, Sample, Vec2us};

use estimators::{BWMV_K, PBMV_BETA};

/// Selects the estimators to compute and the sample rejection range.
///
/// Estimators depend on each other: variance needs the mean; average
/// deviation, MAD and both midvariances need the median; the biweight
/// midvariance also needs MAD. [`StatisticsConfig::resolved`] disables
/// dependents of disabled estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsConfig {
    pub mean: bool,
    pub variance: bool,
    pub sum_of_squares: bool,
    pub median: bool,
    pub avg_dev: bool,
    pub mad: bool,
    pub bwmv: bool,
    pub pbmv: bool,
    /// O(n log n) with several scratch buffers; off by default.
    pub sn: bool,
    /// O(n log n) with several scratch buffers; off by default.
    pub qn: bool,
    pub extremes: bool,
    /// Drop samples `<= low`.
    pub reject_low: bool,
    /// Drop samples `>= high`.
    pub reject_high: bool,
    /// Lower rejection bound, normalized `[0, 1]`.
    pub low: f64,
    /// Upper rejection bound, normalized `[0, 1]`.
    pub high: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            mean: true,
            variance: true,
            sum_of_squares: true,
            median: true,
            avg_dev: true,
            mad: true,
            bwmv: true,
            pbmv: true,
            sn: false,
            qn: false,
            extremes: true,
            reject_low: false,
            reject_high: false,
            low: 0.0,
            high: 0.0,
        }
    }
}

impl StatisticsConfig {
    /// Sets both rejection bounds, clamped to `[0, 1]` and swapped when given
    /// in reverse order. Rejection flags are left unchanged.
    pub fn with_rejection_limits(self, low: f64, high: f64) -> Self {
        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0);
        let (low, high) = if high < low { (high, low) } else { (low, high) };
        Self { low, high, ..self }
    }

    /// Copy with the dependents of disabled estimators disabled. With both
    /// rejection flags set, reversed bounds are swapped.
    pub fn resolved(self) -> Self {
        let mut config = self;
        if config.reject_low && config.reject_high && config.high < config.low {
            std::mem::swap(&mut config.low, &mut config.high);
        }
        if !config.mean {
            config.variance = false;
        }
        if !config.median {
            config.avg_dev = false;
            config.mad = false;
            config.bwmv = false;
            config.pbmv = false;
        }
        if !config.mad {
            config.bwmv = false;
        }
        config
    }

    pub fn validate(&self) {
        assert!(
            (0.0..=1.0).contains(&self.low),
            "Rejection low bound must be in [0, 1], got {}",
            self.low
        );
        assert!(
            (0.0..=1.0).contains(&self.high),
            "Rejection high bound must be in [0, 1], got {}",
            self.high
        );
    }

    #[inline]
    fn accepts(&self, v: f64) -> bool {
        (!self.reject_low || v > self.low) && (!self.reject_high || v < self.high)
    }
}

/// Result of a statistics pass. Sample values are normalized to `[0, 1]`.
///
/// Disabled estimators stay at zero. Positions are absolute image
/// coordinates of the first minimum/maximum in scan order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatisticsData {
    /// Samples that survived rejection.
    pub count: usize,
    pub mean: f64,
    pub sum_of_squares: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    pub avg_dev: f64,
    pub mad: f64,
    pub bwmv: f64,
    pub pbmv: f64,
    pub sn: f64,
    pub qn: f64,
    pub minimum: f64,
    pub minimum_position: Vec2us,
    pub maximum: f64,
    pub maximum_position: Vec2us,
}

/// Running extremes in scan order; ties keep the first position.
#[derive(Debug, Default)]
struct Extremes {
    seen: bool,
    minimum: f64,
    minimum_position: Vec2us,
    maximum: f64,
    maximum_position: Vec2us,
}

impl Extremes {
    #[inline]
    fn update(&mut self, v: f64, pos: Vec2us) {
        if !self.seen {
            self.seen = true;
            self.minimum = v;
            self.maximum = v;
            self.minimum_position = pos;
            self.maximum_position = pos;
        } else if v < self.minimum {
            self.minimum = v;
            self.minimum_position = pos;
        } else if v > self.maximum {
            self.maximum = v;
            self.maximum_position = pos;
        }
    }
}

/// Statistics engine holding a configuration and the result of the last
/// [`compute`](ImageStatistics::compute).
#[derive(Debug, Clone, Default)]
pub struct ImageStatistics {
    config: StatisticsConfig,
    data: StatisticsData,
}

impl ImageStatistics {
    pub fn new(config: StatisticsConfig) -> Self {
        config.validate();
        Self {
            config,
            data: StatisticsData::default(),
        }
    }

    /// Evaluates the enabled estimators over `region`, replacing the previous
    /// result. An empty selection, or one fully rejected, yields zeros.
    pub fn compute<T: Sample>(&mut self, region: &ImageRegion<'_, T>) -> &StatisticsData {
        self.config.validate();
        let config = self.config.resolved();

        let mut values = Vec::with_capacity(region.len());
        let mut extremes = Extremes::default();
        for (pos, sample) in region.iter() {
            let v = sample.normalized();
            if !config.accepts(v) {
                continue;
            }
            values.push(v);
            if config.extremes {
                extremes.update(v, pos);
            }
        }

        tracing::debug!(
            "Statistics over {} of {} samples (rejection low {:?}, high {:?})",
            values.len(),
            region.len(),
            config.reject_low.then_some(config.low),
            config.reject_high.then_some(config.high)
        );

        self.data = evaluate(&config, &mut values, &extremes);
        &self.data
    }

    #[inline]
    pub fn data(&self) -> &StatisticsData {
        &self.data
    }

    #[inline]
    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut StatisticsConfig {
        &mut self.config
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.data.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.data.mean
    }

    #[inline]
    pub fn sum_of_squares(&self) -> f64 {
        self.data.sum_of_squares
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.data.variance
    }

    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.data.std_dev
    }

    #[inline]
    pub fn median(&self) -> f64 {
        self.data.median
    }

    #[inline]
    pub fn avg_dev(&self) -> f64 {
        self.data.avg_dev
    }

    #[inline]
    pub fn mad(&self) -> f64 {
        self.data.mad
    }

    #[inline]
    pub fn bwmv(&self) -> f64 {
        self.data.bwmv
    }

    #[inline]
    pub fn pbmv(&self) -> f64 {
        self.data.pbmv
    }

    #[inline]
    pub fn sn(&self) -> f64 {
        self.data.sn
    }

    #[inline]
    pub fn qn(&self) -> f64 {
        self.data.qn
    }

    #[inline]
    pub fn minimum(&self) -> f64 {
        self.data.minimum
    }

    #[inline]
    pub fn minimum_position(&self) -> Vec2us {
        self.data.minimum_position
    }

    #[inline]
    pub fn maximum(&self) -> f64 {
        self.data.maximum
    }

    #[inline]
    pub fn maximum_position(&self) -> Vec2us {
        self.data.maximum_position
    }
}

/// Evaluates the estimators enabled in a resolved `config`. Reorders `values`.
fn evaluate(config: &StatisticsConfig, values: &mut [f64], extremes: &Extremes) -> StatisticsData {
    let mut data = StatisticsData {
        count: values.len(),
        ..StatisticsData::default()
    };
    if values.is_empty() {
        return data;
    }

    if config.extremes {
        data.minimum = extremes.minimum;
        data.minimum_position = extremes.minimum_position;
        data.maximum = extremes.maximum;
        data.maximum_position = extremes.maximum_position;
    }

    if config.sum_of_squares {
        data.sum_of_squares = estimators::sum_of_squares(values);
    }

    if config.mean {
        data.mean = estimators::mean(values);
        if config.variance {
            data.variance = estimators::variance(values, data.mean);
            data.std_dev = data.variance.sqrt();
        }
    }

    // Scale estimators below read `values` in any order.
    if config.sn {
        data.sn = robust_scale::sn(values);
    }
    if config.qn {
        data.qn = robust_scale::qn(values);
    }

    if config.median {
        data.median = estimators::median_mut(values);
        if config.avg_dev {
            data.avg_dev = estimators::avg_dev(values, data.median);
        }
        if config.mad {
            data.mad = estimators::mad(values, data.median);
            if config.bwmv {
                data.bwmv =
                    estimators::biweight_midvariance(values, data.median, data.mad, BWMV_K);
            }
        }
        if config.pbmv {
            data.pbmv = estimators::bend_midvariance(values, data.median, PBMV_BETA);
        }
    }

    data
}
