/// Descriptive statistics summarizing a sample.
///
/// This structure contains the measures of central tendency and dispersion
/// needed by the two-sample tests in this crate, for a dataset of `f64`
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of observations.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The population variance (denominator `n`).
    pub variance: f64,
    /// The sample variance (denominator `n - 1`).
    ///
    /// `None` when the dataset has a single observation.
    pub sample_variance: Option<f64>,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from a sequence of values.
    ///
    /// The mean is computed first and the variances are accumulated in a
    /// second pass over the deviations from the mean.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use splitstat_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.sample_variance, Some(2.5));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let count = values.len();
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        let variance = sum_sq / n;
        let sample_variance = (count > 1).then(|| sum_sq / (n - 1.0));

        Some(Self {
            count,
            min,
            max,
            mean,
            variance,
            sample_variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Returns the squared standard error of the mean, `s² / n`.
    ///
    /// Uses the sample variance, so `None` is returned for a single
    /// observation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use splitstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(stats.squared_standard_error(), Some(0.5));
    ///
    /// let single = DescriptiveStats::new([1.0]).unwrap();
    /// assert_eq!(single.squared_standard_error(), None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn squared_standard_error(&self) -> Option<f64> {
        self.sample_variance.map(|v| v / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert_eq!(DescriptiveStats::new(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([0.25]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 0.25);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.sample_variance, None);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_binary_outcomes() {
        // 3 of 10 converted: mean = p, population variance = p(1-p)
        let values = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let stats = DescriptiveStats::new(values).unwrap();
        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.variance - 0.21).abs() < 1e-12);
        assert!((stats.sample_variance.unwrap() - 0.21 * 10.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values() {
        let stats = DescriptiveStats::new([2.0; 8]).unwrap();
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.sample_variance, Some(0.0));
    }
}
