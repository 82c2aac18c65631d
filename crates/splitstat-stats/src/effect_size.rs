//! Standardized mean difference (Cohen's d)
//!
//! ```text
//! d = (mean_test - mean_control) / sqrt((var_control + var_test) / 2)
//! ```
//!
//! Variances are population variances and are averaged without weighting by
//! sample size. This differs from the textbook pooled standard deviation and
//! is kept for compatibility with existing reports. When the pooled standard
//! deviation is not positive, `d` is 0.

use serde::{Deserialize, Serialize};

use crate::descriptive::DescriptiveStats;

/// `|d|` at or above this value is a medium effect.
pub const EFFECT_SIZE_MEDIUM: f64 = 0.2;
/// `|d|` at or above this value is a large effect.
pub const EFFECT_SIZE_LARGE: f64 = 0.5;

/// Categorical interpretation of an effect size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum EffectSizeInterpretation {
    Small,
    Medium,
    Large,
}

impl EffectSizeInterpretation {
    /// Classifies an effect size by its magnitude.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::effect_size::EffectSizeInterpretation;
    ///
    /// assert_eq!(EffectSizeInterpretation::from_value(0.19), EffectSizeInterpretation::Small);
    /// assert_eq!(EffectSizeInterpretation::from_value(0.2), EffectSizeInterpretation::Medium);
    /// assert_eq!(EffectSizeInterpretation::from_value(-0.5), EffectSizeInterpretation::Large);
    /// ```
    #[must_use]
    pub fn from_value(d: f64) -> Self {
        let magnitude = d.abs();
        if magnitude < EFFECT_SIZE_MEDIUM {
            Self::Small
        } else if magnitude < EFFECT_SIZE_LARGE {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// Cohen's d with its interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohensD {
    pub value: f64,
    pub interpretation: EffectSizeInterpretation,
}

impl CohensD {
    /// Builds the result for an already computed `d`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            interpretation: EffectSizeInterpretation::from_value(value),
        }
    }

    /// Computes Cohen's d from raw control and test samples.
    ///
    /// An empty sample has no finite variance, so the result is 0.
    #[must_use]
    pub fn from_samples(control: &[f64], test: &[f64]) -> Self {
        let control = DescriptiveStats::new(control.iter().copied());
        let test = DescriptiveStats::new(test.iter().copied());
        match (control, test) {
            (Some(control), Some(test)) => Self::from_stats(&control, &test),
            _ => Self::new(0.0),
        }
    }

    /// Computes Cohen's d from control and test summaries.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::{descriptive::DescriptiveStats, effect_size::CohensD};
    ///
    /// let control = DescriptiveStats::new([1.0; 4]).unwrap();
    /// let test = DescriptiveStats::new([1.0; 4]).unwrap();
    /// assert_eq!(CohensD::from_stats(&control, &test).value, 0.0);
    /// ```
    #[must_use]
    pub fn from_stats(control: &DescriptiveStats, test: &DescriptiveStats) -> Self {
        let diff = test.mean - control.mean;
        let pooled_std = ((control.variance + test.variance) / 2.0).sqrt();
        let value = if pooled_std > 0.0 {
            diff / pooled_std
        } else {
            0.0
        };
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_sample(successes: usize, n: usize) -> Vec<f64> {
        (0..n).map(|i| if i < successes { 1.0 } else { 0.0 }).collect()
    }

    #[test]
    fn test_interpretation_boundaries() {
        use EffectSizeInterpretation::{Large, Medium, Small};
        assert_eq!(EffectSizeInterpretation::from_value(0.0), Small);
        assert_eq!(EffectSizeInterpretation::from_value(0.199_999), Small);
        assert_eq!(EffectSizeInterpretation::from_value(0.2), Medium);
        assert_eq!(EffectSizeInterpretation::from_value(-0.2), Medium);
        assert_eq!(EffectSizeInterpretation::from_value(0.499_999), Medium);
        assert_eq!(EffectSizeInterpretation::from_value(0.5), Large);
        assert_eq!(EffectSizeInterpretation::from_value(-3.0), Large);
    }

    #[test]
    fn test_unweighted_population_variance() {
        // var_c = 0.12 * 0.88, var_t = 0.16 * 0.84, pooled = sqrt(0.12)
        let control = binary_sample(60, 500);
        let test = binary_sample(80, 500);
        let d = CohensD::from_samples(&control, &test);
        assert!((d.value - 0.04 / 0.12_f64.sqrt()).abs() < 1e-9);
        assert_eq!(d.interpretation, EffectSizeInterpretation::Small);
    }

    #[test]
    fn test_sign_follows_test_minus_control() {
        let control = binary_sample(80, 500);
        let test = binary_sample(60, 500);
        assert!(CohensD::from_samples(&control, &test).value < 0.0);
    }

    #[test]
    fn test_zero_pooled_std_falls_back_to_zero() {
        let d = CohensD::from_samples(&[0.0; 5], &[1.0; 5]);
        assert_eq!(d.value, 0.0);
        assert_eq!(d.interpretation, EffectSizeInterpretation::Small);
    }

    #[test]
    fn test_empty_sample_falls_back_to_zero() {
        let d = CohensD::from_samples(&[], &[0.0, 1.0, 1.0]);
        assert_eq!(d.value, 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(EffectSizeInterpretation::Medium.to_string(), "Medium");
    }
}
