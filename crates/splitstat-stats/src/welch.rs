//! Welch's unequal-variance t-test
//!
//! For two independent samples `a` and `b`:
//!
//! ```text
//! t  = (mean_a - mean_b) / sqrt(s²_a / n_a + s²_b / n_b)
//! df = (s²_a/n_a + s²_b/n_b)² / ((s²_a/n_a)² / (n_a - 1) + (s²_b/n_b)² / (n_b - 1))
//! p  = 2 * P(T_df > |t|)
//! ```
//!
//! where `s²` is the sample variance. The statistic is undefined when either
//! sample has fewer than two observations or when the pooled standard error
//! is zero; this is reported as [`UndefinedStatistic`] rather than a NaN.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{UndefinedStatistic, descriptive::DescriptiveStats};

const MIN_OBSERVATIONS: usize = 2;

/// Result of Welch's t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// The t statistic; positive when the first sample has the larger mean.
    pub statistic: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl WelchTest {
    /// Runs the test on two raw samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::welch::WelchTest;
    ///
    /// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
    /// let b = [3.0, 4.0, 5.0, 6.0, 7.0];
    /// let test = WelchTest::from_samples(&a, &b).unwrap();
    /// assert!((test.statistic + 2.0).abs() < 1e-12);
    /// assert!((test.degrees_of_freedom - 8.0).abs() < 1e-12);
    /// assert!(test.p_value > 0.05 && test.p_value < 0.1);
    /// ```
    pub fn from_samples(a: &[f64], b: &[f64]) -> Result<Self, UndefinedStatistic> {
        let too_small = |actual| UndefinedStatistic::InsufficientObservations {
            required: MIN_OBSERVATIONS,
            actual,
        };
        let a = DescriptiveStats::new(a.iter().copied()).ok_or(too_small(0))?;
        let b = DescriptiveStats::new(b.iter().copied()).ok_or(too_small(0))?;
        Self::from_stats(&a, &b)
    }

    /// Runs the test on precomputed sample summaries.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_stats(
        a: &DescriptiveStats,
        b: &DescriptiveStats,
    ) -> Result<Self, UndefinedStatistic> {
        let smallest = a.count.min(b.count);
        let (Some(se2_a), Some(se2_b)) = (a.squared_standard_error(), b.squared_standard_error())
        else {
            return Err(UndefinedStatistic::InsufficientObservations {
                required: MIN_OBSERVATIONS,
                actual: smallest,
            });
        };

        let se2 = se2_a + se2_b;
        if se2 <= 0.0 || !se2.is_finite() {
            return Err(UndefinedStatistic::ZeroStandardError);
        }

        let statistic = (a.mean - b.mean) / se2.sqrt();
        let degrees_of_freedom = se2.powi(2)
            / (se2_a.powi(2) / (a.count - 1) as f64 + se2_b.powi(2) / (b.count - 1) as f64);

        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom)
            .map_err(|_| UndefinedStatistic::InvalidDegreesOfFreedom { degrees_of_freedom })?;
        let p_value = (2.0 * dist.sf(statistic.abs())).min(1.0);

        Ok(Self {
            statistic,
            degrees_of_freedom,
            p_value,
        })
    }
}
