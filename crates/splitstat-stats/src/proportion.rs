//! Binomial proportion estimates
//!
//! A proportion is estimated as `successes / n`, with a two-sided confidence
//! interval from the normal approximation (Wald interval):
//!
//! ```text
//! se     = sqrt(p * (1 - p) / n)
//! margin = z * se
//! lower  = max(p - margin, 0)
//! upper  = min(p + margin, 1)
//! ```
//!
//! The Wald interval undercovers near `p = 0` and `p = 1`. It is kept as is
//! so results stay comparable with existing reports; do not replace it with an
//! exact binomial interval.

use serde::{Deserialize, Serialize};

/// Two-sided 97.5th percentile of the standard normal distribution.
pub const WALD_Z_95: f64 = 1.959_964;

/// Returns `successes / n`, or `None` when `n` is zero.
///
/// # Examples
///
/// ```
/// use splitstat_stats::proportion::proportion;
///
/// assert_eq!(proportion(1, 4), Some(0.25));
/// assert_eq!(proportion(0, 0), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn proportion(successes: usize, n: usize) -> Option<f64> {
    (n > 0).then(|| successes as f64 / n as f64)
}

/// Point estimate and Wald confidence interval of a binomial proportion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionEstimate {
    /// Estimated proportion, `successes / n`.
    pub rate: f64,
    /// Lower bound of the interval, clipped at 0.
    pub lower: f64,
    /// Upper bound of the interval, clipped at 1.
    pub upper: f64,
}

impl ProportionEstimate {
    /// Estimates a proportion and its Wald interval.
    ///
    /// An empty sample (`n == 0`) has no defined proportion; the estimate
    /// falls back to a rate of 0 with the interval `(0, 0)`.
    ///
    /// # Arguments
    ///
    /// * `successes` - Number of successes, at most `n`
    /// * `n` - Sample size
    /// * `z` - Critical value of the standard normal distribution
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::proportion::{ProportionEstimate, WALD_Z_95};
    ///
    /// let empty = ProportionEstimate::new(0, 0, WALD_Z_95);
    /// assert_eq!((empty.rate, empty.lower, empty.upper), (0.0, 0.0, 0.0));
    ///
    /// let all = ProportionEstimate::new(10, 10, WALD_Z_95);
    /// assert_eq!((all.lower, all.upper), (1.0, 1.0));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(successes: usize, n: usize, z: f64) -> Self {
        debug_assert!(successes <= n, "successes must not exceed sample size");

        let Some(rate) = proportion(successes, n) else {
            return Self {
                rate: 0.0,
                lower: 0.0,
                upper: 0.0,
            };
        };
        let se = (rate * (1.0 - rate) / n as f64).sqrt();
        let margin = z * se;

        Self {
            rate,
            lower: (rate - margin).max(0.0),
            upper: (rate + margin).min(1.0),
        }
    }

    /// Width of the interval, `upper - lower`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
