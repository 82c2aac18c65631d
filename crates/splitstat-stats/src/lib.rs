//! Statistical primitives for two-sample comparisons.
//!
//! This crate provides the domain-agnostic building blocks used by the
//! experiment summarization engine:
//!
//! - **Descriptive statistics**: mean, population and sample variance
//! - **Proportions**: conversion rate with a clipped Wald confidence interval
//! - **Welch's t-test**: difference of means without assuming equal variances
//! - **Contingency tables**: Pearson chi-squared test of independence
//! - **Effect size**: Cohen's d with a categorical interpretation
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing samples
//! - [`proportion`]: Binomial proportion estimates and Wald intervals
//! - [`welch`]: Welch's unequal-variance t-test
//! - [`contingency`]: Contingency tables and the chi-squared test
//! - [`effect_size`]: Standardized mean difference
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use splitstat_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.0);
//! ```
//!
//! ## Estimating a conversion rate
//!
//! ```
//! use splitstat_stats::proportion::{ProportionEstimate, WALD_Z_95};
//!
//! let estimate = ProportionEstimate::new(60, 500, WALD_Z_95);
//! assert!((estimate.rate - 0.12).abs() < 1e-12);
//! assert!(estimate.lower < estimate.rate && estimate.rate < estimate.upper);
//! ```
//!
//! ## Testing a difference of means
//!
//! ```
//! use splitstat_stats::welch::WelchTest;
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let b = [3.0, 4.0, 5.0, 6.0, 7.0];
//! let test = WelchTest::from_samples(&a, &b).unwrap();
//! assert!(test.statistic < 0.0);
//! ```
//!
//! ## Testing independence in a contingency table
//!
//! ```
//! use splitstat_stats::contingency::ContingencyTable;
//!
//! let table = ContingencyTable::new(vec![vec![440, 60], vec![420, 80]]).unwrap();
//! let test = table.chi_squared(false).unwrap();
//! assert_eq!(test.degrees_of_freedom, 1);
//! ```
//!
//! ## Measuring effect size
//!
//! ```
//! use splitstat_stats::effect_size::{CohensD, EffectSizeInterpretation};
//!
//! let control = [0.0, 0.0, 1.0, 1.0];
//! let test = [0.0, 1.0, 1.0, 1.0];
//! let d = CohensD::from_samples(&control, &test);
//! assert_eq!(d.interpretation, EffectSizeInterpretation::Large);
//! ```

pub mod contingency;
pub mod descriptive;
pub mod effect_size;
pub mod proportion;
pub mod welch;

/// Reason a test statistic cannot be computed for the given input.
///
/// These are not failures of the caller: they describe data for which the
/// statistic is mathematically undefined.
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::Error,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndefinedStatistic {
    #[display("at least {required} observations are required per sample, got {actual}")]
    InsufficientObservations { required: usize, actual: usize },
    #[display("standard error of the difference is zero")]
    ZeroStandardError,
    #[display("expected frequency is zero at row {row}, column {column}")]
    ZeroExpectedFrequency { row: usize, column: usize },
    #[display("invalid degrees of freedom: {degrees_of_freedom}")]
    InvalidDegreesOfFreedom { degrees_of_freedom: f64 },
}
