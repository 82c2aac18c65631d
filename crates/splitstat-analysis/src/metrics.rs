//! Per-arm conversion metrics
//!
//! For each arm: sample size, number of conversions, conversion rate with its
//! Wald confidence interval, and the mean of every auxiliary counter observed
//! in that arm. An arm without records reports a rate of 0 and the interval
//! `(0, 0)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use splitstat_stats::proportion::ProportionEstimate;

use crate::{
    config::EngineConfig,
    record::{Arm, Dataset},
};

/// Conversion metrics of one arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    /// Arm label as it appears in the input.
    pub arm: String,
    /// Number of subjects.
    pub n: usize,
    /// Number of converted subjects.
    pub successes: usize,
    /// Conversion rate, `successes / n`.
    pub rate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Mean of each auxiliary counter over the subjects that report it.
    pub auxiliary_means: BTreeMap<String, f64>,
}

impl GroupMetrics {
    /// Computes the metrics of `arm`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(dataset: &Dataset, arm: Arm, config: &EngineConfig) -> Self {
        let mut n = 0;
        let mut successes = 0;
        let mut counter_sums = BTreeMap::<&str, (f64, usize)>::new();
        for record in dataset.records_in(arm) {
            n += 1;
            successes += usize::from(record.converted);
            for (name, value) in &record.counters {
                let entry = counter_sums.entry(name.as_str()).or_default();
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let estimate = ProportionEstimate::new(successes, n, config.confidence_z);
        let auxiliary_means = counter_sums
            .into_iter()
            .map(|(name, (sum, count))| (name.to_owned(), sum / count as f64))
            .collect();

        Self {
            arm: dataset.arms().label(arm).to_owned(),
            n,
            successes,
            rate: estimate.rate,
            ci_lower: estimate.lower,
            ci_upper: estimate.upper,
            auxiliary_means,
        }
    }

    /// Metrics of both arms, control first.
    #[must_use]
    pub fn compute_all(dataset: &Dataset, config: &EngineConfig) -> [Self; 2] {
        Arm::ALL.map(|arm| Self::compute(dataset, arm, config))
    }
}
