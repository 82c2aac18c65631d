//! Decision payload of an experiment
//!
//! [`summarize`] composes the per-arm metrics, the Welch difference test, the
//! chi-squared association test and Cohen's d over one validated dataset.
//! Each part reads the dataset independently; none depends on another's
//! result.

use serde::{Deserialize, Serialize};
use splitstat_stats::{
    contingency::ContingencyTable, descriptive::DescriptiveStats, effect_size::CohensD,
    welch::WelchTest,
};

use crate::{
    AnalysisError,
    config::{ConfigError, EngineConfig},
    metrics::GroupMetrics,
    record::{Arm, ArmPair, Dataset, ExperimentRecord},
    result::{TestKind, TestResult},
};

/// Statistical summary of a two-arm experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    /// Control row, then test row.
    pub metrics: [GroupMetrics; 2],
    pub difference_test: TestResult,
    pub association_test: TestResult,
    pub effect_size: CohensD,
}

impl SummaryPayload {
    /// Metrics row of `arm`.
    #[must_use]
    pub fn metrics_of(&self, arm: Arm) -> &GroupMetrics {
        &self.metrics[arm.index()]
    }
}

/// Welch's t-test on the 0/1 outcomes, `control - test`.
#[must_use]
pub fn difference_test(dataset: &Dataset, config: &EngineConfig) -> TestResult {
    let control = dataset.outcomes(Arm::Control);
    let test = dataset.outcomes(Arm::Test);
    let outcome = WelchTest::from_samples(&control, &test);
    tracing::debug!(?outcome, "difference test");
    TestResult::new(TestKind::WelchTTest, outcome, config)
}

/// Arm × outcome contingency table, rows control then test, columns
/// not converted then converted.
#[must_use]
pub fn contingency_table(dataset: &Dataset) -> ContingencyTable {
    let row = |arm: Arm| {
        let (mut n, mut successes) = (0_u64, 0_u64);
        for record in dataset.records_in(arm) {
            n += 1;
            successes += u64::from(record.converted);
        }
        [n - successes, successes]
    };
    ContingencyTable::two_by_two([row(Arm::Control), row(Arm::Test)])
}

/// Pearson's chi-squared test of independence between arm and outcome.
#[must_use]
pub fn association_test(dataset: &Dataset, config: &EngineConfig) -> TestResult {
    let table = contingency_table(dataset);
    let outcome = table.chi_squared(config.yates_correction);
    tracing::debug!(?outcome, "association test");
    TestResult::new(TestKind::ChiSquared, outcome, config)
}

/// Cohen's d of the outcomes, `test - control`.
#[must_use]
pub fn effect_size(dataset: &Dataset) -> CohensD {
    let stats =
        |arm: Arm| DescriptiveStats::new(dataset.records_in(arm).map(ExperimentRecord::outcome));
    let d = match (stats(Arm::Control), stats(Arm::Test)) {
        (Some(control), Some(test)) => CohensD::from_stats(&control, &test),
        _ => CohensD::new(0.0),
    };
    tracing::debug!(d = d.value, interpretation = %d.interpretation, "effect size");
    d
}

/// Computes the full summary of a validated dataset.
///
/// # Examples
///
/// ```
/// use splitstat_analysis::{
///     config::EngineConfig,
///     record::{ArmPair, Dataset, ExperimentRecord},
///     summary,
/// };
///
/// let records = (0..20)
///     .map(|i| {
///         let arm = if i % 2 == 0 { "control" } else { "test" };
///         ExperimentRecord::new(i.to_string(), arm, i % 4 < 2)
///     })
///     .collect();
/// let dataset = Dataset::new(records, ArmPair::default()).unwrap();
/// let payload = summary::summarize(&dataset, &EngineConfig::default()).unwrap();
///
/// assert_eq!(payload.metrics[0].arm, "control");
/// assert!(!payload.difference_test.is_significant);
/// ```
pub fn summarize(dataset: &Dataset, config: &EngineConfig) -> Result<SummaryPayload, ConfigError> {
    config.validate()?;
    tracing::debug!(records = dataset.len(), "summarizing experiment");

    let metrics = GroupMetrics::compute_all(dataset, config);
    for row in &metrics {
        tracing::debug!(arm = %row.arm, n = row.n, rate = row.rate, "group metrics");
    }

    Ok(SummaryPayload {
        metrics,
        difference_test: difference_test(dataset, config),
        association_test: association_test(dataset, config),
        effect_size: effect_size(dataset),
    })
}

/// Validates raw records and summarizes them.
pub fn summarize_records(
    records: Vec<ExperimentRecord>,
    arms: ArmPair,
    config: &EngineConfig,
) -> Result<SummaryPayload, AnalysisError> {
    let dataset = Dataset::new(records, arms)?;
    Ok(summarize(&dataset, config)?)
}

#[cfg(test)]
mod tests {
    use splitstat_stats::{UndefinedStatistic, effect_size::EffectSizeInterpretation};

    use super::*;
    use crate::record::MalformedInputError;

    fn records(control: (usize, usize), test: (usize, usize)) -> Vec<ExperimentRecord> {
        let mut records = vec![];
        for (label, (successes, n)) in [("control", control), ("test", test)] {
            records.extend(
                (0..n).map(|i| ExperimentRecord::new(format!("{label}-{i}"), label, i < successes)),
            );
        }
        records
    }

    fn summarize_counts(control: (usize, usize), test: (usize, usize)) -> SummaryPayload {
        summarize_records(
            records(control, test),
            ArmPair::default(),
            &EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_identical_rates() {
        let payload = summarize_counts((50, 500), (50, 500));
        assert!(!payload.difference_test.is_significant);
        assert!(!payload.association_test.is_significant);
        assert!(payload.effect_size.value.abs() < 1e-12);
        assert_eq!(
            payload.effect_size.interpretation,
            EffectSizeInterpretation::Small
        );
        assert!(payload.difference_test.statistic().unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_four_point_lift_at_500_per_arm() {
        let payload = summarize_counts((60, 500), (80, 500));
        assert!((payload.metrics_of(Arm::Control).rate - 0.12).abs() < 1e-12);
        assert!((payload.metrics_of(Arm::Test).rate - 0.16).abs() < 1e-12);

        let t = payload.difference_test.statistic().unwrap();
        assert!(t < 0.0);
        let p = payload.difference_test.p_value().unwrap();
        assert!(p > 0.06 && p < 0.075);
        assert!(!payload.difference_test.is_significant);

        // Yates-corrected 2×2 on [[440, 60], [420, 80]]
        let chi2 = payload.association_test.statistic().unwrap();
        assert!((chi2 - 2.998_338_870_431_894).abs() < 1e-9);
        assert_eq!(payload.association_test.degrees_of_freedom(), Some(1.0));

        assert_eq!(
            payload.effect_size.interpretation,
            EffectSizeInterpretation::Small
        );
    }

    #[test]
    fn test_four_point_lift_at_1000_per_arm_is_significant() {
        let payload = summarize_counts((120, 1000), (160, 1000));
        assert!(payload.difference_test.is_significant);
        assert!(payload.association_test.is_significant);
        assert!(payload.difference_test.p_value().unwrap() < 0.012);
    }

    #[test]
    fn test_yates_can_be_disabled() {
        let dataset = Dataset::new(records((60, 500), (80, 500)), ArmPair::default()).unwrap();
        let config = EngineConfig {
            yates_correction: false,
            ..EngineConfig::default()
        };
        let result = association_test(&dataset, &config);
        assert!((result.statistic().unwrap() - 3.322_259_136_212_624_6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_test_arm() {
        let payload = summarize_counts((3, 10), (0, 0));
        let test = payload.metrics_of(Arm::Test);
        assert_eq!((test.rate, test.ci_lower, test.ci_upper), (0.0, 0.0, 0.0));
        assert_eq!(
            payload.difference_test.undefined_reason(),
            Some(&UndefinedStatistic::InsufficientObservations {
                required: 2,
                actual: 0
            })
        );
        assert!(payload.association_test.outcome.is_undefined());
        assert_eq!(payload.effect_size.value, 0.0);
    }

    #[test]
    fn test_no_conversions_anywhere() {
        let payload = summarize_counts((0, 100), (0, 100));
        assert_eq!(
            payload.difference_test.undefined_reason(),
            Some(&UndefinedStatistic::ZeroStandardError)
        );
        assert!(!payload.difference_test.is_significant);
        assert!(payload.association_test.outcome.is_undefined());
    }

    #[test]
    fn test_third_arm_is_malformed() {
        let mut records = records((1, 2), (1, 2));
        records.push(ExperimentRecord::new("x", "holdout", true));
        let err =
            summarize_records(records, ArmPair::default(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedInput(MalformedInputError::UnknownArm { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            significance_level: 0.0,
            ..EngineConfig::default()
        };
        let err = summarize_records(records((1, 2), (1, 2)), ArmPair::default(), &config)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_payload_json_round_trip() {
        let payload = summarize_counts((60, 500), (80, 500));
        let json = serde_json::to_string(&payload).unwrap();
        let parsed: SummaryPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
        assert_eq!(parsed.metrics_of(Arm::Test).arm, "test");
    }

    #[test]
    fn test_short_metrics_do_not_deserialize() {
        let payload = summarize_counts((1, 2), (1, 2));
        let mut value = serde_json::to_value(&payload).unwrap();
        value["metrics"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<SummaryPayload>(value).is_err());
    }

    #[test]
    fn test_contingency_table_layout() {
        let dataset = Dataset::new(records((60, 500), (80, 500)), ArmPair::default()).unwrap();
        let table = contingency_table(&dataset);
        assert_eq!(table.row_totals(), vec![500, 500]);
        assert_eq!(table.get(0, 0), 440);
        assert_eq!(table.get(1, 1), 80);
    }
}
