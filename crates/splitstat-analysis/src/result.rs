//! Hypothesis test results
//!
//! A [`TestResult`] either carries the statistic, p-value and degrees of
//! freedom of a test, or the reason the test is undefined for the data. An
//! undefined test is never significant.

use serde::{Deserialize, Serialize};
use splitstat_stats::{UndefinedStatistic, contingency::ChiSquaredTest, welch::WelchTest};

use crate::config::EngineConfig;

/// The hypothesis tests the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum TestKind {
    #[display("Welch's t-test")]
    #[serde(rename = "Welch's t-test")]
    WelchTTest,
    #[display("Chi-square test")]
    #[serde(rename = "Chi-square test")]
    ChiSquared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Defined {
        statistic: f64,
        p_value: f64,
        degrees_of_freedom: f64,
    },
    Undefined {
        reason: UndefinedStatistic,
    },
}

impl From<Result<WelchTest, UndefinedStatistic>> for TestOutcome {
    fn from(result: Result<WelchTest, UndefinedStatistic>) -> Self {
        match result {
            Ok(test) => Self::Defined {
                statistic: test.statistic,
                p_value: test.p_value,
                degrees_of_freedom: test.degrees_of_freedom,
            },
            Err(reason) => Self::Undefined { reason },
        }
    }
}

impl From<Result<ChiSquaredTest, UndefinedStatistic>> for TestOutcome {
    #[expect(clippy::cast_precision_loss)]
    fn from(result: Result<ChiSquaredTest, UndefinedStatistic>) -> Self {
        match result {
            Ok(test) => Self::Defined {
                statistic: test.statistic,
                p_value: test.p_value,
                degrees_of_freedom: test.degrees_of_freedom as f64,
            },
            Err(reason) => Self::Undefined { reason },
        }
    }
}

/// Outcome of one hypothesis test with its significance decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: TestKind,
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub is_significant: bool,
}

impl TestResult {
    #[must_use]
    pub fn new(name: TestKind, outcome: impl Into<TestOutcome>, config: &EngineConfig) -> Self {
        let outcome = outcome.into();
        let is_significant = match &outcome {
            TestOutcome::Defined { p_value, .. } => config.is_significant(*p_value),
            TestOutcome::Undefined { .. } => false,
        };
        Self {
            name,
            outcome,
            is_significant,
        }
    }

    #[must_use]
    pub fn statistic(&self) -> Option<f64> {
        match self.outcome {
            TestOutcome::Defined { statistic, .. } => Some(statistic),
            TestOutcome::Undefined { .. } => None,
        }
    }

    #[must_use]
    pub fn p_value(&self) -> Option<f64> {
        match self.outcome {
            TestOutcome::Defined { p_value, .. } => Some(p_value),
            TestOutcome::Undefined { .. } => None,
        }
    }

    #[must_use]
    pub fn degrees_of_freedom(&self) -> Option<f64> {
        match self.outcome {
            TestOutcome::Defined {
                degrees_of_freedom, ..
            } => Some(degrees_of_freedom),
            TestOutcome::Undefined { .. } => None,
        }
    }

    /// Reason the test could not be computed, if any.
    #[must_use]
    pub fn undefined_reason(&self) -> Option<&UndefinedStatistic> {
        match &self.outcome {
            TestOutcome::Defined { .. } => None,
            TestOutcome::Undefined { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_significance_uses_config_level() {
        let outcome = TestOutcome::Defined {
            statistic: 2.0,
            p_value: 0.03,
            degrees_of_freedom: 10.0,
        };
        let config = EngineConfig::default();
        let default = TestResult::new(TestKind::WelchTTest, outcome.clone(), &config);
        assert!(default.is_significant);

        let strict = EngineConfig {
            significance_level: 0.01,
            ..EngineConfig::default()
        };
        assert!(!TestResult::new(TestKind::WelchTTest, outcome, &strict).is_significant);
    }

    #[test]
    fn test_undefined_is_never_significant() {
        let result = TestResult::new(
            TestKind::ChiSquared,
            TestOutcome::Undefined {
                reason: UndefinedStatistic::ZeroExpectedFrequency { row: 1, column: 0 },
            },
            &EngineConfig::default(),
        );
        assert!(result.outcome.is_undefined());
        assert!(!result.is_significant);
        assert_eq!(result.p_value(), None);
        assert!(result.undefined_reason().is_some());
    }

    #[test]
    fn test_defined_json_shape() {
        let result = TestResult::new(
            TestKind::ChiSquared,
            TestOutcome::Defined {
                statistic: 1.5,
                p_value: 0.25,
                degrees_of_freedom: 1.0,
            },
            &EngineConfig::default(),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "name": "Chi-square test",
                "status": "defined",
                "statistic": 1.5,
                "p_value": 0.25,
                "degrees_of_freedom": 1.0,
                "is_significant": false,
            })
        );
    }

    #[test]
    fn test_undefined_json_shape() {
        let result = TestResult::new(
            TestKind::WelchTTest,
            TestOutcome::Undefined {
                reason: UndefinedStatistic::ZeroStandardError,
            },
            &EngineConfig::default(),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "name": "Welch's t-test",
                "status": "undefined",
                "reason": { "kind": "zero_standard_error" },
                "is_significant": false,
            })
        );
    }
}
