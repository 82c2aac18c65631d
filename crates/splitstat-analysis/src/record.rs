//! Experiment records and input validation
//!
//! An experiment is a collection of [`ExperimentRecord`]s, one per subject.
//! Before any statistic is computed the collection is validated into a
//! [`Dataset`]:
//!
//! - every subject identifier is non-empty and unique
//! - every arm label belongs to the configured [`ArmPair`]
//! - every auxiliary counter is a finite number
//!
//! Validation fails fast with a [`MalformedInputError`]; there are no partial
//! results. An arm without any records is *not* malformed: it is a legitimate
//! degenerate group handled by each statistic.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default label of the control arm.
pub const DEFAULT_CONTROL_LABEL: &str = "control";
/// Default label of the test arm.
pub const DEFAULT_TEST_LABEL: &str = "test";

/// Input rejected before computation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedInputError {
    #[display("required column '{column}' is missing")]
    MissingColumn { column: String },
    #[display("row {row}: outcome must be 0 or 1, got '{value}'")]
    NonBinaryOutcome { row: usize, value: String },
    #[display("subject '{subject_id}': arm '{arm}' is neither '{control}' nor '{test}'")]
    UnknownArm {
        subject_id: String,
        arm: String,
        control: String,
        test: String,
    },
    #[display("control and test arms must differ, both are '{label}'")]
    IdenticalArmLabels { label: String },
    #[display("subject '{subject_id}' appears more than once")]
    DuplicateSubjectId { subject_id: String },
    #[display("row {row}: subject identifier is empty")]
    EmptySubjectId { row: usize },
    #[display("row {row}: invalid timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
    #[display("row {row}: counter '{counter}' is not a finite number: '{value}'")]
    InvalidCounter {
        row: usize,
        counter: String,
        value: String,
    },
}

/// One of the two arms of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    Control,
    Test,
}

impl Arm {
    /// Both arms, control first.
    pub const ALL: [Arm; 2] = [Arm::Control, Arm::Test];

    /// Position of the arm in [`Arm::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Arm::Control => 0,
            Arm::Test => 1,
        }
    }
}

/// The labels identifying the control and test arms in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArmPair {
    control: String,
    test: String,
}

impl Default for ArmPair {
    fn default() -> Self {
        Self {
            control: DEFAULT_CONTROL_LABEL.to_owned(),
            test: DEFAULT_TEST_LABEL.to_owned(),
        }
    }
}

impl ArmPair {
    pub fn new(
        control: impl Into<String>,
        test: impl Into<String>,
    ) -> Result<Self, MalformedInputError> {
        let control = control.into();
        let test = test.into();
        if control == test {
            return Err(MalformedInputError::IdenticalArmLabels { label: control });
        }
        Ok(Self { control, test })
    }

    #[must_use]
    pub fn label(&self, arm: Arm) -> &str {
        match arm {
            Arm::Control => &self.control,
            Arm::Test => &self.test,
        }
    }

    /// Maps an input label to its arm, or `None` for a foreign label.
    #[must_use]
    pub fn classify(&self, label: &str) -> Option<Arm> {
        if label == self.control {
            Some(Arm::Control)
        } else if label == self.test {
            Some(Arm::Test)
        } else {
            None
        }
    }
}

/// A single subject of the experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Unique subject identifier.
    pub subject_id: String,
    /// Arm label, one of the experiment's [`ArmPair`].
    pub arm: String,
    /// Whether the subject converted.
    pub converted: bool,
    /// When the subject was observed, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    /// Auxiliary counters (e.g. clicks, views), for descriptive use only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counters: BTreeMap<String, f64>,
}

impl ExperimentRecord {
    #[must_use]
    pub fn new(subject_id: impl Into<String>, arm: impl Into<String>, converted: bool) -> Self {
        Self {
            subject_id: subject_id.into(),
            arm: arm.into(),
            converted,
            timestamp: None,
            counters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_counter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.counters.insert(name.into(), value);
        self
    }

    /// The outcome as a 0/1 sample value.
    #[must_use]
    pub fn outcome(&self) -> f64 {
        if self.converted { 1.0 } else { 0.0 }
    }
}

/// A validated, immutable collection of experiment records.
#[derive(Debug, Clone)]
pub struct Dataset {
    arms: ArmPair,
    records: Vec<ExperimentRecord>,
}

impl Dataset {
    /// Validates `records` against `arms`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_analysis::record::{ArmPair, Dataset, ExperimentRecord, MalformedInputError};
    ///
    /// let records = vec![
    ///     ExperimentRecord::new("1", "control", false),
    ///     ExperimentRecord::new("2", "test", true),
    ///     ExperimentRecord::new("3", "holdout", true),
    /// ];
    /// let err = Dataset::new(records, ArmPair::default()).unwrap_err();
    /// assert!(matches!(err, MalformedInputError::UnknownArm { .. }));
    /// ```
    pub fn new(
        records: Vec<ExperimentRecord>,
        arms: ArmPair,
    ) -> Result<Self, MalformedInputError> {
        let mut seen = HashSet::with_capacity(records.len());
        for (row, record) in (1..).zip(&records) {
            if record.subject_id.trim().is_empty() {
                return Err(MalformedInputError::EmptySubjectId { row });
            }
            if arms.classify(&record.arm).is_none() {
                return Err(MalformedInputError::UnknownArm {
                    subject_id: record.subject_id.clone(),
                    arm: record.arm.clone(),
                    control: arms.control.clone(),
                    test: arms.test.clone(),
                });
            }
            if let Some((counter, value)) = record.counters.iter().find(|(_, v)| !v.is_finite()) {
                return Err(MalformedInputError::InvalidCounter {
                    row,
                    counter: counter.clone(),
                    value: value.to_string(),
                });
            }
            if !seen.insert(record.subject_id.as_str()) {
                return Err(MalformedInputError::DuplicateSubjectId {
                    subject_id: record.subject_id.clone(),
                });
            }
        }
        Ok(Self { arms, records })
    }

    #[must_use]
    pub fn arms(&self) -> &ArmPair {
        &self.arms
    }

    #[must_use]
    pub fn records(&self) -> &[ExperimentRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to `arm`, in input order.
    pub fn records_in(&self, arm: Arm) -> impl Iterator<Item = &ExperimentRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| self.arms.classify(&r.arm) == Some(arm))
    }

    /// Outcomes of `arm` as 0/1 sample values.
    #[must_use]
    pub fn outcomes(&self, arm: Arm) -> Vec<f64> {
        self.records_in(arm).map(ExperimentRecord::outcome).collect()
    }

    /// The arm a validated record belongs to.
    pub(crate) fn arm_of(&self, record: &ExperimentRecord) -> Arm {
        // validated in `new`
        self.arms.classify(&record.arm).unwrap_or(Arm::Control)
    }
}
