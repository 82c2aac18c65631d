//! Synthetic experiment data
//!
//! Generates a reproducible two-arm dataset for demos and tests. Each subject
//! is assigned to an arm with equal probability and converts with the arm's
//! rate. Subjects arrive one minute apart. Auxiliary counters follow
//! `clicks ~ Poisson(λ_arm)` and `views = clicks + U{0, 1, 2}`.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::record::{Arm, ArmPair, ExperimentRecord};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SyntheticError {
    #[display("{arm:?} conversion rate must be in [0, 1], got {value}")]
    InvalidRate { arm: Arm, value: f64 },
    #[display("{arm:?} clicks rate must be positive and finite, got {value}")]
    InvalidClicksRate { arm: Arm, value: f64 },
}

/// Parameters of the synthetic generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub users: usize,
    pub control_rate: f64,
    pub test_rate: f64,
    /// Mean clicks per control subject.
    pub control_clicks_rate: f64,
    /// Mean clicks per test subject.
    pub test_clicks_rate: f64,
    /// Timestamp of the first subject.
    pub start: NaiveDateTime,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            users: 1000,
            control_rate: 0.12,
            test_rate: 0.16,
            control_clicks_rate: 3.0,
            test_clicks_rate: 4.0,
            start: NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    fn rate(&self, arm: Arm) -> f64 {
        match arm {
            Arm::Control => self.control_rate,
            Arm::Test => self.test_rate,
        }
    }

    fn clicks_rate(&self, arm: Arm) -> f64 {
        match arm {
            Arm::Control => self.control_clicks_rate,
            Arm::Test => self.test_clicks_rate,
        }
    }

    fn clicks_distribution(&self, arm: Arm) -> Result<Poisson<f64>, SyntheticError> {
        let value = self.clicks_rate(arm);
        Poisson::new(value).map_err(|_| SyntheticError::InvalidClicksRate { arm, value })
    }

    pub fn validate(&self) -> Result<(), SyntheticError> {
        for arm in Arm::ALL {
            let value = self.rate(arm);
            if !(0.0..=1.0).contains(&value) {
                return Err(SyntheticError::InvalidRate { arm, value });
            }
            let value = self.clicks_rate(arm);
            if !(value.is_finite() && value > 0.0) {
                return Err(SyntheticError::InvalidClicksRate { arm, value });
            }
        }
        Ok(())
    }
}

/// Samples `config.users` records from `rng`.
pub fn sample<R>(
    rng: &mut R,
    config: &SyntheticConfig,
    arms: &ArmPair,
) -> Result<Vec<ExperimentRecord>, SyntheticError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let clicks_distribution = [
        config.clicks_distribution(Arm::Control)?,
        config.clicks_distribution(Arm::Test)?,
    ];

    let mut timestamp = config.start;
    let mut records = Vec::with_capacity(config.users);
    for id in 1..=config.users {
        let arm = if rng.random_bool(0.5) {
            Arm::Test
        } else {
            Arm::Control
        };
        let converted = rng.random_bool(config.rate(arm));
        let clicks: f64 = clicks_distribution[arm.index()].sample(rng);
        let views = clicks + f64::from(rng.random_range(0..3_u8));

        records.push(
            ExperimentRecord::new(id.to_string(), arms.label(arm), converted)
                .with_timestamp(timestamp)
                .with_counter("clicks", clicks)
                .with_counter("views", views),
        );
        timestamp += TimeDelta::minutes(1);
    }
    Ok(records)
}

/// Generates a dataset from `config.seed`; the same seed always gives the
/// same records.
pub fn generate(
    config: &SyntheticConfig,
    arms: &ArmPair,
) -> Result<Vec<ExperimentRecord>, SyntheticError> {
    let mut rng = Pcg64::seed_from_u64(config.seed);
    let records = sample(&mut rng, config, arms)?;
    tracing::debug!(users = records.len(), seed = config.seed, "generated synthetic records");
    Ok(records)
}
