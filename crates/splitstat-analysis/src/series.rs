//! Data series for external chart renderers
//!
//! Nothing here draws anything. Each function turns a dataset into the rows a
//! chart needs:
//!
//! - [`percent_metrics`]: conversion rate and interval bounds in percent
//! - [`daily_conversion`]: conversion rate per calendar day and arm
//! - [`cumulative_conversion`]: running conversion rate per arm over time
//! - [`funnel`]: totals of every auxiliary counter plus the conversions
//!
//! Time-based series only use records with a timestamp.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    metrics::GroupMetrics,
    record::{Arm, Dataset},
};

/// Name of the last funnel stage.
pub const CONVERTED_STAGE: &str = "converted";

#[expect(clippy::cast_precision_loss)]
fn percent(successes: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        successes as f64 / n as f64 * 100.0
    }
}

/// Group metrics scaled to percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentMetrics {
    pub arm: String,
    pub rate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl From<&GroupMetrics> for PercentMetrics {
    fn from(metrics: &GroupMetrics) -> Self {
        Self {
            arm: metrics.arm.clone(),
            rate: metrics.rate * 100.0,
            ci_lower: metrics.ci_lower * 100.0,
            ci_upper: metrics.ci_upper * 100.0,
        }
    }
}

#[must_use]
pub fn percent_metrics(metrics: &[GroupMetrics]) -> Vec<PercentMetrics> {
    metrics.iter().map(PercentMetrics::from).collect()
}

/// Conversion rate of one arm on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConversion {
    pub date: NaiveDate,
    pub arm: String,
    pub n: usize,
    pub successes: usize,
    pub rate_percent: f64,
}

/// Conversion rate per (day, arm), ordered by date then arm.
#[must_use]
pub fn daily_conversion(dataset: &Dataset) -> Vec<DailyConversion> {
    let mut days = BTreeMap::<(NaiveDate, Arm), (usize, usize)>::new();
    let mut skipped = 0;
    for record in dataset.records() {
        let Some(timestamp) = record.timestamp else {
            skipped += 1;
            continue;
        };
        let entry = days
            .entry((timestamp.date(), dataset.arm_of(record)))
            .or_default();
        entry.0 += 1;
        entry.1 += usize::from(record.converted);
    }
    if skipped > 0 {
        tracing::debug!(skipped, "records without timestamp skipped from daily series");
    }

    days.into_iter()
        .map(|((date, arm), (n, successes))| DailyConversion {
            date,
            arm: dataset.arms().label(arm).to_owned(),
            n,
            successes,
            rate_percent: percent(successes, n),
        })
        .collect()
}

/// Running conversion state of one arm after one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub timestamp: NaiveDateTime,
    pub arm: String,
    pub cumulative_conversions: usize,
    pub cumulative_users: usize,
    pub cumulative_rate_percent: f64,
}

/// Running conversion rate per arm, one point per timestamped record.
///
/// Records are ordered by timestamp; records sharing a timestamp keep their
/// input order.
#[must_use]
pub fn cumulative_conversion(dataset: &Dataset) -> Vec<CumulativePoint> {
    let mut timed = dataset
        .records()
        .iter()
        .filter_map(|record| record.timestamp.map(|ts| (ts, record)))
        .collect::<Vec<_>>();
    let skipped = dataset.len() - timed.len();
    if skipped > 0 {
        tracing::debug!(skipped, "records without timestamp skipped from cumulative series");
    }
    timed.sort_by_key(|(ts, _)| *ts);

    let mut running = BTreeMap::<Arm, (usize, usize)>::new();
    timed
        .into_iter()
        .map(|(timestamp, record)| {
            let arm = dataset.arm_of(record);
            let (users, conversions) = running.entry(arm).or_default();
            *users += 1;
            *conversions += usize::from(record.converted);
            CumulativePoint {
                timestamp,
                arm: dataset.arms().label(arm).to_owned(),
                cumulative_conversions: *conversions,
                cumulative_users: *users,
                cumulative_rate_percent: percent(*conversions, *users),
            }
        })
        .collect()
}

/// Total of one funnel stage in one arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub stage: String,
    pub arm: String,
    pub total: f64,
}

/// Funnel stages per arm.
///
/// Auxiliary counters come first, widest stage first (ties by name), then
/// the [`CONVERTED_STAGE`]. Each stage lists the control arm then the test
/// arm.
#[must_use]
pub fn funnel(dataset: &Dataset) -> Vec<FunnelStage> {
    let mut totals = BTreeMap::<&str, [f64; 2]>::new();
    let mut conversions = [0.0; 2];
    for record in dataset.records() {
        let index = dataset.arm_of(record).index();
        for (name, value) in &record.counters {
            totals.entry(name.as_str()).or_default()[index] += value;
        }
        conversions[index] += f64::from(u8::from(record.converted));
    }

    let mut stages = totals.into_iter().collect::<Vec<_>>();
    // stable sort keeps name order among equal totals
    stages.sort_by(|(_, a), (_, b)| (b[0] + b[1]).total_cmp(&(a[0] + a[1])));
    stages.push((CONVERTED_STAGE, conversions));

    stages
        .into_iter()
        .flat_map(|(stage, per_arm)| {
            Arm::ALL.iter().map(move |&arm| FunnelStage {
                stage: stage.to_owned(),
                arm: dataset.arms().label(arm).to_owned(),
                total: per_arm[arm.index()],
            })
        })
        .collect()
}

/// Every series for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub metrics: Vec<PercentMetrics>,
    pub daily: Vec<DailyConversion>,
    pub cumulative: Vec<CumulativePoint>,
    pub funnel: Vec<FunnelStage>,
}

impl PlotSeries {
    #[must_use]
    pub fn compute(dataset: &Dataset, config: &EngineConfig) -> Self {
        Self {
            metrics: percent_metrics(&GroupMetrics::compute_all(dataset, config)),
            daily: daily_conversion(dataset),
            cumulative: cumulative_conversion(dataset),
            funnel: funnel(dataset),
        }
    }
}
