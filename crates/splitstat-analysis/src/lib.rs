//! Statistical summarization of two-arm online experiments
//!
//! This crate turns raw per-subject experiment records into the statistics a
//! ship/no-ship decision rests on: conversion rates with confidence intervals,
//! a difference-of-means test, an association test and a standardized effect
//! size.
//!
//! # Overview
//!
//! ## Summarization Workflow
//!
//! 1. **Load Records** ([`ingest::read_csv`]): Parse a CSV export into
//!    [`record::ExperimentRecord`]s
//! 2. **Validate** ([`record::Dataset`]): Reject unknown arms, duplicate
//!    subjects and malformed values before anything is computed
//! 3. **Summarize** ([`summary::summarize`]): Compute
//!    - per-arm [`metrics::GroupMetrics`]
//!    - Welch's t-test ([`summary::difference_test`])
//!    - chi-squared test of independence ([`summary::association_test`])
//!    - Cohen's d ([`summary::effect_size`])
//!
//! ## Charting Workflow
//!
//! [`series::PlotSeries`] prepares percent-scaled metrics, daily and
//! cumulative conversion rates and funnel totals for an external renderer.
//!
//! ## Demo Data
//!
//! [`synthetic::generate`] produces a seeded, reproducible dataset.
//!
//! # Degenerate and Undefined Results
//!
//! An arm without records is not an error: its rate and interval are 0 and
//! its effect size is 0. A test whose statistic is mathematically undefined
//! (too few observations, zero standard error, zero expected frequency)
//! reports [`result::TestOutcome::Undefined`] and is never significant.
//!
//! # Examples
//!
//! ```
//! use splitstat_analysis::{
//!     config::EngineConfig, ingest, record::ArmPair, summary,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let data = "\
//! user_id,group,converted
//! 1,control,0
//! 2,control,1
//! 3,control,0
//! 4,test,1
//! 5,test,1
//! 6,test,0
//! ";
//! let records = ingest::read_csv(data.as_bytes(), &ingest::ColumnMapping::default())?;
//! let payload = summary::summarize_records(records, ArmPair::default(), &EngineConfig::default())?;
//!
//! assert_eq!(payload.metrics[0].n, 3);
//! assert!(!payload.association_test.is_significant);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ingest;
pub mod metrics;
pub mod record;
pub mod result;
pub mod series;
pub mod summary;
pub mod synthetic;

/// Error preventing a summary from being computed.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("malformed input: {_0}")]
    MalformedInput(#[error(source)] record::MalformedInputError),
    #[display("invalid configuration: {_0}")]
    InvalidConfig(#[error(source)] config::ConfigError),
}
