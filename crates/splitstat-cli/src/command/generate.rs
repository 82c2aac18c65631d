use std::path::PathBuf;

use anyhow::Context;
use splitstat_analysis::{
    ingest::{self, ColumnMapping},
    synthetic::{self, SyntheticConfig},
};

use crate::util::{ArmArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Number of subjects to generate
    #[arg(long, default_value_t = 1000)]
    users: usize,
    /// Conversion rate of the control arm
    #[arg(long, default_value_t = 0.12)]
    control_rate: f64,
    /// Conversion rate of the test arm
    #[arg(long, default_value_t = 0.16)]
    test_rate: f64,
    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[clap(flatten)]
    arms: ArmArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let config = SyntheticConfig {
        users: arg.users,
        control_rate: arg.control_rate,
        test_rate: arg.test_rate,
        seed: arg.seed,
        ..SyntheticConfig::default()
    };
    let arms = arg.arms.arm_pair()?;
    let records =
        synthetic::generate(&config, &arms).context("Failed to generate synthetic data")?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    tracing::info!(
        users = records.len(),
        output = %output.display_path(),
        "writing synthetic data"
    );
    let path = output.display_path();
    ingest::write_csv(&mut output, &records, &ColumnMapping::default())
        .with_context(|| format!("Failed to write CSV to {path}"))?;
    Ok(())
}
