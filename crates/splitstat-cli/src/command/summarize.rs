use std::path::PathBuf;

use anyhow::Context;
use splitstat_analysis::summary;

use crate::util::{self, DatasetArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Engine configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let SummarizeArg {
        dataset,
        config,
        output,
    } = arg;

    let config = util::read_engine_config(config.as_deref())?;
    let dataset = dataset.load()?;
    let payload = summary::summarize(&dataset, &config).context("Failed to summarize experiment")?;

    let mut output = Output::from_output_path(output.clone())?;
    tracing::info!(output = %output.display_path(), "writing summary");
    output.write_json(&payload)?;
    Ok(())
}
