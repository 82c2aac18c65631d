use std::path::PathBuf;

use splitstat_analysis::series::PlotSeries;

use crate::util::{self, DatasetArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SeriesArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Engine configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SeriesArg) -> anyhow::Result<()> {
    let SeriesArg {
        dataset,
        config,
        output,
    } = arg;

    let config = util::read_engine_config(config.as_deref())?;
    let dataset = dataset.load()?;
    let series = PlotSeries::compute(&dataset, &config);
    tracing::info!(
        days = series.daily.len(),
        points = series.cumulative.len(),
        "prepared chart series"
    );

    let mut output = Output::from_output_path(output.clone())?;
    output.write_json(&series)?;
    Ok(())
}
