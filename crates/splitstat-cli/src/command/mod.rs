use clap::{Parser, Subcommand};

use self::{
    generate::GenerateArg, report::ReportArg, series::SeriesArg, summarize::SummarizeArg,
};

mod generate;
mod report;
mod series;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute the statistical summary of an experiment as JSON
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Render a plain-text statistical report of an experiment
    Report(#[clap(flatten)] ReportArg),
    /// Prepare chart data series of an experiment as JSON
    Series(#[clap(flatten)] SeriesArg),
    /// Generate a synthetic experiment dataset as CSV
    Generate(#[clap(flatten)] GenerateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Series(arg) => series::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
    }
    Ok(())
}
