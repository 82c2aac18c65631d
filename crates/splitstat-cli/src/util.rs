use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use splitstat_analysis::{
    config::EngineConfig,
    ingest::{self, ColumnMapping},
    record::{ArmPair, DEFAULT_CONTROL_LABEL, DEFAULT_TEST_LABEL, Dataset},
};

/// Destination of a command's result: a file, or stdout when no path is given
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>, PathBuf),
}

impl Output {
    pub fn from_output_path(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File(BufWriter::new(file), path))
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File(_, path) => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut text = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize JSON for {}", self.display_path()))?;
        text.push('\n');
        self.write_text(&text)
    }

    pub fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.write_all(text.as_bytes())
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to write to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File(writer, _) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File(writer, _) => writer.flush(),
        }
    }
}

/// Reads and deserializes a JSON file, naming `file_kind` in errors.
pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Labels of the two arms
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ArmArg {
    /// Label of the control arm
    #[arg(long = "control", default_value = DEFAULT_CONTROL_LABEL)]
    control: String,
    /// Label of the test arm
    #[arg(long = "test", default_value = DEFAULT_TEST_LABEL)]
    test: String,
}

impl ArmArg {
    pub fn arm_pair(&self) -> anyhow::Result<ArmPair> {
        ArmPair::new(&self.control, &self.test).context("Invalid arm labels")
    }
}

/// Experiment data file and how to interpret it
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DatasetArg {
    /// CSV file with one row per subject
    #[arg(value_name = "DATA")]
    data: PathBuf,
    #[clap(flatten)]
    arms: ArmArg,
}

impl DatasetArg {
    pub fn load(&self) -> anyhow::Result<Dataset> {
        let path = &self.data;
        let file = File::open(path)
            .with_context(|| format!("Failed to open data file: {}", path.display()))?;
        let records = ingest::read_csv(BufReader::new(file), &ColumnMapping::default())
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;
        let dataset = Dataset::new(records, self.arms.arm_pair()?)
            .with_context(|| format!("Invalid experiment data in {}", path.display()))?;
        tracing::info!(records = dataset.len(), path = %path.display(), "loaded experiment data");
        Ok(dataset)
    }
}

pub fn read_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => read_json_file::<EngineConfig>("config", path)?,
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}
