//! Configuration settings for the Mastermind deduction engine

use crate::error::DomainError;
use crate::mastermind::{BoardDimensions, Palette};
use crate::sat::SolverOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub encoding: EncodingConfig,
    pub solver: SolverConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub columns: usize,
    pub rows: usize,
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub distinct_guess_colours: bool,
    pub distinct_answer_colours: bool,
    pub row_termination: RowTermination,
}

/// Which guess rows may be entirely Black
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTermination {
    /// Any row may be solved
    Unrestricted,
    /// Only the last row may be solved
    FinalRowOnly,
    /// No row may be solved
    EveryRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Cap on enumerated models per count (none = unbounded)
    pub max_solutions: Option<u64>,
    /// Wall-clock budget per query in seconds (none = unbounded)
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub fixture_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                columns: 4,
                rows: 1,
                palette: ["purple", "red", "green", "yellow", "teal", "orange"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            encoding: EncodingConfig {
                distinct_guess_colours: true,
                distinct_answer_colours: true,
                row_termination: RowTermination::FinalRowOnly,
            },
            solver: SolverConfig {
                max_solutions: Some(100_000),
                timeout_seconds: Some(60),
            },
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.dimensions().context("Invalid board size")?;
        self.palette().context("Invalid palette")?;

        if self.solver.max_solutions == Some(0) {
            anyhow::bail!("Maximum solutions must be positive when set");
        }

        if let Some(fixture) = &self.input.fixture_file {
            if !fixture.exists() {
                anyhow::bail!("Fixture file does not exist: {}", fixture.display());
            }
        }

        Ok(())
    }

    pub fn dimensions(&self) -> Result<BoardDimensions, DomainError> {
        BoardDimensions::new(self.board.columns, self.board.rows)
    }

    pub fn palette(&self) -> Result<Palette, DomainError> {
        Palette::new(self.board.palette.iter().cloned())
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            max_solutions: self.solver.max_solutions,
            timeout: self.solver.timeout_seconds.map(Duration::from_secs),
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = Some(max_solutions);
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout);
        }
        if let Some(ref fixture) = cli_overrides.fixture_file {
            self.input.fixture_file = Some(fixture.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_solutions: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub fixture_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}
