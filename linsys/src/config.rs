use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use linsys_core::report::ReportFormat;
use linsys_core::solver::SolverOptions;

use crate::cli::Cli;

/// Top-level linsys configuration. Every key is optional.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// System dimension.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Report file written next to the console output.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Column width and significant digits.
    #[serde(default)]
    pub report: ReportFormat,

    #[serde(default)]
    pub solver: SolverOptions,
}

fn default_size() -> usize {
    3
}
fn default_output() -> PathBuf {
    PathBuf::from("results.txt")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            output: default_output(),
            report: ReportFormat::default(),
            solver: SolverOptions::default(),
        }
    }
}

impl AppConfig {
    /// Read a TOML file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }

    /// Apply command-line overrides and check the result.
    pub fn merge(mut self, cli: &Cli) -> Result<Self> {
        if let Some(size) = cli.size {
            self.size = size;
        }
        if let Some(output) = &cli.output {
            self.output.clone_from(output);
        }
        if self.size == 0 {
            bail!("system size must be at least 1");
        }
        if self.report.precision == 0 {
            bail!("report precision must be at least 1");
        }
        Ok(self)
    }
}
