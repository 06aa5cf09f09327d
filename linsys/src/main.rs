mod cli;
mod config;
mod logging;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, info_span};

use linsys_core::solver::LinearSolver;
use linsys_core::system::{build_system, check_system};

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let _cmd = info_span!("linsys").entered();
    let config = AppConfig::load(cli.config.as_deref())?.merge(cli)?;

    if cli.check_identity {
        for check in check_system::<f64>(config.size) {
            println!("{check}");
        }
        println!();
    }

    let system = build_system::<f64>(config.size)
        .with_context(|| format!("failed to build a system of size {}", config.size))?;

    info!(path = %config.output.display(), "writing report");
    let file = File::create(&config.output)
        .with_context(|| format!("failed to create report file: {}", config.output.display()))?;
    let mut out = BufWriter::new(file);

    let solver = LinearSolver::new(config.report, config.solver);
    let report = solver
        .solve(&system.a, &system.y, &mut out)
        .context("failed to solve the linear system")?;
    out.flush()
        .with_context(|| format!("failed to write report file: {}", config.output.display()))?;

    info!(condition = report.condition().value, "done");
    Ok(())
}
