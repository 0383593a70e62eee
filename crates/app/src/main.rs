//! huffroute: run a command script against the dispatcher.
//!
//! Reads a script (or generates a seeded sample), executes it line by line
//! and prints command output on stdout. Logs go to stderr.

mod config;
mod driver;
mod error;
mod input_gen;
mod output;
mod script;

use clap::Parser;
use config::{Cli, Config};
use driver::Driver;
use error::{AppError, Result};
use huffroute_core::Capacity;
use std::io::{self, Write};
use std::process::ExitCode;

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = Config::from_cli(&cli);
    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let text = match &config.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            tracing::info!(seed = config.seed, commands = config.sample_commands, "generating sample script");
            input_gen::generate_script(config.seed, config.sample_commands)
        }
    };
    let commands = script::parse_script(&text)?;

    let capacity = config
        .capacity
        .map(Capacity::new)
        .transpose()
        .map_err(|source| AppError::Core { line: 0, source })?;
    let mut driver = Driver::new(capacity);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (line, command) in &commands {
        driver.execute(*line, command, &mut out)?;
    }
    out.flush()?;

    if let Some(metrics) = driver.finish() {
        tracing::info!(
            requested = metrics.encodes_requested,
            routed = metrics.routed(),
            evicted = metrics.evicted(),
            "run complete"
        );
        if config.print_metrics {
            metrics.print_summary();
        }
    }
    Ok(())
}
