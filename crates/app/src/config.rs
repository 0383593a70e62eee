//! Configuration for the huffroute driver.
//!
//! Handles parsing command-line arguments and resolving defaults. With no
//! arguments a sample script is generated from a time-based seed; the seed
//! is printed with `--print-config` so any run can be replayed.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "huffroute",
    about = "Route named entities into area stores by Huffman-derived codes",
    version
)]
pub struct Cli {
    /// Command script to run (default: generate a sample)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Initial capacity; a `capacity` line in the script overrides it
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub capacity: Option<u32>,

    /// Random seed for sample generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of commands in a generated sample
    #[arg(long, default_value_t = 64)]
    pub sample_commands: usize,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,

    /// Enable info-level logs on stderr (RUST_LOG is honoured when set)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logs
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Script path (None = generate sample)
    pub script: Option<PathBuf>,

    /// Capacity applied before the first command
    pub capacity: Option<u32>,

    /// Seed used when generating a sample
    pub seed: u64,

    /// Generated sample length
    pub sample_commands: usize,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print metrics summary
    pub print_metrics: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        // Determine seed (explicit or time-based)
        let seed = cli.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Config {
            script: cli.script.clone(),
            capacity: cli.capacity,
            seed,
            sample_commands: cli.sample_commands,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.script {
            Some(path) => println!("Script: {}", path.display()),
            None => println!("Script: (generate {} commands)", self.sample_commands),
        }
        match self.capacity {
            Some(capacity) => println!("Capacity: {}", capacity),
            None => println!("Capacity: (from script)"),
        }
        println!("Seed: {}", self.seed);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["huffroute"]);
        let config = Config::from_cli(&cli);
        assert!(config.script.is_none());
        assert!(config.capacity.is_none());
        assert_eq!(config.sample_commands, 64);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_explicit_values() {
        let cli = Cli::parse_from([
            "huffroute",
            "--script",
            "run.txt",
            "--capacity",
            "12",
            "--seed",
            "42",
            "--no-metrics",
        ]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.script, Some(PathBuf::from("run.txt")));
        assert_eq!(config.capacity, Some(12));
        assert_eq!(config.seed, 42);
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_zero_capacity_refused() {
        assert!(Cli::try_parse_from(["huffroute", "--capacity", "0"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["huffroute", "-v", "-q"]).is_err());
    }
}
