use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tempest forecast verification.
#[derive(Parser)]
#[command(
    name = "tempest",
    version,
    about = "Categorical and SEEPS verification of gridded weather forecasts"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Score predictions against targets with the configured metrics.
    Evaluate(EvaluateArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tempest.toml")]
    pub config: PathBuf,

    /// Path to JSON file holding `predictions` and `targets`.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for metrics JSON output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
