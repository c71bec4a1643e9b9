//! Command-line parsing for the `mmm` binary.
//!
//! Parsing and dispatch stay separate from the analysis code; `app` turns a
//! parsed [`Cli`] into engine calls.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mmm", version, about = "Marketing-mix model posterior reports")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// Fitted-model artifact (overrides MMM_MODEL_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Caller credential (overrides MMM_API_TOKEN).
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-channel spend, revenue, ROI and effectiveness plus a portfolio summary.
    Contributions,
    /// Sampled Hill response curves per channel.
    Curves(CurvesArgs),
    /// Channel contributions bucketed into four-step periods.
    Timeseries,
    /// Write every report to a directory as JSON (plus a contributions CSV).
    Report(ReportArgs),
    /// Generate a synthetic fitted-model artifact.
    Synth(SynthArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CurvesArgs {
    /// Only show this channel.
    #[arg(long)]
    pub channel: Option<String>,

    /// Print every N-th curve point (the last point is always printed).
    #[arg(long, default_value_t = 1)]
    pub every: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Output directory (created if missing).
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Artifact file to write.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of media channels.
    #[arg(long, default_value_t = 4)]
    pub channels: usize,

    /// Number of geos.
    #[arg(long, default_value_t = 3)]
    pub geos: usize,

    /// Number of weekly time steps.
    #[arg(long, default_value_t = 52)]
    pub times: usize,

    /// Posterior chains.
    #[arg(long, default_value_t = 2)]
    pub chains: usize,

    /// Posterior draws per chain.
    #[arg(long, default_value_t = 100)]
    pub draws: usize,
}
