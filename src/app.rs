//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and layers them over `.env`/environment settings
//! - installs logging
//! - builds the report engine around a lazily-loaded model repository
//! - prints tables or JSON, or writes exports

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use crate::auth::{Credential, TokenGate};
use crate::cli::{Cli, Command, CurvesArgs, GlobalArgs, SynthArgs};
use crate::config::Settings;
use crate::data::{SynthConfig, generate_artifact};
use crate::error::AppError;
use crate::model::ModelRepository;

pub mod pipeline;

use pipeline::AnalysisEngine;

/// Entry point for the `mmm` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = apply_flags(Settings::from_env()?, &cli.global);
    crate::logging::init(&settings.log_filter, cli.global.verbose);

    let output = execute(&cli, &settings)?;
    print!("{output}");
    Ok(())
}

/// CLI flags win over environment settings.
pub fn apply_flags(mut settings: Settings, global: &GlobalArgs) -> Settings {
    if let Some(path) = &global.model {
        settings.model_path = path.clone();
    }
    if let Some(token) = &global.token {
        settings.api_token = Some(token.clone());
    }
    settings
}

pub fn build_engine(settings: &Settings) -> AnalysisEngine {
    let repository = Arc::new(ModelRepository::from_path(&settings.model_path));
    let gate = match &settings.accepted_token {
        Some(token) => TokenGate::accepting(token.clone()),
        None => TokenGate::any_token(),
    };
    AnalysisEngine::new(repository, gate).with_parameter_names(settings.parameters.clone())
}

/// Run one command and return what should be printed to stdout.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<String, AppError> {
    let caller = Credential::from(settings.api_token.clone());
    let json = cli.global.json;

    match &cli.command {
        Command::Synth(args) => handle_synth(args),
        Command::Contributions => {
            let report = build_engine(settings).contributions(&caller)?;
            if json {
                to_json(&report)
            } else {
                Ok(crate::report::format_contributions(&report))
            }
        }
        Command::Curves(CurvesArgs { channel, every }) => {
            let report = build_engine(settings).response_curves(&caller)?;
            match (json, channel) {
                (true, Some(name)) => {
                    let curve = report
                        .curve(name)
                        .ok_or_else(|| AppError::Config(format!("Unknown channel '{name}'")))?;
                    to_json(&curve.points)
                }
                (true, None) => to_json(&report),
                (false, _) => crate::report::format_curves(&report, channel.as_deref(), *every),
            }
        }
        Command::Timeseries => {
            let report = build_engine(settings).time_series(&caller)?;
            if json {
                to_json(&report)
            } else {
                Ok(crate::report::format_time_series(&report))
            }
        }
        Command::Report(args) => {
            let bundle = build_engine(settings).all_reports(&caller)?;
            let files = crate::io::export::write_report_bundle(&args.out, &bundle)?;
            tracing::info!(dir = %args.out.display(), files = files.len(), "reports exported");
            let mut out = String::new();
            for file in files {
                out.push_str(&format!("wrote {}\n", file.display()));
            }
            Ok(out)
        }
    }
}

fn handle_synth(args: &SynthArgs) -> Result<String, AppError> {
    let config = SynthConfig {
        seed: args.seed,
        channels: args.channels,
        geos: args.geos,
        times: args.times,
        chains: args.chains,
        draws: args.draws,
        ..SynthConfig::default()
    };
    let artifact = generate_artifact(&config)?;
    crate::io::artifact::write_artifact(&args.out, &artifact)?;
    tracing::info!(path = %args.out.display(), seed = args.seed, "synthetic artifact written");
    Ok(format!("wrote {}\n", args.out.display()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(format!("Failed to serialize report: {e}")))?;
    text.push('\n');
    Ok(text)
}
