use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use fnreplay_rs::service::{error_json, FullReport, MatchReport};
use fnreplay_rs::{decode_replay_full, DecodeError};

/// Print the furthest and the final kill of a Fortnite replay as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to a `.replay` file
    replay: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Include every kill, match stats and skipped events
    #[arg(long)]
    full: bool,
}

fn report(bytes: &[u8], full: bool) -> Result<Value, DecodeError> {
    let replay = decode_replay_full(bytes)?;
    let value = if full {
        serde_json::to_value(FullReport::from(&replay))
    } else {
        serde_json::to_value(MatchReport::from(&fnreplay_rs::aggregate(&replay.kills)))
    };
    Ok(value.unwrap_or_else(|err| error_json(&err.to_string())))
}

fn print(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let bytes = fs::read(&args.replay)
        .with_context(|| format!("failed to read {}", args.replay.display()))?;
    tracing::info!(path = %args.replay.display(), bytes = bytes.len(), "decoding replay");

    match report(&bytes, args.full) {
        Ok(value) => {
            print(&value, args.pretty)?;
            Ok(true)
        }
        Err(err) => {
            tracing::error!(%err, "replay could not be decoded");
            print(&error_json(&err.to_string()), args.pretty)?;
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
