//! f1tel - F1 UDP telemetry tool
//!
//! Listen to, record, replay and decode EA/Codemasters F1 telemetry.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{DecodeArgs, ListenArgs, RecordArgs, ReplayArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "f1tel")]
#[command(about = "F1 UDP telemetry tool - listen, record, replay and decode packets")]
#[command(version)]
#[command(long_about = "
f1tel decodes the UDP telemetry broadcast by the EA/Codemasters F1 games
(packet formats 2022 and 2024).

Point the game's UDP telemetry output at this machine (default port 20777).
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print decoded packets as they arrive
    Listen(ListenArgs),

    /// Record decodable packets to a capture file
    Record(RecordArgs),

    /// Decode every packet of a capture file
    Replay(ReplayArgs),

    /// Decode a single raw datagram file
    Decode(DecodeArgs),

    /// List registered packet formats and their wire sizes
    Formats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = ["f1tel", "openracing_f1_listener", "openracing_f1_codec"]
        .map(|target| format!("{target}={log_level}"))
        .join(",");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, cli.json).await,
        Commands::Record(args) => commands::record::execute(args, cli.json).await,
        Commands::Replay(args) => commands::replay::execute(args, cli.json).await,
        Commands::Decode(args) => commands::decode::execute(args, cli.json),
        Commands::Formats => commands::formats::execute(cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // --- Global flag parsing ---

    #[test]
    fn parse_formats_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "formats"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.command, Commands::Formats));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "formats", "--json", "-vv"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    // --- Subcommand parsing ---

    #[test]
    fn parse_listen_with_count() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "listen", "--port", "20888", "-n", "5"])?;
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert_eq!(args.socket.port, Some(20888));
        assert_eq!(args.count, Some(5));
        Ok(())
    }

    #[test]
    fn parse_listen_rejects_zero_count() {
        assert!(Cli::try_parse_from(["f1tel", "listen", "--count", "0"]).is_err());
    }

    #[test]
    fn parse_record_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "record", "--out", "session.f1cap"])?;
        let Commands::Record(args) = cli.command else {
            return Err("expected record".into());
        };
        assert_eq!(args.out, Path::new("session.f1cap"));
        assert_eq!(args.per_kind_limit, 1000);
        assert!(args.duration.is_none());
        Ok(())
    }

    #[test]
    fn parse_record_requires_out() {
        assert!(Cli::try_parse_from(["f1tel", "record"]).is_err());
    }

    #[test]
    fn parse_bind_address() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "record", "-o", "x", "--bind", "127.0.0.1"])?;
        let Commands::Record(args) = cli.command else {
            return Err("expected record".into());
        };
        assert_eq!(args.socket.bind.map(|a| a.to_string()).as_deref(), Some("127.0.0.1"));
        assert!(Cli::try_parse_from(["f1tel", "record", "-o", "x", "--bind", "nowhere"]).is_err());
        Ok(())
    }

    #[test]
    fn decode_error_exit_code() {
        let err = CliError::Decode(openracing_f1_codec::CodecError::TooShort {
            needed: 24,
            actual: 2,
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(CliError::InvalidConfiguration(String::new()).exit_code(), 1);
    }
}
