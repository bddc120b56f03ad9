//! `f1tel record`: capture decodable datagrams to a file.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use openracing_f1_codec::{Codec, PacketKind};
use openracing_f1_listener::{PacketListener, RecordingDecoder, StatsHandler, run};
use serde::Serialize;
use tracing::info;

use crate::commands::{RecordArgs, shutdown_signal};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct RecordSummary {
    listen: String,
    duration_seconds: Option<u64>,
    packets_seen: u64,
    packets_recorded: u64,
    per_kind: BTreeMap<PacketKind, usize>,
    output: String,
}

pub async fn execute(args: &RecordArgs, json: bool) -> Result<()> {
    if args.per_kind_limit == 0 {
        return Err(
            CliError::InvalidConfiguration("--per-kind-limit must be > 0".to_string()).into(),
        );
    }

    let config = args.socket.listener_config()?;
    let recorder = RecordingDecoder::with_per_kind_limit(Codec::standard()?, args.per_kind_limit);
    let mut listener = PacketListener::bind(config, recorder)
        .await
        .context("failed to bind UDP capture socket (is another process using this port?)")?;
    let listen = listener.local_addr()?.to_string();
    info!(listen = %listen, out = %args.out.display(), "recording");

    let mut stats = StatsHandler::new();
    let shutdown = shutdown_signal(None, args.duration.map(Duration::from_secs));
    run(&mut listener, &mut stats, shutdown).await?;

    let recorder = listener.decoder();
    let packets_recorded = recorder
        .save(&args.out)
        .with_context(|| format!("failed to write capture file '{}'", args.out.display()))?;

    let summary = RecordSummary {
        listen,
        duration_seconds: args.duration,
        packets_seen: stats.total(),
        packets_recorded,
        per_kind: recorder.counts(),
        output: args.out.display().to_string(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Telemetry capture complete");
        println!("  listen: {}", summary.listen);
        println!("  packets seen: {}", summary.packets_seen);
        println!("  packets recorded: {}", summary.packets_recorded);
        for (kind, count) in &summary.per_kind {
            println!("    {kind:<20} {count}");
        }
        println!("  output: {}", summary.output);
    }
    Ok(())
}
