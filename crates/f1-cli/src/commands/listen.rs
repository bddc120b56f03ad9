//! `f1tel listen`: print packets as they arrive.

use anyhow::{Context, Result};
use openracing_f1_codec::{Codec, CodecError, DecodedPacket};
use openracing_f1_listener::{PacketHandler, PacketListener, StatsHandler, run};
use tokio::sync::oneshot;
use tracing::info;

use crate::commands::{ListenArgs, shutdown_signal};
use crate::output::print_packet;

/// Prints every packet and fires `done` once `remaining` reaches zero.
struct PrintHandler {
    json: bool,
    stats: StatsHandler,
    remaining: Option<u64>,
    done: Option<oneshot::Sender<()>>,
}

impl PacketHandler for PrintHandler {
    fn handle_generic(&mut self, packet: &DecodedPacket) {
        self.stats.handle_generic(packet);
        print_packet(packet, self.json);

        if let Some(remaining) = &mut self.remaining {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0
                && let Some(done) = self.done.take()
            {
                done.send(()).unwrap_or_default();
            }
        }
    }

    fn handle_error(&mut self, error: &CodecError) {
        self.stats.handle_error(error);
    }
}

pub async fn execute(args: &ListenArgs, json: bool) -> Result<()> {
    let config = args.socket.listener_config()?;
    let codec = Codec::standard()?;
    let mut listener = PacketListener::bind(config, codec)
        .await
        .context("failed to start F1 UDP listener (is another process using this port?)")?;

    let (done_tx, done_rx) = oneshot::channel();
    let mut handler = PrintHandler {
        json,
        stats: StatsHandler::new(),
        remaining: args.count,
        done: Some(done_tx),
    };
    let shutdown = shutdown_signal(Some(done_rx), None);
    let dispatched = run(&mut listener, &mut handler, shutdown).await?;
    info!(dispatched, failed = listener.failed(), "listen finished");

    if !json {
        eprintln!("{}", handler.stats);
    }
    Ok(())
}
