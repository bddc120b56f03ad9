//! Listener behaviour against real loopback sockets.

mod helpers;

use std::time::Duration;

use helpers::{TestResult, event_packet, foreign_packet, loopback_config, sender};
use openracing_f1_codec::{Codec, CodecError, CodecErrorKind, DecodedPacket, PacketKind};
use openracing_f1_listener::{
    ListenerConfig, ListenerError, PacketHandler, PacketListener, StatsHandler, run,
};
use tokio::sync::oneshot;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

// ── Binding ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn binds_ephemeral_port() -> TestResult {
    let listener = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let addr = listener.local_addr()?;
    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
    Ok(())
}

#[tokio::test]
async fn rejects_zero_buffer() -> TestResult {
    let config = ListenerConfig {
        max_packet_bytes: 0,
        ..loopback_config()
    };
    let result = PacketListener::bind(config, Codec::standard()?).await;
    assert!(matches!(result, Err(ListenerError::InvalidConfig(_))));
    Ok(())
}

#[tokio::test]
async fn second_bind_on_same_port_fails() -> TestResult {
    let first = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let taken = first.local_addr()?.port();
    let result = PacketListener::bind(loopback_config().with_port(taken), Codec::standard()?).await;
    assert!(matches!(result, Err(ListenerError::Bind { .. })));
    Ok(())
}

// ── Receiving ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn skips_bad_datagrams_and_keeps_going() -> TestResult {
    let mut listener = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let target = listener.local_addr()?;
    let tx = sender().await?;

    tx.send_to(&[0u8; 3], target).await?;
    tx.send_to(&foreign_packet(), target).await?;
    tx.send_to(&event_packet(b"SSTA", 7), target).await?;

    let packet = timeout(WAIT, listener.next_packet()).await?;
    assert_eq!(packet.kind, PacketKind::Event);
    assert_eq!(packet.header.frame_identifier, 7);
    assert_eq!(listener.received(), 3);
    assert_eq!(listener.failed(), 2);
    assert_eq!(listener.recv_errors(), 0);
    Ok(())
}

#[tokio::test]
async fn recv_decoded_surfaces_the_error() -> TestResult {
    let mut listener = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let target = listener.local_addr()?;
    sender().await?.send_to(&event_packet(b"ZZZZ", 1), target).await?;

    let result = timeout(WAIT, listener.recv_decoded()).await?;
    let Err(err) = result else {
        return Err("expected an unknown event code".into());
    };
    assert!(matches!(err, CodecError::UnknownEventCode { .. }));
    assert!(err.partial_record().is_some());
    Ok(())
}

#[tokio::test]
async fn stream_forwards_until_receiver_drops() -> TestResult {
    let listener = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let target = listener.local_addr()?;
    let (mut rx, handle) = listener.into_stream(8);

    let tx = sender().await?;
    for frame in 0..3 {
        tx.send_to(&event_packet(b"LGOT", frame), target).await?;
    }

    let mut frames = Vec::new();
    for _ in 0..3 {
        let packet = timeout(WAIT, rx.recv()).await?.ok_or("stream ended early")?;
        frames.push(packet.header.frame_identifier);
    }
    assert_eq!(frames, vec![0, 1, 2]);

    drop(rx);
    timeout(WAIT, handle).await??;
    Ok(())
}

// ── Handler loop ─────────────────────────────────────────────────────────────

/// Counts through a [`StatsHandler`] and fires `done` after `remaining`
/// decoded packets.
struct StopAfter {
    stats: StatsHandler,
    events: u64,
    remaining: usize,
    done: Option<oneshot::Sender<()>>,
}

impl PacketHandler for StopAfter {
    fn handle_generic(&mut self, packet: &DecodedPacket) {
        self.stats.handle_generic(packet);
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0
            && let Some(done) = self.done.take()
        {
            done.send(()).unwrap_or_default();
        }
    }

    fn handle_error(&mut self, error: &CodecError) {
        self.stats.handle_error(error);
    }

    fn handle_event(&mut self, _packet: &DecodedPacket) {
        self.events = self.events.saturating_add(1);
    }
}

#[tokio::test]
async fn run_dispatches_until_shutdown() -> TestResult {
    let mut listener = PacketListener::bind(loopback_config(), Codec::standard()?).await?;
    let target = listener.local_addr()?;
    let tx = sender().await?;
    tx.send_to(&[1u8; 10], target).await?;
    tx.send_to(&event_packet(b"SEND", 1), target).await?;
    tx.send_to(&event_packet(b"CHQF", 2), target).await?;

    let (done_tx, done_rx) = oneshot::channel();
    let mut handler = StopAfter {
        stats: StatsHandler::new(),
        events: 0,
        remaining: 2,
        done: Some(done_tx),
    };
    let shutdown = async { done_rx.await.unwrap_or_default() };

    let dispatched = timeout(WAIT, run(&mut listener, &mut handler, shutdown)).await??;
    assert_eq!(dispatched, 2);
    assert_eq!(handler.events, 2);
    assert_eq!(handler.stats.count(PacketKind::Event), 2);
    assert_eq!(handler.stats.errors().get(&CodecErrorKind::Length), Some(&1));
    assert_eq!(handler.stats.last_frame(), Some(2));
    Ok(())
}
