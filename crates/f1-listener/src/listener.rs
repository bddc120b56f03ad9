//! UDP listener.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use openracing_f1_codec::{CodecResult, DecodedPacket};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ListenerConfig;
use crate::decoder::PacketDecoder;
use crate::error::{ListenerError, ListenerResult};
use crate::source::{PacketSource, log_decode_error};

/// First pause after a socket receive error.
pub const RECV_ERROR_BASE_DELAY: Duration = Duration::from_millis(10);

/// Pause before retrying after `consecutive` receive errors in a row.
///
/// Doubles per error and is capped at 64x the base delay.
pub fn recv_error_delay(consecutive: u32) -> Duration {
    RECV_ERROR_BASE_DELAY.saturating_mul(1 << consecutive.saturating_sub(1).min(6))
}

/// Receives datagrams on one UDP socket and decodes them.
///
/// Receive errors and timeouts are logged and retried; they never end the
/// listener; consecutive receive errors back off per [`recv_error_delay`].
/// Decode failures are logged and skipped by
/// [`next_packet`](Self::next_packet).
#[derive(Debug)]
pub struct PacketListener<D> {
    socket: UdpSocket,
    decoder: D,
    config: ListenerConfig,
    buf: Vec<u8>,
    received: u64,
    failed: u64,
    recv_errors: u64,
}

impl<D: PacketDecoder> PacketListener<D> {
    /// # Errors
    ///
    /// [`ListenerError::InvalidConfig`] or [`ListenerError::Bind`].
    pub async fn bind(config: ListenerConfig, decoder: D) -> ListenerResult<Self> {
        let config = config.validate()?;
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;
        let local = socket.local_addr().unwrap_or(addr);
        info!(addr = %local, "F1 UDP listener bound");
        Ok(Self {
            socket,
            decoder,
            buf: vec![0u8; config.max_packet_bytes],
            config,
            received: 0,
            failed: 0,
            recv_errors: 0,
        })
    }

    /// # Errors
    ///
    /// The socket's own address lookup error.
    pub fn local_addr(&self) -> ListenerResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Datagrams received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Datagrams that failed to decode.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Socket receive errors so far.
    pub fn recv_errors(&self) -> u64 {
        self.recv_errors
    }

    async fn recv_datagram(&mut self) -> usize {
        let timeout = self.config.recv_timeout();
        let mut consecutive = 0u32;
        loop {
            match tokio::time::timeout(timeout, self.socket.recv(&mut self.buf)).await {
                Ok(Ok(len)) => {
                    self.received = self.received.saturating_add(1);
                    return len;
                }
                Ok(Err(err)) => {
                    self.recv_errors = self.recv_errors.saturating_add(1);
                    consecutive = consecutive.saturating_add(1);
                    let delay = recv_error_delay(consecutive);
                    warn!(
                        error = %err,
                        consecutive,
                        delay_ms = delay.as_millis(),
                        "F1 UDP receive error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(_) => debug!(
                    timeout_ms = self.config.recv_timeout_ms,
                    "F1 UDP receive timeout"
                ),
            }
        }
    }

    /// Wait for the next datagram and return its decode result.
    pub async fn recv_decoded(&mut self) -> CodecResult<DecodedPacket> {
        let len = self.recv_datagram().await;
        let raw = self.buf.get(..len).unwrap_or_default();
        let result = self.decoder.decode(raw);
        if let Err(err) = &result {
            self.failed = self.failed.saturating_add(1);
            log_decode_error(err, len);
        }
        result
    }

    /// Wait for the next datagram that decodes.
    pub async fn next_packet(&mut self) -> DecodedPacket {
        loop {
            if let Ok(packet) = self.recv_decoded().await {
                return packet;
            }
        }
    }
}

impl<D: PacketDecoder + 'static> PacketListener<D> {
    /// Move the listener onto a task that forwards decoded packets.
    ///
    /// The task ends when the receiver is dropped.
    pub fn into_stream(
        mut self,
        capacity: usize,
    ) -> (mpsc::Receiver<DecodedPacket>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = tx.closed() => break,
                    packet = self.next_packet() => {
                        if tx.send(packet).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(received = self.received, failed = self.failed, "F1 UDP listener stopped");
        });
        (rx, handle)
    }
}

#[async_trait]
impl<D: PacketDecoder> PacketSource for PacketListener<D> {
    async fn next_decoded(&mut self) -> ListenerResult<Option<CodecResult<DecodedPacket>>> {
        Ok(Some(self.recv_decoded().await))
    }
}
