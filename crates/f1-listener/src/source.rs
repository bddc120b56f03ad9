//! Anything that yields decode attempts: a live socket or a capture file.

use async_trait::async_trait;
use openracing_f1_codec::{CodecError, CodecResult, DecodedPacket};
use tracing::{debug, warn};

use crate::error::ListenerResult;

#[async_trait]
pub trait PacketSource: Send {
    /// Wait for the next datagram and decode it.
    ///
    /// `Ok(None)` means the source is exhausted. Decode failures are
    /// logged by the source and returned inside `Some`; they never end it.
    async fn next_decoded(&mut self) -> ListenerResult<Option<CodecResult<DecodedPacket>>>;
}

/// Log a per-packet decode failure at the level its kind deserves.
pub(crate) fn log_decode_error(err: &CodecError, len: usize) {
    match err {
        CodecError::UnknownPacketType { .. } => {
            debug!(error = %err, len, "skipping unknown packet type");
        }
        _ => warn!(error = %err, kind = %err.kind(), len, "packet decode failed"),
    }
}
