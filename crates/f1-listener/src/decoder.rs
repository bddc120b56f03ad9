//! The decode step, injected into listeners, recorders and replay.

use std::sync::Arc;

use openracing_f1_codec::{Codec, CodecResult, DecodedPacket};

/// Turns one datagram into a decoded packet.
pub trait PacketDecoder: Send + Sync {
    /// # Errors
    ///
    /// Any per-packet [`CodecError`](openracing_f1_codec::CodecError).
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket>;
}

impl PacketDecoder for Codec {
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        self.resolve(raw)
    }
}

impl<D: PacketDecoder + ?Sized> PacketDecoder for &D {
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        (**self).decode(raw)
    }
}

impl<D: PacketDecoder + ?Sized> PacketDecoder for Arc<D> {
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        (**self).decode(raw)
    }
}

impl<D: PacketDecoder + ?Sized> PacketDecoder for Box<D> {
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        (**self).decode(raw)
    }
}
