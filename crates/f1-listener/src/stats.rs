//! A handler that counts what it sees.

use std::collections::BTreeMap;
use std::fmt;

use openracing_f1_codec::{CodecError, CodecErrorKind, DecodedPacket, PacketKind};
use serde::Serialize;

use crate::handler::PacketHandler;

/// Packet and error counts, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsHandler {
    total: u64,
    per_kind: BTreeMap<PacketKind, u64>,
    errors: BTreeMap<CodecErrorKind, u64>,
    last_frame: Option<u32>,
}

impl StatsHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets decoded.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, kind: PacketKind) -> u64 {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn per_kind(&self) -> &BTreeMap<PacketKind, u64> {
        &self.per_kind
    }

    pub fn error_count(&self) -> u64 {
        self.errors.values().sum()
    }

    pub fn errors(&self) -> &BTreeMap<CodecErrorKind, u64> {
        &self.errors
    }

    /// Frame identifier of the most recent packet.
    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }
}

impl PacketHandler for StatsHandler {
    fn handle_generic(&mut self, packet: &DecodedPacket) {
        self.total = self.total.saturating_add(1);
        let count = self.per_kind.entry(packet.kind).or_default();
        *count = count.saturating_add(1);
        self.last_frame = Some(packet.header.frame_identifier);
    }

    fn handle_error(&mut self, error: &CodecError) {
        let count = self.errors.entry(error.kind()).or_default();
        *count = count.saturating_add(1);
    }
}

impl fmt::Display for StatsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "packets: {}", self.total)?;
        for (kind, count) in &self.per_kind {
            writeln!(f, "  {kind:<22} {count}")?;
        }
        write!(f, "errors: {}", self.error_count())?;
        for (kind, count) in &self.errors {
            write!(f, "\n  {kind:<22} {count}")?;
        }
        Ok(())
    }
}
