use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Failures of the listener, recorder and capture files.
///
/// Per-packet decode failures are not listener errors; they are logged and
/// handed to the handler as [`CodecError`](openracing_f1_codec::CodecError).
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind UDP socket at {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("invalid listener configuration: {0}")]
    InvalidConfig(String),

    #[error("not a capture file (magic {found:?})")]
    BadMagic { found: [u8; 8] },

    #[error("capture file truncated inside packet {index}")]
    Truncated { index: u64 },

    #[error("captured packet {index} claims {len} bytes (limit {limit})")]
    OversizedPacket { index: u64, len: u32, limit: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ListenerResult<T> = Result<T, ListenerError>;
