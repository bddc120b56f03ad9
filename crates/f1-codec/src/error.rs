//! Error types for the F1 packet codec.
//!
//! Per-packet failures ([`CodecError`]) and startup configuration failures
//! ([`RegistryError`]) are kept apart: the first kind is returned from every
//! decode and is always recoverable by the caller, the second can only occur
//! while schema tables are being registered.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::generation::Generation;
use crate::value::Record;

/// Errors produced while decoding or encoding a single packet.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// A primitive read or write fell outside the buffer.
    #[error("out of bounds: {width}-byte access at offset {offset} (buffer is {len} bytes)")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// The buffer is smaller than the header or the resolved schema.
    #[error("packet too short: {actual} bytes (need {needed})")]
    TooShort { needed: usize, actual: usize },

    /// The (format, version, id) triple has no registered schema.
    ///
    /// `packet_version` and `packet_id` are `None` when the packet format
    /// itself is unknown, since the header layout (and therefore their
    /// offsets) cannot be determined.
    #[error("unknown packet type: {}", DisplayKey(*packet_format, *packet_version, *packet_id))]
    UnknownPacketType {
        packet_format: u16,
        packet_version: Option<u8>,
        packet_id: Option<u8>,
    },

    /// An event packet carried a code with no known mapping.
    ///
    /// `partial` holds everything decoded before the union: the header and
    /// the raw `event_string_code`.
    #[error("unknown event code {}", DisplayCode(code))]
    UnknownEventCode { code: [u8; 4], partial: Box<Record> },

    /// A schema name could not be resolved in the given generation.
    #[error("unknown schema '{name}' in generation {generation}")]
    UnknownSchema {
        generation: Generation,
        name: String,
    },

    /// A record handed to the encoder does not match its schema.
    #[error("value mismatch in {schema}.{field}: expected {expected}")]
    ValueMismatch {
        schema: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// The codec tables failed to build.
    #[error("codec registry unavailable: {0}")]
    Registry(#[from] RegistryError),
}

impl CodecError {
    /// Coarse classification used by listeners and metrics.
    pub fn kind(&self) -> CodecErrorKind {
        match self {
            CodecError::OutOfBounds { .. } | CodecError::TooShort { .. } => CodecErrorKind::Length,
            CodecError::UnknownPacketType { .. } => CodecErrorKind::UnknownPacket,
            CodecError::UnknownEventCode { .. } => CodecErrorKind::UnknownEvent,
            CodecError::UnknownSchema { .. } | CodecError::Registry(_) => {
                CodecErrorKind::Configuration
            }
            CodecError::ValueMismatch { .. } => CodecErrorKind::Encoding,
        }
    }

    /// Whether a listen loop may skip the packet and carry on.
    ///
    /// Everything except a broken registry is a property of one datagram.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != CodecErrorKind::Configuration
    }

    /// The partially decoded record carried by [`CodecError::UnknownEventCode`].
    pub fn partial_record(&self) -> Option<&Record> {
        match self {
            CodecError::UnknownEventCode { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Classification of [`CodecError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecErrorKind {
    Length,
    UnknownPacket,
    UnknownEvent,
    Encoding,
    Configuration,
}

impl fmt::Display for CodecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecErrorKind::Length => "length",
            CodecErrorKind::UnknownPacket => "unknown_packet",
            CodecErrorKind::UnknownEvent => "unknown_event",
            CodecErrorKind::Encoding => "encoding",
            CodecErrorKind::Configuration => "configuration",
        };
        f.pad(name)
    }
}

/// Startup-time failures while building the schema registry or dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("schema '{name}' registered twice in generation {generation}")]
    DuplicateSchema {
        generation: Generation,
        name: &'static str,
    },

    #[error("schema '{schema}' field '{field}' references unregistered schema '{nested}' in generation {generation}")]
    MissingNestedSchema {
        generation: Generation,
        schema: &'static str,
        field: &'static str,
        nested: &'static str,
    },

    #[error("union '{union}' in schema '{schema}' declares no variants")]
    EmptyUnion {
        schema: &'static str,
        union: &'static str,
    },

    #[error("union '{union}' in schema '{schema}' is invalid: {reason}")]
    InvalidUnion {
        schema: &'static str,
        union: &'static str,
        reason: String,
    },

    #[error("packet type {} registered twice", DisplayKey(*packet_format, Some(*packet_version), Some(*packet_id)))]
    DuplicatePacketType {
        packet_format: u16,
        packet_version: u8,
        packet_id: u8,
    },

    #[error("packet route references unknown schema '{name}' in generation {generation}")]
    UnknownSchema {
        generation: Generation,
        name: &'static str,
    },
}

/// A specialized `Result` for per-packet codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A specialized `Result` for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

struct DisplayKey(u16, Option<u8>, Option<u8>);

impl fmt::Display for DisplayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "format={}", self.0)?;
        match self.1 {
            Some(version) => write!(f, " version={version}")?,
            None => f.write_str(" version=?")?,
        }
        match self.2 {
            Some(id) => write!(f, " id={id}"),
            None => f.write_str(" id=?"),
        }
    }
}

struct DisplayCode<'a>(&'a [u8; 4]);

impl fmt::Display for DisplayCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            f.write_str("'")?;
            for byte in self.0 {
                write!(f, "{}", char::from(*byte))?;
            }
            f.write_str("'")
        } else {
            let [a, b, c, d] = *self.0;
            write!(f, "[{a:#04x}, {b:#04x}, {c:#04x}, {d:#04x}]")
        }
    }
}
