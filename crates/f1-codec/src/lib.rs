//! Schema-driven codec for EA/Codemasters F1 UDP telemetry.
//!
//! Every packet layout is declared once as static [`schema::Schema`] data
//! and registered per [`Generation`]. Decoding reads the header, routes the
//! `(packet_format, packet_version, packet_id)` triple to a schema and walks
//! its fields into a [`Record`]; encoding walks the same schema back to the
//! exact wire bytes.
//!
//! ```no_run
//! # fn main() -> Result<(), openracing_f1_codec::CodecError> {
//! let datagram: Vec<u8> = Vec::new();
//! let packet = openracing_f1_codec::resolve(&datagram)?;
//! println!("{} {}", packet.kind, packet.to_structured());
//! # Ok(())
//! # }
//! ```
//!
//! The crate performs no I/O and keeps no mutable state; one [`Codec`] can
//! be shared by any number of threads.

#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod decoder;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod generation;
pub mod header;
pub mod lookup;
pub mod primitive;
pub mod registry;
pub mod schema;
pub mod structured;
pub mod value;

pub use codec::{Codec, DecodedPacket, resolve};
pub use dispatch::{DispatchTable, PacketKey, PacketKind, PacketRoute};
pub use error::{CodecError, CodecErrorKind, CodecResult, RegistryError, RegistryResult};
pub use generation::Generation;
pub use header::{PacketHeader, decode_header};
pub use registry::{RegisteredSchema, SchemaRegistry};
pub use structured::to_structured;
pub use value::{FixedText, Record, SplitDuration, UnionValue, Value};
