//! The composed codec: header decoder, dispatch table and decoder engine.

use std::sync::OnceLock;

use serde_json::Value as Json;
use tracing::{debug, trace};

use crate::decoder::Decoder;
use crate::dispatch::{DispatchTable, PacketKey, PacketKind, PacketRoute};
use crate::encoder::Encoder;
use crate::error::{CodecResult, RegistryError, RegistryResult};
use crate::formats::{self, FormatDefinition};
use crate::generation::Generation;
use crate::header::{PacketHeader, decode_header};
use crate::registry::SchemaRegistry;
use crate::structured::to_structured;
use crate::value::Record;

/// One fully decoded datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    pub header: PacketHeader,
    pub kind: PacketKind,
    pub generation: Generation,
    /// The whole packet, header included, as decoded from its schema.
    pub record: Record,
}

impl DecodedPacket {
    pub fn to_structured(&self) -> Json {
        to_structured(&self.record)
    }

    /// Re-encode with the codec that produced this packet.
    ///
    /// # Errors
    ///
    /// See [`Codec::to_bytes`].
    pub fn to_bytes(&self, codec: &Codec) -> CodecResult<Vec<u8>> {
        codec.to_bytes(self.generation, &self.record)
    }
}

impl Record {
    /// Re-encode this record, nested or whole-packet, with its schema in
    /// `generation`.
    ///
    /// # Errors
    ///
    /// See [`Codec::to_bytes`].
    pub fn to_bytes(&self, codec: &Codec, generation: Generation) -> CodecResult<Vec<u8>> {
        codec.to_bytes(generation, self)
    }
}

/// Immutable schema registry plus dispatch table.
///
/// Built once from static format definitions and shared by reference; all
/// methods take `&self`, so a codec may be used from many threads at once.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: SchemaRegistry,
    dispatch: DispatchTable,
}

impl Codec {
    /// Build a codec from format definitions.
    ///
    /// # Errors
    ///
    /// Any [`RegistryError`]: duplicate schemas or packet types, or
    /// references to schemas that are not registered.
    pub fn from_formats(formats: &[&'static FormatDefinition]) -> RegistryResult<Self> {
        let mut registry = SchemaRegistry::new();
        let mut dispatch = DispatchTable::new();

        for format in formats {
            registry.register_all(format.generation, format.schemas)?;
            for &(kind, schema) in format.packets {
                let key = PacketKey::new(
                    format.generation.packet_format(),
                    format.packet_version,
                    kind.id(),
                );
                dispatch.register(
                    PacketRoute {
                        key,
                        kind,
                        generation: format.generation,
                        schema,
                    },
                    &registry,
                )?;
            }
            debug!(
                generation = %format.generation,
                schemas = format.schemas.len(),
                packets = format.packets.len(),
                "registered packet format"
            );
        }

        Ok(Self { registry, dispatch })
    }

    /// The process-wide codec for every built-in generation.
    ///
    /// # Errors
    ///
    /// Returns the registry error if the built-in tables are inconsistent;
    /// the same error is returned on every call.
    pub fn standard() -> Result<&'static Codec, RegistryError> {
        static STANDARD: OnceLock<Result<Codec, RegistryError>> = OnceLock::new();
        STANDARD
            .get_or_init(|| Codec::from_formats(&formats::ALL))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn decoder(&self, generation: Generation) -> Decoder<'_> {
        Decoder::new(&self.registry, generation)
    }

    pub fn encoder(&self, generation: Generation) -> Encoder<'_> {
        Encoder::new(&self.registry, generation)
    }

    /// Decode a whole datagram: header, dispatch, then the packet schema.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TooShort`](crate::CodecError::TooShort) for a buffer
    ///   smaller than its header or its packet schema.
    /// - [`CodecError::UnknownPacketType`](crate::CodecError::UnknownPacketType)
    ///   for an unmapped `(format, version, id)`.
    /// - [`CodecError::UnknownEventCode`](crate::CodecError::UnknownEventCode)
    ///   for an event packet with an unmapped code.
    pub fn resolve(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        let (header, _) = decode_header(raw)?;
        let route = self.dispatch.resolve(
            header.packet_format,
            header.packet_version,
            header.packet_id,
        )?;
        let schema = self.registry.resolve(route.generation, route.schema)?;
        let record = self.decoder(route.generation).decode(raw, schema)?;
        trace!(kind = %route.kind, frame = header.frame_identifier, "decoded packet");
        Ok(DecodedPacket {
            header,
            kind: route.kind,
            generation: route.generation,
            record,
        })
    }

    /// Decode `raw` as a named schema of `generation`.
    ///
    /// # Errors
    ///
    /// See [`Decoder::decode_named`].
    pub fn decode(&self, raw: &[u8], generation: Generation, schema: &str) -> CodecResult<Record> {
        self.decoder(generation).decode_named(raw, schema)
    }

    /// Re-encode a record produced by this codec.
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode`].
    pub fn to_bytes(&self, generation: Generation, record: &Record) -> CodecResult<Vec<u8>> {
        self.encoder(generation).encode(record)
    }
}

/// Decode a datagram with the built-in codec.
///
/// # Errors
///
/// See [`Codec::resolve`]; also fails with
/// [`CodecError::Registry`](crate::CodecError::Registry) if the built-in
/// tables could not be built.
pub fn resolve(raw: &[u8]) -> CodecResult<DecodedPacket> {
    Codec::standard()?.resolve(raw)
}
