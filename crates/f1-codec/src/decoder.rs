//! Schema-driven decoder engine.
//!
//! Fields are read in declaration order. Each field is given exactly its
//! registered width as a sub-slice, so nested records and arrays always
//! decode with a zero-based cursor and can never read past their own
//! region. Bytes beyond the schema's wire size are never touched.

use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::generation::Generation;
use crate::primitive::ByteReader;
use crate::registry::{RegisteredSchema, SchemaRegistry};
use crate::schema::{FieldType, UnionSchema};
use crate::value::{Record, SplitDuration, UnionValue, Value};

/// Decodes buffers against the schemas of one generation.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
    generation: Generation,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r SchemaRegistry, generation: Generation) -> Self {
        Self {
            registry,
            generation,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Decode `buf` as `schema`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TooShort`] if `buf` is shorter than the schema.
    /// - [`CodecError::UnknownEventCode`] if an event union's code has no
    ///   mapping; the error carries the fields decoded so far.
    pub fn decode(&self, buf: &[u8], schema: &RegisteredSchema) -> CodecResult<Record> {
        let needed = schema.wire_size();
        if buf.len() < needed {
            return Err(CodecError::TooShort {
                needed,
                actual: buf.len(),
            });
        }
        trace!(schema = schema.name(), needed, len = buf.len(), "decoding record");
        self.read_record(schema, &mut ByteReader::new(buf))
            .map_err(|err| match err {
                CodecError::OutOfBounds { .. } => CodecError::TooShort {
                    needed,
                    actual: buf.len(),
                },
                other => other,
            })
    }

    /// Decode `buf` as the schema registered under `name`.
    ///
    /// # Errors
    ///
    /// As [`Decoder::decode`], plus [`CodecError::UnknownSchema`].
    pub fn decode_named(&self, buf: &[u8], name: &str) -> CodecResult<Record> {
        let schema = self.registry.resolve(self.generation, name)?;
        self.decode(buf, schema)
    }

    fn read_record(
        &self,
        schema: &RegisteredSchema,
        r: &mut ByteReader<'_>,
    ) -> CodecResult<Record> {
        let mut record = Record::with_capacity(schema.name(), schema.field_widths().len());
        for (field, width) in schema.layout() {
            let region = r.bytes(width)?;
            let value = match field.ty {
                FieldType::EventUnion(union) => self.read_union(&record, union, region)?,
                ty => self.read_value(&ty, &mut ByteReader::new(region))?,
            };
            record.push(field.name, value);
        }
        Ok(record)
    }

    fn read_value(&self, ty: &FieldType, r: &mut ByteReader<'_>) -> CodecResult<Value> {
        match *ty {
            FieldType::Scalar(kind) => r.scalar(kind),
            FieldType::Text(len) => r.text(len).map(Value::Text),
            FieldType::SplitDuration => {
                let ms_part = r.u16_le()?;
                let minutes_part = r.u8()?;
                Ok(Value::Duration(SplitDuration::from_parts(ms_part, minutes_part)))
            }
            FieldType::Array(element, len) => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value(element, r)?);
                }
                Ok(Value::Array(items))
            }
            FieldType::Record(name) => {
                let nested = self.registry.resolve(self.generation, name)?;
                let region = r.bytes(nested.wire_size())?;
                self.read_record(nested, &mut ByteReader::new(region))
                    .map(Value::Record)
            }
            FieldType::EventUnion(union) => Err(CodecError::ValueMismatch {
                schema: union.name,
                field: union.selector,
                expected: "a union declared directly on a record",
            }),
        }
    }

    fn read_union(
        &self,
        partial: &Record,
        union: &'static UnionSchema,
        region: &[u8],
    ) -> CodecResult<Value> {
        let code = partial
            .get(union.selector)
            .and_then(Value::as_text)
            .and_then(|text| <[u8; 4]>::try_from(text.as_bytes()).ok())
            .ok_or(CodecError::ValueMismatch {
                schema: union.name,
                field: union.selector,
                expected: "a 4-byte event code",
            })?;

        let Some(event) = union.code(code) else {
            return Err(CodecError::UnknownEventCode {
                code,
                partial: Box::new(partial.clone()),
            });
        };

        let Some(variant) = event.variant.and_then(|name| union.variant(name)) else {
            return Ok(Value::Union(UnionValue::new(code, None, region)));
        };

        let schema = self.registry.resolve(self.generation, variant.schema)?;
        let payload = self.read_record(schema, &mut ByteReader::new(region))?;
        Ok(Value::Union(UnionValue::new(
            code,
            Some((variant.name, payload)),
            region,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::schema::{EventCode, F32, I8, Schema, SPLIT, U8, U16, UnionVariant};
    use crate::{array_of, schema};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    static WHEEL: Schema = schema!("Wheel" {
        pressure: F32,
        temperature: U8,
    });

    static CAR: Schema = schema!("Car" {
        speed: U16,
        gear: I8,
        wheels: array_of![FieldType::Record("Wheel"); 2],
        lap_time_in_ms: SPLIT,
        name: FieldType::Text(6),
    });

    static PING: Schema = schema!("Ping" { idx: U8 });
    static PONG: Schema = schema!("Pong" { a: U16, b: U16 });

    static BALL: UnionSchema = UnionSchema {
        name: "Ball",
        selector: "code",
        variants: &[
            UnionVariant { name: "ping", schema: "Ping" },
            UnionVariant { name: "pong", schema: "Pong" },
        ],
        codes: &[
            EventCode { code: *b"PING", variant: Some("ping"), description: "" },
            EventCode { code: *b"PONG", variant: Some("pong"), description: "" },
            EventCode { code: *b"IDLE", variant: None, description: "" },
        ],
    };

    static MATCH: Schema = schema!("Match" {
        frame: U8,
        code: FieldType::Text(4),
        details: FieldType::EventUnion(&BALL),
    });

    fn registry() -> Result<SchemaRegistry, RegistryError> {
        let mut registry = SchemaRegistry::new();
        registry.register_all(
            Generation::F2024,
            &[&WHEEL, &CAR, &PING, &PONG, &MATCH],
        )?;
        Ok(registry)
    }

    fn car_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&312u16.to_le_bytes());
        buf.push(0xFF);
        for (pressure, temp) in [(23.5f32, 90u8), (24.0, 95)] {
            buf.extend_from_slice(&pressure.to_le_bytes());
            buf.push(temp);
        }
        buf.extend_from_slice(&59_999u16.to_le_bytes());
        buf.push(2);
        buf.extend_from_slice(b"ALO\0xy");
        buf
    }

    #[test]
    fn decodes_fields_in_order_with_nested_records() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);
        let record = decoder.decode_named(&car_bytes(), "Car")?;

        let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["speed", "gear", "wheels", "lap_time_in_ms", "name"]);
        assert_eq!(record.get("speed"), Some(&Value::U16(312)));
        assert_eq!(record.get("gear"), Some(&Value::I8(-1)));
        assert_eq!(record.path("wheels.1.temperature"), Some(&Value::U8(95)));
        assert_eq!(record.array("wheels").map(<[Value]>::len), Some(2));
        assert_eq!(record.unsigned("lap_time_in_ms"), Some(179_999));
        assert_eq!(record.text("name").as_deref(), Some("ALO"));
        Ok(())
    }

    #[test]
    fn trailing_bytes_are_ignored() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);
        let mut bytes = car_bytes();
        let plain = decoder.decode_named(&bytes, "Car")?;
        bytes.extend_from_slice(&[0xAB; 7]);
        assert_eq!(decoder.decode_named(&bytes, "Car")?, plain);
        Ok(())
    }

    #[test]
    fn short_buffer_fails_before_any_field() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);
        let bytes = car_bytes();
        let short = bytes.get(..bytes.len().saturating_sub(1)).unwrap_or_default();
        assert!(matches!(
            decoder.decode_named(short, "Car"),
            Err(CodecError::TooShort {
                needed: 22,
                actual: 21
            })
        ));
        Ok(())
    }

    fn match_bytes(code: &[u8; 4], payload: [u8; 4]) -> Vec<u8> {
        let mut buf = vec![9];
        buf.extend_from_slice(code);
        buf.extend_from_slice(&payload);
        buf
    }

    #[test]
    fn union_decodes_only_the_selected_variant() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);

        let ping = decoder.decode_named(&match_bytes(b"PING", [7, 1, 2, 3]), "Match")?;
        let union = ping.get("details").and_then(Value::as_union);
        assert_eq!(union.and_then(UnionValue::variant_name), Some("ping"));
        assert_eq!(
            union.and_then(UnionValue::payload).and_then(|p| p.u8("idx")),
            Some(7)
        );
        assert_eq!(ping.path("details.pong"), None);

        let pong = decoder.decode_named(&match_bytes(b"PONG", [1, 0, 2, 0]), "Match")?;
        assert_eq!(pong.path("details.pong.b"), Some(&Value::U16(2)));
        Ok(())
    }

    #[test]
    fn payload_less_code_has_no_variant() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);
        let idle = decoder.decode_named(&match_bytes(b"IDLE", [0; 4]), "Match")?;
        let union = idle.get("details").and_then(Value::as_union);
        assert_eq!(union.map(UnionValue::variant_name), Some(None));
        assert_eq!(union.map(UnionValue::code), Some(*b"IDLE"));
        Ok(())
    }

    #[test]
    fn unknown_code_keeps_the_partial_record() -> TestResult {
        let registry = registry()?;
        let decoder = Decoder::new(&registry, Generation::F2024);
        let err = decoder.decode_named(&match_bytes(b"WHAT", [0; 4]), "Match");
        let Err(CodecError::UnknownEventCode { code, partial }) = err else {
            return Err("expected UnknownEventCode".into());
        };
        assert_eq!(&code, b"WHAT");
        assert_eq!(partial.u8("frame"), Some(9));
        assert_eq!(partial.text("code").as_deref(), Some("WHAT"));
        assert!(partial.get("details").is_none());
        Ok(())
    }
}
