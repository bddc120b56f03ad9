//! Record re-encoding, the inverse of the decoder's field walk.
//!
//! Wire widths come from the registry, never from the values, so any record
//! the decoder produced encodes back to the exact bytes it was read from.

use crate::error::{CodecError, CodecResult};
use crate::generation::Generation;
use crate::primitive::{ByteWriter, ScalarKind};
use crate::registry::{RegisteredSchema, SchemaRegistry};
use crate::schema::{Field, FieldType};
use crate::value::{Record, Value};

/// Encodes records against the schemas of one generation.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r SchemaRegistry,
    generation: Generation,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r SchemaRegistry, generation: Generation) -> Self {
        Self {
            registry,
            generation,
        }
    }

    /// Encode `record` with the schema it was decoded from.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownSchema`] if the record's schema is not
    /// registered, [`CodecError::ValueMismatch`] if a field is missing or
    /// does not match its declared type or length.
    pub fn encode(&self, record: &Record) -> CodecResult<Vec<u8>> {
        let schema = self.registry.resolve(self.generation, record.schema())?;
        let mut w = ByteWriter::with_capacity(schema.wire_size());
        self.write_record(schema, record, &mut w)?;
        Ok(w.into_inner())
    }

    fn write_record(
        &self,
        schema: &RegisteredSchema,
        record: &Record,
        w: &mut ByteWriter,
    ) -> CodecResult<()> {
        for (field, width) in schema.layout() {
            let value = record.get(field.name).ok_or(CodecError::ValueMismatch {
                schema: schema.name(),
                field: field.name,
                expected: "a value for every declared field",
            })?;
            self.write_value(schema.name(), field, &field.ty, width, value, w)?;
        }
        Ok(())
    }

    fn write_value(
        &self,
        schema: &'static str,
        field: &'static Field,
        ty: &FieldType,
        width: usize,
        value: &Value,
        w: &mut ByteWriter,
    ) -> CodecResult<()> {
        let mismatch = |expected| CodecError::ValueMismatch {
            schema,
            field: field.name,
            expected,
        };

        match (*ty, value) {
            (FieldType::Scalar(kind), scalar) if ScalarKind::of(scalar) == Some(kind) => {
                w.write_scalar(scalar)?;
            }
            (FieldType::Text(len), Value::Text(text)) if text.len() == len => {
                w.write_bytes(text.as_bytes());
            }
            (FieldType::SplitDuration, Value::Duration(duration)) => {
                let (ms_part, minutes_part) = duration.parts();
                w.write_u16_le(ms_part).write_u8(minutes_part);
            }
            (FieldType::Array(element, len), Value::Array(items)) if items.len() == len => {
                let element_width = width.checked_div(len).unwrap_or(0);
                for item in items {
                    self.write_value(schema, field, element, element_width, item, w)?;
                }
            }
            (FieldType::Record(name), Value::Record(nested)) if nested.schema() == name => {
                let nested_schema = self.registry.resolve(self.generation, name)?;
                self.write_record(nested_schema, nested, w)?;
            }
            (FieldType::EventUnion(_), Value::Union(union)) if union.raw().len() == width => {
                let mut region = union.raw().to_vec();
                if let Some(payload) = union.payload() {
                    let encoded = self.encode(payload)?;
                    let dst = region
                        .get_mut(..encoded.len())
                        .ok_or(mismatch("a union payload no larger than the union"))?;
                    dst.copy_from_slice(&encoded);
                }
                w.write_bytes(&region);
            }
            (FieldType::Scalar(_), _) => return Err(mismatch("a scalar of the declared kind")),
            (FieldType::Text(_), _) => return Err(mismatch("text of the declared length")),
            (FieldType::SplitDuration, _) => return Err(mismatch("a split duration")),
            (FieldType::Array(..), _) => return Err(mismatch("an array of the declared length")),
            (FieldType::Record(_), _) => return Err(mismatch("a record of the declared schema")),
            (FieldType::EventUnion(_), _) => return Err(mismatch("a union of the declared width")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::error::RegistryError;
    use crate::schema::{F32, SPLIT, Schema, U16};
    use crate::value::FixedText;
    use crate::{array_of, schema};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    static POINT: Schema = schema!("Point" { x: F32, y: F32 });
    static TRACE: Schema = schema!("Trace" {
        id: U16,
        points: array_of![FieldType::Record("Point"); 3],
        label: FieldType::Text(5),
        best_in_ms: SPLIT,
    });

    fn registry() -> Result<SchemaRegistry, RegistryError> {
        let mut registry = SchemaRegistry::new();
        registry.register_all(Generation::F2022, &[&POINT, &TRACE])?;
        Ok(registry)
    }

    #[test]
    fn decode_then_encode_is_exact() -> TestResult {
        let registry = registry()?;
        let bytes: Vec<u8> = (0u8..=255).cycle().skip(13).take(2 + 24 + 5 + 3).collect();
        let record = Decoder::new(&registry, Generation::F2022).decode_named(&bytes, "Trace")?;
        let encoded = Encoder::new(&registry, Generation::F2022).encode(&record)?;
        assert_eq!(encoded, bytes);
        Ok(())
    }

    #[test]
    fn wrong_scalar_kind_is_a_mismatch() -> TestResult {
        let registry = registry()?;
        let mut record = Record::new("Point");
        record.push("x", Value::F32(1.0));
        record.push("y", Value::U8(1));
        let err = Encoder::new(&registry, Generation::F2022).encode(&record);
        assert!(matches!(
            err,
            Err(CodecError::ValueMismatch {
                schema: "Point",
                field: "y",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn missing_field_is_a_mismatch() -> TestResult {
        let registry = registry()?;
        let mut record = Record::new("Point");
        record.push("x", Value::F32(1.0));
        let err = Encoder::new(&registry, Generation::F2022).encode(&record);
        assert!(matches!(err, Err(CodecError::ValueMismatch { field: "y", .. })));
        Ok(())
    }

    #[test]
    fn array_length_must_match_the_field() -> TestResult {
        let registry = registry()?;
        let mut trace = Record::new("Trace");
        trace.push("id", Value::U16(1));
        trace.push("points", Value::Array(Vec::new()));
        trace.push("label", Value::Text(FixedText::padded("abc", 5)));
        let err = Encoder::new(&registry, Generation::F2022).encode(&trace);
        assert!(matches!(err, Err(CodecError::ValueMismatch { field: "points", .. })));
        Ok(())
    }

    #[test]
    fn unknown_schema_cannot_be_encoded() {
        let registry = SchemaRegistry::new();
        let err = Encoder::new(&registry, Generation::F2024).encode(&Record::new("Ghost"));
        assert!(matches!(err, Err(CodecError::UnknownSchema { .. })));
    }
}
