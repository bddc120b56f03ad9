//! Versioned schema registry.
//!
//! Schemas are registered per [`Generation`]. Every name a schema refers to
//! (nested records, union variants) must already be registered in the same
//! generation, so the registry rejects incomplete layouts at startup and the
//! decoder never meets an unresolved name.

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{CodecError, CodecResult, RegistryError, RegistryResult};
use crate::generation::Generation;
use crate::schema::{Field, FieldType, SPLIT_DURATION_WIDTH, Schema, UnionSchema};

/// A schema together with its resolved wire widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSchema {
    schema: &'static Schema,
    field_widths: Box<[usize]>,
    wire_size: usize,
}

impl RegisteredSchema {
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    /// Total packed size in bytes.
    pub fn wire_size(&self) -> usize {
        self.wire_size
    }

    /// Width of each field, in declaration order.
    pub fn field_widths(&self) -> &[usize] {
        &self.field_widths
    }

    /// Fields paired with their wire widths.
    pub fn layout(&self) -> impl Iterator<Item = (&'static Field, usize)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(self.field_widths.iter().copied())
    }
}

/// Immutable-after-build catalog of schemas keyed by generation and name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    generations: BTreeMap<Generation, BTreeMap<&'static str, RegisteredSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` in `generation` and return its wire size.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken, if a nested record or union variant is
    /// not registered yet, or if a union is malformed.
    pub fn register(
        &mut self,
        generation: Generation,
        schema: &'static Schema,
    ) -> RegistryResult<usize> {
        if self.get(generation, schema.name).is_some() {
            return Err(RegistryError::DuplicateSchema {
                generation,
                name: schema.name,
            });
        }

        let mut field_widths = Vec::with_capacity(schema.fields.len());
        for (index, field) in schema.fields.iter().enumerate() {
            field_widths.push(self.type_width(generation, schema, index, field, &field.ty)?);
        }
        let wire_size = field_widths
            .iter()
            .fold(0usize, |acc, width| acc.saturating_add(*width));

        trace!(%generation, schema = schema.name, wire_size, "registered schema");
        self.generations.entry(generation).or_default().insert(
            schema.name,
            RegisteredSchema {
                schema,
                field_widths: field_widths.into_boxed_slice(),
                wire_size,
            },
        );
        Ok(wire_size)
    }

    /// Register schemas in order; nested layouts must come first.
    ///
    /// # Errors
    ///
    /// Stops at the first schema that fails [`SchemaRegistry::register`].
    pub fn register_all(
        &mut self,
        generation: Generation,
        schemas: &[&'static Schema],
    ) -> RegistryResult<()> {
        for &schema in schemas {
            self.register(generation, schema)?;
        }
        Ok(())
    }

    /// Look up a schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownSchema`] if `name` is not registered in
    /// `generation`.
    pub fn resolve(&self, generation: Generation, name: &str) -> CodecResult<&RegisteredSchema> {
        self.get(generation, name)
            .ok_or_else(|| CodecError::UnknownSchema {
                generation,
                name: name.to_owned(),
            })
    }

    pub fn get(&self, generation: Generation, name: &str) -> Option<&RegisteredSchema> {
        self.generations.get(&generation)?.get(name)
    }

    /// All schemas of one generation, sorted by name.
    pub fn schemas(&self, generation: Generation) -> impl Iterator<Item = &RegisteredSchema> {
        self.generations
            .get(&generation)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    pub fn generations(&self) -> impl Iterator<Item = Generation> + '_ {
        self.generations.keys().copied()
    }

    /// Number of schemas across every generation.
    pub fn len(&self) -> usize {
        self.generations.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_width(
        &self,
        generation: Generation,
        schema: &'static Schema,
        index: usize,
        field: &'static Field,
        ty: &FieldType,
    ) -> RegistryResult<usize> {
        match *ty {
            FieldType::Scalar(kind) => Ok(kind.width()),
            FieldType::Text(len) => Ok(len),
            FieldType::SplitDuration => Ok(SPLIT_DURATION_WIDTH),
            FieldType::Array(FieldType::EventUnion(union), _) => Err(RegistryError::InvalidUnion {
                schema: schema.name,
                union: union.name,
                reason: "a union cannot be an array element".to_owned(),
            }),
            FieldType::Array(element, len) => Ok(self
                .type_width(generation, schema, index, field, element)?
                .saturating_mul(len)),
            FieldType::Record(nested) => self.nested_width(generation, schema, field, nested),
            FieldType::EventUnion(union) => {
                self.union_width(generation, schema, index, field, union)
            }
        }
    }

    fn nested_width(
        &self,
        generation: Generation,
        schema: &'static Schema,
        field: &'static Field,
        nested: &'static str,
    ) -> RegistryResult<usize> {
        self.get(generation, nested)
            .map(RegisteredSchema::wire_size)
            .ok_or(RegistryError::MissingNestedSchema {
                generation,
                schema: schema.name,
                field: field.name,
                nested,
            })
    }

    fn union_width(
        &self,
        generation: Generation,
        schema: &'static Schema,
        index: usize,
        field: &'static Field,
        union: &'static UnionSchema,
    ) -> RegistryResult<usize> {
        let invalid = |reason: String| RegistryError::InvalidUnion {
            schema: schema.name,
            union: union.name,
            reason,
        };

        if union.variants.is_empty() {
            return Err(RegistryError::EmptyUnion {
                schema: schema.name,
                union: union.name,
            });
        }

        match schema.position(union.selector) {
            Some(position) if position < index => {
                let selector_ty = schema.fields.get(position).map(|f| f.ty);
                if selector_ty != Some(FieldType::Text(4)) {
                    return Err(invalid(format!(
                        "selector '{}' must be a 4-byte text field",
                        union.selector
                    )));
                }
            }
            _ => {
                return Err(invalid(format!(
                    "selector '{}' must be declared before the union",
                    union.selector
                )));
            }
        }

        for code in union.codes {
            if let Some(variant) = code.variant
                && union.variant(variant).is_none()
            {
                return Err(invalid(format!(
                    "event code {:?} maps to undeclared variant '{variant}'",
                    String::from_utf8_lossy(&code.code)
                )));
            }
        }

        let mut width = 0usize;
        for variant in union.variants {
            width = width.max(self.nested_width(generation, schema, field, variant.schema)?);
        }
        Ok(width)
    }
}
