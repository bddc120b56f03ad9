//! Static record layouts.
//!
//! Schemas are plain `'static` data. Nested records are referenced by name
//! and resolved per generation by the [`SchemaRegistry`](crate::registry::SchemaRegistry),
//! which lets one layout (for example `CarTelemetryData`) be shared by
//! packets of several generations while their headers differ.

use crate::primitive::ScalarKind;

/// Wire width of a split duration: `u16` millis + `u8` minutes.
pub const SPLIT_DURATION_WIDTH: usize = 3;

/// The type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    /// Fixed-length character array.
    Text(usize),
    /// Fixed-length array; the length is never on the wire.
    Array(&'static FieldType, usize),
    /// Nested record, by schema name.
    Record(&'static str),
    /// `u16` ms remainder followed by `u8` minutes.
    SplitDuration,
    /// Union resolved through an earlier 4-byte code field.
    EventUnion(&'static UnionSchema),
}

pub const U8: FieldType = FieldType::Scalar(ScalarKind::U8);
pub const I8: FieldType = FieldType::Scalar(ScalarKind::I8);
pub const U16: FieldType = FieldType::Scalar(ScalarKind::U16);
pub const I16: FieldType = FieldType::Scalar(ScalarKind::I16);
pub const U32: FieldType = FieldType::Scalar(ScalarKind::U32);
pub const I32: FieldType = FieldType::Scalar(ScalarKind::I32);
pub const U64: FieldType = FieldType::Scalar(ScalarKind::U64);
pub const I64: FieldType = FieldType::Scalar(ScalarKind::I64);
pub const F32: FieldType = FieldType::Scalar(ScalarKind::F32);
pub const F64: FieldType = FieldType::Scalar(ScalarKind::F64);
pub const SPLIT: FieldType = FieldType::SplitDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

/// An ordered, packed field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of `name` among the fields.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A union whose active member is chosen by a code stored before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionSchema {
    pub name: &'static str,
    /// Name of the `Text(4)` field in the enclosing schema that selects the variant.
    pub selector: &'static str,
    pub variants: &'static [UnionVariant],
    pub codes: &'static [EventCode],
}

impl UnionSchema {
    pub fn code(&self, code: [u8; 4]) -> Option<&'static EventCode> {
        self.codes.iter().find(|c| c.code == code)
    }

    pub fn variant(&self, name: &str) -> Option<&'static UnionVariant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionVariant {
    pub name: &'static str,
    pub schema: &'static str,
}

/// A known event code. `variant` is `None` for events without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCode {
    pub code: [u8; 4],
    pub variant: Option<&'static str>,
    pub description: &'static str,
}

/// Declare a [`Schema`] with identifier field names.
///
/// ```
/// use openracing_f1_codec::schema;
/// use openracing_f1_codec::schema::{Schema, F32, U8};
///
/// static WHEEL: Schema = schema!("Wheel" {
///     pressure: F32,
///     temperature: U8,
/// });
/// assert_eq!(WHEEL.fields.len(), 2);
/// ```
#[macro_export]
macro_rules! schema {
    ($name:literal { $($field:ident : $ty:expr),* $(,)? }) => {
        $crate::schema::Schema {
            name: $name,
            fields: &[$($crate::schema::Field {
                name: stringify!($field),
                ty: $ty,
            }),*],
        }
    };
}

/// `FieldType::Array` over a promoted element type.
#[macro_export]
macro_rules! array_of {
    ($elem:expr; $len:expr) => {
        $crate::schema::FieldType::Array(&$elem, $len)
    };
}
