//! Structured (JSON-like) view of decoded records.
//!
//! This view is for display and export only. Floats are rounded and text is
//! trimmed, so it is lossy; use the encoder to get wire bytes back.

use serde_json::{Map, Number, Value as Json};

use crate::value::{Record, Value};

/// Decimal places kept for floats.
pub const FLOAT_DECIMALS: i32 = 3;

/// Convert a record into an ordered JSON object.
pub fn to_structured(record: &Record) -> Json {
    let mut map = Map::with_capacity(record.len());
    for (name, value) in record.fields() {
        map.insert(name.to_owned(), value_to_structured(value));
    }
    Json::Object(map)
}

impl Record {
    pub fn to_structured(&self) -> Json {
        to_structured(self)
    }
}

/// Convert a single value.
///
/// Split durations become their combined millisecond count; a union becomes
/// `{variant: payload}`, or `{}` for a payload-less event.
pub fn value_to_structured(value: &Value) -> Json {
    match value {
        Value::U8(v) => Json::from(*v),
        Value::I8(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::F32(v) => round_float(f64::from(*v)),
        Value::F64(v) => round_float(*v),
        Value::Text(text) => Json::String(text.as_str().into_owned()),
        Value::Duration(duration) => Json::from(duration.millis()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_structured).collect()),
        Value::Record(record) => to_structured(record),
        Value::Union(union) => {
            let mut map = Map::new();
            if let (Some(name), Some(payload)) = (union.variant_name(), union.payload()) {
                map.insert(name.to_owned(), to_structured(payload));
            }
            Json::Object(map)
        }
    }
}

/// Round to [`FLOAT_DECIMALS`]; non-finite values become `null`.
fn round_float(v: f64) -> Json {
    let scale = 10f64.powi(FLOAT_DECIMALS);
    Number::from_f64((v * scale).round() / scale).map_or(Json::Null, Json::Number)
}
