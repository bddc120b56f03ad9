//! Decoded value tree.
//!
//! A [`Record`] is the decoded form of one schema: an ordered list of
//! `(field name, Value)` pairs. Values keep enough of the wire
//! representation (raw text bytes, split-duration parts, the raw union
//! region) that the encoder can reproduce the original buffer exactly.

use std::borrow::Cow;

/// Milliseconds per minute for split durations.
pub const MILLIS_PER_MINUTE: u32 = 60_000;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(FixedText),
    Duration(SplitDuration),
    Array(Vec<Value>),
    Record(Record),
    Union(UnionValue),
}

impl Value {
    /// Short type tag, used in error messages and by the CLI.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::I8(_) => "i8",
            Value::U16(_) => "u16",
            Value::I16(_) => "i16",
            Value::U32(_) => "u32",
            Value::I32(_) => "i32",
            Value::U64(_) => "u64",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Text(_) => "text",
            Value::Duration(_) => "split_duration",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Union(_) => "union",
        }
    }

    /// Any unsigned integer (or split duration, in milliseconds) widened to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U8(v) => Some(u64::from(v)),
            Value::U16(v) => Some(u64::from(v)),
            Value::U32(v) => Some(u64::from(v)),
            Value::U64(v) => Some(v),
            Value::Duration(d) => Some(u64::from(d.millis())),
            _ => None,
        }
    }

    /// Any integer widened to `i64`. `u64` values above `i64::MAX` yield `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(i64::from(v)),
            Value::I16(v) => Some(i64::from(v)),
            Value::I32(v) => Some(i64::from(v)),
            Value::I64(v) => Some(v),
            Value::U64(v) => i64::try_from(v).ok(),
            _ => self.as_u64().and_then(|v| i64::try_from(v).ok()),
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            Value::U8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Floats as `f64`; integers are not converted.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(f64::from(v)),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&FixedText> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<SplitDuration> {
        match *self {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionValue> {
        match self {
            Value::Union(u) => Some(u),
            _ => None,
        }
    }
}

/// A fixed-length character array.
///
/// The wire bytes are kept verbatim, including everything after the first
/// NUL, so that re-encoding is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedText {
    bytes: Box<[u8]>,
}

impl FixedText {
    pub fn from_wire(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Build a `len`-byte field from `text`, NUL-padded and truncated if needed.
    pub fn padded(text: &str, len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        for (dst, src) in bytes.iter_mut().zip(text.bytes()) {
            *dst = src;
        }
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Text up to the first NUL, with invalid UTF-8 replaced.
    pub fn as_str(&self) -> Cow<'_, str> {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        String::from_utf8_lossy(self.bytes.get(..end).unwrap_or_default())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Wire width of the field.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A duration sent as a `u16` millisecond remainder plus a `u8` minute count.
///
/// Only the combined value is meaningful to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitDuration {
    ms_part: u16,
    minutes_part: u8,
}

impl SplitDuration {
    pub(crate) const fn from_parts(ms_part: u16, minutes_part: u8) -> Self {
        Self {
            ms_part,
            minutes_part,
        }
    }

    /// Split a millisecond value; `None` if the minute count exceeds `u8`.
    pub fn from_millis(millis: u32) -> Option<Self> {
        let minutes = u8::try_from(millis.checked_div(MILLIS_PER_MINUTE)?).ok()?;
        let ms = u16::try_from(millis.checked_rem(MILLIS_PER_MINUTE)?).ok()?;
        Some(Self::from_parts(ms, minutes))
    }

    /// `minutes * 60000 + ms`.
    pub fn millis(self) -> u32 {
        u32::from(self.minutes_part)
            .saturating_mul(MILLIS_PER_MINUTE)
            .saturating_add(u32::from(self.ms_part))
    }

    pub(crate) const fn parts(self) -> (u16, u8) {
        (self.ms_part, self.minutes_part)
    }
}

/// The decoded state of an event union.
///
/// Only the variant selected by the event code is decoded. Payload-less
/// codes (session start, chequered flag, ...) have no variant.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    code: [u8; 4],
    variant: Option<(&'static str, Box<Value>)>,
    raw: Box<[u8]>,
}

impl UnionValue {
    pub(crate) fn new(code: [u8; 4], variant: Option<(&'static str, Record)>, raw: &[u8]) -> Self {
        Self {
            code,
            variant: variant.map(|(name, record)| (name, Box::new(Value::Record(record)))),
            raw: raw.into(),
        }
    }

    /// The selecting event code.
    pub fn code(&self) -> [u8; 4] {
        self.code
    }

    pub fn variant_name(&self) -> Option<&'static str> {
        self.variant.as_ref().map(|(name, _)| *name)
    }

    pub fn payload(&self) -> Option<&Record> {
        self.variant.as_ref().and_then(|(_, payload)| payload.as_record())
    }

    pub(crate) fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// A decoded record: ordered `(field name, Value)` pairs of one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new(schema: &'static str) -> Self {
        Self {
            schema,
            fields: Vec::new(),
        }
    }

    pub fn with_capacity(schema: &'static str, capacity: usize) -> Self {
        Self {
            schema,
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Name of the schema this record was decoded with.
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub(crate) fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Dotted lookup through nested records, arrays and unions.
    ///
    /// Array elements are addressed by index (`car_telemetry_data.0.speed`);
    /// a union is addressed by its active variant name
    /// (`event_details.fastest_lap.lap_time`).
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Record(record) => record.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                Value::Union(union) => match &union.variant {
                    Some((name, payload)) if *name == segment => payload,
                    _ => return None,
                },
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn u8(&self, name: &str) -> Option<u8> {
        self.get(name).and_then(Value::as_u8)
    }

    pub fn f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(Value::as_f32)
    }

    pub fn unsigned(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    pub fn text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(Value::as_text).map(FixedText::as_str)
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(Value::as_record)
    }

    pub fn array(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_array)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_duration_combines_minutes_and_millis() {
        assert_eq!(SplitDuration::from_parts(59_999, 2).millis(), 179_999);
        assert_eq!(SplitDuration::from_parts(1_234, 0).millis(), 1_234);
        assert_eq!(SplitDuration::from_parts(u16::MAX, u8::MAX).millis(), 15_365_535);
    }

    #[test]
    fn split_duration_from_millis() {
        let d = SplitDuration::from_millis(83_456);
        assert_eq!(d.map(SplitDuration::parts), Some((23_456, 1)));
        assert_eq!(SplitDuration::from_millis(256 * MILLIS_PER_MINUTE), None);
    }

    #[test]
    fn fixed_text_trims_at_first_nul_but_keeps_bytes() {
        let text = FixedText::from_wire(b"VER\0junk\0");
        assert_eq!(text.as_str(), "VER");
        assert_eq!(text.len(), 9);
        assert_eq!(text.as_bytes(), b"VER\0junk\0");
    }

    #[test]
    fn fixed_text_without_nul_uses_whole_field() {
        assert_eq!(FixedText::from_wire(b"FTLP").as_str(), "FTLP");
        assert_eq!(FixedText::padded("HAMILTON", 4).as_str(), "HAMI");
        assert_eq!(FixedText::padded("NOR", 6).as_bytes(), b"NOR\0\0\0");
    }

    #[test]
    fn path_walks_records_arrays_and_unions() {
        let mut lap = Record::new("FastestLap");
        lap.push("vehicle_idx", Value::U8(4));
        let union = UnionValue::new(*b"FTLP", Some(("fastest_lap", lap)), &[4, 0, 0, 0, 0]);

        let mut car = Record::new("CarTelemetryData");
        car.push("speed", Value::U16(301));

        let mut packet = Record::new("Packet");
        packet.push("cars", Value::Array(vec![Value::Record(car)]));
        packet.push("event_details", Value::Union(union));

        assert_eq!(packet.path("cars.0.speed"), Some(&Value::U16(301)));
        assert_eq!(packet.path("cars.1.speed"), None);
        assert_eq!(
            packet.path("event_details.fastest_lap.vehicle_idx"),
            Some(&Value::U8(4))
        );
        assert_eq!(packet.path("event_details.retirement.vehicle_idx"), None);
    }

    #[test]
    fn typed_accessors_widen() {
        assert_eq!(Value::U16(7).as_u64(), Some(7));
        assert_eq!(Value::I8(-3).as_i64(), Some(-3));
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Duration(SplitDuration::from_parts(5, 1)).as_u64(), Some(60_005));
        assert_eq!(Value::F32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::U8(1).as_f64(), None);
    }
}
