//! Little-endian scalar layouts and the byte cursors built on them.
//!
//! Every record on the wire is packed: fields follow each other with no
//! padding, so a field's offset is the sum of the widths before it.
//! Besides the scalars, the only primitive is fixed-length text: a
//! NUL-padded character array whose width comes from the schema.

use crate::error::{CodecError, CodecResult};
use crate::value::{FixedText, Value};

/// Fixed-width scalar encodings used by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl ScalarKind {
    /// Wire width in bytes.
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::U8 | ScalarKind::I8 => 1,
            ScalarKind::U16 | ScalarKind::I16 => 2,
            ScalarKind::U32 | ScalarKind::I32 | ScalarKind::F32 => 4,
            ScalarKind::U64 | ScalarKind::I64 | ScalarKind::F64 => 8,
        }
    }

    /// The kind of a scalar value, `None` for composite values.
    pub fn of(value: &Value) -> Option<Self> {
        scalar_le_bytes(value).map(|(kind, _)| kind)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::U8 => "u8",
            ScalarKind::I8 => "i8",
            ScalarKind::U16 => "u16",
            ScalarKind::I16 => "i16",
            ScalarKind::U32 => "u32",
            ScalarKind::I32 => "i32",
            ScalarKind::U64 => "u64",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

/// Decode one scalar at `offset`.
///
/// # Errors
///
/// Returns [`CodecError::OutOfBounds`] if `offset + kind.width()` exceeds
/// the buffer.
pub fn decode_scalar(buf: &[u8], offset: usize, kind: ScalarKind) -> CodecResult<Value> {
    ByteReader::at(buf, offset).scalar(kind)
}

/// Decode a `len`-byte text field at `offset`.
///
/// # Errors
///
/// Returns [`CodecError::OutOfBounds`] if `offset + len` exceeds the buffer.
pub fn decode_text(buf: &[u8], offset: usize, len: usize) -> CodecResult<FixedText> {
    ByteReader::at(buf, offset).text(len)
}

/// Encode one scalar at `offset`, overwriting the bytes already there.
///
/// # Errors
///
/// Returns [`CodecError::OutOfBounds`] if the value does not fit, or
/// [`CodecError::ValueMismatch`] if `value` is not a scalar.
pub fn encode_scalar(buf: &mut [u8], offset: usize, value: &Value) -> CodecResult<()> {
    let (kind, raw) = scalar_le_bytes(value).ok_or(CodecError::ValueMismatch {
        schema: "scalar",
        field: "value",
        expected: "a scalar value",
    })?;
    let width = kind.width();
    let len = buf.len();
    let out_of_bounds = CodecError::OutOfBounds {
        offset,
        width,
        len,
    };
    let end = offset.checked_add(width).ok_or(out_of_bounds.clone())?;
    let dst = buf.get_mut(offset..end).ok_or(out_of_bounds)?;
    let src = raw.get(..width).ok_or(CodecError::ValueMismatch {
        schema: "scalar",
        field: "value",
        expected: "a scalar value",
    })?;
    dst.copy_from_slice(src);
    Ok(())
}

/// Little-endian bytes of a scalar value, zero-padded to eight bytes.
fn scalar_le_bytes(value: &Value) -> Option<(ScalarKind, [u8; 8])> {
    fn pad<const N: usize>(bytes: [u8; N]) -> [u8; 8] {
        let mut out = [0u8; 8];
        for (dst, src) in out.iter_mut().zip(bytes) {
            *dst = src;
        }
        out
    }

    Some(match value {
        Value::U8(v) => (ScalarKind::U8, pad(v.to_le_bytes())),
        Value::I8(v) => (ScalarKind::I8, pad(v.to_le_bytes())),
        Value::U16(v) => (ScalarKind::U16, pad(v.to_le_bytes())),
        Value::I16(v) => (ScalarKind::I16, pad(v.to_le_bytes())),
        Value::U32(v) => (ScalarKind::U32, pad(v.to_le_bytes())),
        Value::I32(v) => (ScalarKind::I32, pad(v.to_le_bytes())),
        Value::U64(v) => (ScalarKind::U64, pad(v.to_le_bytes())),
        Value::I64(v) => (ScalarKind::I64, pad(v.to_le_bytes())),
        Value::F32(v) => (ScalarKind::F32, pad(v.to_le_bytes())),
        Value::F64(v) => (ScalarKind::F64, pad(v.to_le_bytes())),
        _ => return None,
    })
}

/// Bounds-checked little-endian cursor over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Take the next `n` bytes and advance past them.
    pub fn bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or_else(|| self.out_of_bounds(n))?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| self.out_of_bounds(n))?;
        self.pos = end;
        Ok(slice)
    }

    /// Take the next `len` bytes as fixed-length text.
    pub fn text(&mut self, len: usize) -> CodecResult<FixedText> {
        self.bytes(len).map(FixedText::from_wire)
    }

    pub fn skip(&mut self, n: usize) -> CodecResult<()> {
        self.bytes(n).map(|_| ())
    }

    pub fn array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let slice = self.bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> CodecResult<u8> {
        self.array::<1>().map(u8::from_le_bytes)
    }

    #[inline]
    pub fn i8(&mut self) -> CodecResult<i8> {
        self.array::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16_le(&mut self) -> CodecResult<u16> {
        self.array::<2>().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16_le(&mut self) -> CodecResult<i16> {
        self.array::<2>().map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> CodecResult<u32> {
        self.array::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn i32_le(&mut self) -> CodecResult<i32> {
        self.array::<4>().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> CodecResult<u64> {
        self.array::<8>().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn i64_le(&mut self) -> CodecResult<i64> {
        self.array::<8>().map(i64::from_le_bytes)
    }

    /// Non-finite values are returned as-is so that re-encoding is exact.
    #[inline]
    pub fn f32_le(&mut self) -> CodecResult<f32> {
        self.array::<4>().map(f32::from_le_bytes)
    }

    #[inline]
    pub fn f64_le(&mut self) -> CodecResult<f64> {
        self.array::<8>().map(f64::from_le_bytes)
    }

    pub fn scalar(&mut self, kind: ScalarKind) -> CodecResult<Value> {
        Ok(match kind {
            ScalarKind::U8 => Value::U8(self.u8()?),
            ScalarKind::I8 => Value::I8(self.i8()?),
            ScalarKind::U16 => Value::U16(self.u16_le()?),
            ScalarKind::I16 => Value::I16(self.i16_le()?),
            ScalarKind::U32 => Value::U32(self.u32_le()?),
            ScalarKind::I32 => Value::I32(self.i32_le()?),
            ScalarKind::U64 => Value::U64(self.u64_le()?),
            ScalarKind::I64 => Value::I64(self.i64_le()?),
            ScalarKind::F32 => Value::F32(self.f32_le()?),
            ScalarKind::F64 => Value::F64(self.f64_le()?),
        })
    }

    fn out_of_bounds(&self, width: usize) -> CodecError {
        CodecError::OutOfBounds {
            offset: self.pos,
            width,
            len: self.data.len(),
        }
    }
}

/// Append-only little-endian writer used by the encoder and test builders.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16_le(&mut self, value: i16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32_le(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64_le(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32_le(&mut self, value: f32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(data);
        self
    }

    pub fn write_zeros(&mut self, n: usize) -> &mut Self {
        self.buffer.resize(self.buffer.len().saturating_add(n), 0);
        self
    }

    /// Append a scalar value in its own wire width.
    pub fn write_scalar(&mut self, value: &Value) -> CodecResult<&mut Self> {
        let (kind, raw) = scalar_le_bytes(value).ok_or(CodecError::ValueMismatch {
            schema: "scalar",
            field: "value",
            expected: "a scalar value",
        })?;
        if let Some(bytes) = raw.get(..kind.width()) {
            self.buffer.extend_from_slice(bytes);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
