//! Little-endian byte streams.

use netweave_ir::Primitive;

use super::{Value, VmError};

/// Growable output buffer.
#[derive(Clone, Debug, Default)]
pub struct NetworkWriter {
    bytes: Vec<u8>,
}

impl NetworkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// `i32` count prefix.
    pub fn write_count(&mut self, count: usize) -> Result<(), VmError> {
        let count = i32::try_from(count).map_err(|_| VmError::TooLong(count))?;
        self.write_i32(count);
        Ok(())
    }

    /// Encode `value` as `primitive`; the value variant must match exactly.
    pub fn write_primitive(&mut self, primitive: Primitive, value: &Value) -> Result<(), VmError> {
        match (primitive, value) {
            (Primitive::Bool, Value::Bool(v)) => self.write_u8(u8::from(*v)),
            (Primitive::U8, Value::U8(v)) => self.write_u8(*v),
            (Primitive::I8, Value::I8(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::I16, Value::I16(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::U16, Value::U16(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::I32, Value::I32(v)) => self.write_i32(*v),
            (Primitive::U32, Value::U32(v)) => self.write_u32(*v),
            (Primitive::I64, Value::I64(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::U64, Value::U64(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::F32, Value::F32(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::F64, Value::F64(v)) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            (Primitive::String, Value::Null) => self.write_i32(-1),
            (Primitive::String, Value::Str(text)) => {
                self.write_count(text.len())?;
                self.bytes.extend_from_slice(text.as_bytes());
            }
            (primitive, other) => {
                return Err(VmError::TypeMismatch {
                    expected: primitive.core_name(),
                    found: other.kind_name(),
                })
            }
        }
        Ok(())
    }
}

/// Cursor over encoded bytes.
#[derive(Clone, Debug)]
pub struct NetworkReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> NetworkReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        NetworkReader { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], VmError> {
        if count > self.remaining() {
            return Err(VmError::UnexpectedEof {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.bytes[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], VmError> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, VmError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32, VmError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, VmError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// `i32` count prefix: `None` for the null marker `-1`.
    pub fn read_count(&mut self) -> Result<Option<usize>, VmError> {
        match self.read_i32()? {
            -1 => Ok(None),
            count => usize::try_from(count)
                .map(Some)
                .map_err(|_| VmError::InvalidLength(count)),
        }
    }

    pub fn read_primitive(&mut self, primitive: Primitive) -> Result<Value, VmError> {
        Ok(match primitive {
            Primitive::Bool => Value::Bool(self.read_u8()? != 0),
            Primitive::U8 => Value::U8(self.read_u8()?),
            Primitive::I8 => Value::I8(i8::from_le_bytes(self.take_array()?)),
            Primitive::I16 => Value::I16(i16::from_le_bytes(self.take_array()?)),
            Primitive::U16 => Value::U16(u16::from_le_bytes(self.take_array()?)),
            Primitive::I32 => Value::I32(self.read_i32()?),
            Primitive::U32 => Value::U32(self.read_u32()?),
            Primitive::I64 => Value::I64(i64::from_le_bytes(self.take_array()?)),
            Primitive::U64 => Value::U64(u64::from_le_bytes(self.take_array()?)),
            Primitive::F32 => Value::F32(f32::from_le_bytes(self.take_array()?)),
            Primitive::F64 => Value::F64(f64::from_le_bytes(self.take_array()?)),
            Primitive::String => match self.read_count()? {
                None => Value::Null,
                Some(len) => {
                    let bytes = self.take(len)?;
                    let text = std::str::from_utf8(bytes).map_err(|_| VmError::InvalidUtf8)?;
                    Value::Str(text.to_string())
                }
            },
        })
    }
}
