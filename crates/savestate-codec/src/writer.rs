use bytes::{Bytes, BytesMut};

use crate::codec::{encode_field, encode_value};
use crate::error::Result;
use crate::type_tag::FieldType;
use crate::value::Value;

/// Write cursor for one encode pass.
///
/// Owns the growing buffer; the write offset is always the buffer length.
#[derive(Debug, Default)]
pub struct ValueWriter {
    buf: BytesMut,
}

impl ValueWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Current write offset.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    /// Encode `value` as `tag`. Returns the new offset.
    pub fn write(&mut self, value: &Value, tag: crate::TypeTag) -> Result<usize> {
        encode_value(value, tag, &mut self.buf)
    }

    /// Encode `value` for a declared field. Unsupported fields write nothing.
    pub fn write_field(&mut self, value: &Value, field: &FieldType) -> Result<usize> {
        encode_field(value, field, &mut self.buf)
    }

    /// Borrow the bytes written so far.
    pub fn get_ref(&self) -> &BytesMut {
        &self.buf
    }

    /// Consume the writer and return the buffer.
    pub fn into_inner(self) -> BytesMut {
        self.buf
    }

    /// Consume the writer and return an immutable buffer.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}
