use bytes::{Bytes, BytesMut};

use crate::error::{BufferError, Result};

/// Bytes carried by one storage slot.
pub const SLOT_BYTES: usize = 32;

/// Bits carried by one storage slot.
pub const SLOT_BITS: usize = SLOT_BYTES * 8;

/// A packed buffer, viewed as a run of 32-byte slots (the last may be short).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBuffer {
    bytes: Bytes,
    field_ends: Vec<usize>,
}

impl PackedBuffer {
    /// Wrap raw bytes, e.g. bytes sampled back from storage.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            field_ends: Vec::new(),
        }
    }

    pub(crate) fn with_field_ends(bytes: Bytes, field_ends: Vec<usize>) -> Self {
        Self { bytes, field_ends }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Offset just past each packed field, in instruction order. Empty for
    /// buffers not produced by a pack.
    pub fn field_ends(&self) -> &[usize] {
        &self.field_ends
    }

    /// `ceil(len / 32)`.
    pub fn slot_count(&self) -> usize {
        self.bytes.len().div_ceil(SLOT_BYTES)
    }

    /// Bytes of slot `index`.
    pub fn slot(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(SLOT_BYTES)?;
        if start >= self.bytes.len() {
            return None;
        }
        let end = (start + SLOT_BYTES).min(self.bytes.len());
        Some(&self.bytes[start..end])
    }

    /// Iterate over slots in order.
    pub fn slots(&self) -> std::slice::Chunks<'_, u8> {
        self.bytes.chunks(SLOT_BYTES)
    }

    /// Zero-extend to `len` bytes.
    pub fn padded_to(&self, len: usize) -> Result<PackedBuffer> {
        if self.bytes.len() > len {
            return Err(BufferError::CapacityExceeded {
                size: self.bytes.len(),
                capacity: len,
            });
        }
        let mut out = BytesMut::with_capacity(len);
        out.extend_from_slice(&self.bytes);
        out.resize(len, 0);
        Ok(Self {
            bytes: out.freeze(),
            field_ends: self.field_ends.clone(),
        })
    }
}
