use bytes::Buf;

use crate::codec::{decode_field, decode_value};
use crate::error::{CodecError, Result};
use crate::type_tag::{FieldType, TypeTag};
use crate::value::{PlayerLookup, Value};

/// Read cursor for one decode pass.
///
/// Every read is bounds-checked; a short buffer yields
/// [`CodecError::UnexpectedEof`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ValueReader<'a> {
    src: &'a [u8],
    offset: usize,
}

impl<'a> ValueReader<'a> {
    /// Start reading `src` at offset 0.
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Decode a value of type `tag`.
    pub fn read(&mut self, tag: TypeTag, players: &dyn PlayerLookup) -> Result<Value> {
        decode_value(tag, self, players)
    }

    /// Decode a declared field. Unsupported fields read nothing and yield `None`.
    pub fn read_field(
        &mut self,
        field: &FieldType,
        players: &dyn PlayerLookup,
    ) -> Result<Option<Value>> {
        decode_field(field, self, players)
    }

    /// Check that `needed` bytes are available.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if self.src.len() < needed {
            return Err(CodecError::UnexpectedEof {
                needed,
                remaining: self.src.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.offset += 1;
        Ok(self.src.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        self.offset += 2;
        Ok(self.src.get_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        self.offset += 4;
        Ok(self.src.get_u32())
    }

    /// Next big-endian `u32`, without advancing.
    pub fn peek_u32(&self) -> Result<u32> {
        self.ensure(4)?;
        let mut head = &self.src[..4];
        Ok(head.get_u32())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        self.offset += 8;
        Ok(self.src.get_u64())
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.src.split_at(len);
        self.src = tail;
        self.offset += len;
        Ok(head)
    }
}
