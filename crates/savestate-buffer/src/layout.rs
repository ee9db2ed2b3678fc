//! Static layout of an instruction list: offsets, widths and slot usage.

use savestate_codec::FieldType;

use crate::buffer::{SLOT_BITS, SLOT_BYTES};
use crate::error::{BufferError, Result};
use crate::instruction::Instruction;

/// Placement of one field in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub index: usize,
    pub variable: String,
    pub field: FieldType,
    /// Byte offset, unknown once a variable-width field precedes this one.
    pub offset: Option<usize>,
    /// Encoded width in bits, `None` for variable-width fields.
    pub bits: Option<u32>,
}

/// Layout of a whole instruction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub fields: Vec<FieldLayout>,
    fixed_bits: u64,
}

impl Layout {
    pub fn plan(instructions: &[Instruction]) -> Self {
        let mut fields = Vec::with_capacity(instructions.len());
        let mut fixed_bits = 0u64;
        let mut offset = Some(0usize);

        for (index, ins) in instructions.iter().enumerate() {
            let bits = ins.field.fixed_bits();
            fields.push(FieldLayout {
                index,
                variable: ins.variable.clone(),
                field: ins.field.clone(),
                offset,
                bits,
            });
            match bits {
                Some(bits) => {
                    fixed_bits += u64::from(bits);
                    offset = offset.map(|o| o + bits as usize / 8);
                }
                None => offset = None,
            }
        }

        Self { fields, fixed_bits }
    }

    /// Sum of all fixed-width fields.
    pub fn fixed_bits(&self) -> u64 {
        self.fixed_bits
    }

    /// Index of the first variable-width field, if any.
    pub fn first_variable_field(&self) -> Option<usize> {
        self.fields.iter().find(|f| f.bits.is_none()).map(|f| f.index)
    }

    pub fn is_fixed(&self) -> bool {
        self.first_variable_field().is_none()
    }

    /// Total bits, known only when every field is fixed width.
    pub fn total_bits(&self) -> Option<u64> {
        self.is_fixed().then_some(self.fixed_bits)
    }

    /// `ceil(total_bits / 8)`.
    pub fn byte_count(&self) -> Option<usize> {
        self.total_bits().map(|bits| bits.div_ceil(8) as usize)
    }

    /// `ceil(total_bits / 256)`.
    pub fn slot_count(&self) -> Option<usize> {
        self.total_bits()
            .map(|bits| bits.div_ceil(SLOT_BITS as u64) as usize)
    }

    /// Bytes a transfer reserves: `explicit` when given, else the derived
    /// count. An explicit count may not undercut the fixed fields.
    pub fn resolve_byte_count(&self, explicit: Option<usize>) -> Result<usize> {
        let fixed = self.fixed_bits.div_ceil(8) as usize;
        match (explicit, self.byte_count()) {
            (Some(explicit), _) if explicit < fixed => Err(BufferError::CapacityExceeded {
                size: fixed,
                capacity: explicit,
            }),
            (Some(explicit), _) => Ok(explicit),
            (None, Some(derived)) => Ok(derived),
            (None, None) => Err(BufferError::VariableWidth {
                index: self.first_variable_field().unwrap_or_default(),
            }),
        }
    }
}

/// Number of slots needed to carry `bytes`.
pub fn slots_for(bytes: usize) -> usize {
    bytes.div_ceil(SLOT_BYTES)
}
