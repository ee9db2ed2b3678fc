//! Full encode (`pack`) and decode (`unpack`) passes over an instruction list.

use savestate_codec::{FieldType, PlayerLookup, Value, ValueReader, ValueWriter};
use tracing::{debug, warn};

use crate::buffer::PackedBuffer;
use crate::error::{BufferError, Result};
use crate::instruction::{validate_instructions, Instruction};
use crate::layout::Layout;
use crate::source::{SetOutcome, SourceProvider};

/// What an unpack pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackReport {
    /// Values written to their source.
    pub applied: usize,
    /// Values whose source ignored the write.
    pub ignored: usize,
    /// Fields skipped because their type is unsupported.
    pub dropped: usize,
    /// Bytes consumed from the buffer.
    pub consumed: usize,
    /// Offset just past each field, in instruction order.
    pub field_ends: Vec<usize>,
}

/// Encode every instruction's current value into a fresh buffer.
///
/// Absent values are replaced by the type default. Fails before reading any
/// source if an instruction lacks a source or variable name.
pub fn pack<P>(instructions: &[Instruction], provider: &P) -> Result<PackedBuffer>
where
    P: SourceProvider + ?Sized,
{
    validate_instructions(instructions)?;

    let capacity = Layout::plan(instructions).fixed_bits().div_ceil(8) as usize;
    let mut writer = ValueWriter::with_capacity(capacity);
    let mut field_ends = Vec::with_capacity(instructions.len());

    for (index, ins) in instructions.iter().enumerate() {
        let source = ins.validate(index)?;
        let value = match &ins.field {
            FieldType::Supported(tag) => provider
                .get(source, &ins.variable)
                .unwrap_or_else(|| Value::default_for(*tag)),
            // Never read: the codec drops the field.
            FieldType::Unsupported(_) => Value::Bool(false),
        };
        let end = writer
            .write_field(&value, &ins.field)
            .map_err(|source| BufferError::Field {
                index,
                variable: ins.variable.clone(),
                source,
            })?;
        field_ends.push(end);
    }

    let bytes = writer.freeze();
    debug!(
        fields = instructions.len(),
        bytes = bytes.len(),
        "packed buffer"
    );
    Ok(PackedBuffer::with_field_ends(bytes, field_ends))
}

/// Decode `buffer` in instruction order and write each value to its source.
///
/// All fields are decoded before any source is touched, so a malformed list
/// or a truncated buffer leaves every source unchanged. Bytes past the last
/// field (slot padding) are ignored.
pub fn unpack<P>(
    buffer: &[u8],
    instructions: &[Instruction],
    provider: &mut P,
    players: &dyn PlayerLookup,
) -> Result<UnpackReport>
where
    P: SourceProvider + ?Sized,
{
    validate_instructions(instructions)?;

    let mut reader = ValueReader::new(buffer);
    let mut decoded = Vec::with_capacity(instructions.len());
    let mut report = UnpackReport::default();

    for (index, ins) in instructions.iter().enumerate() {
        let value = reader
            .read_field(&ins.field, players)
            .map_err(|source| BufferError::Field {
                index,
                variable: ins.variable.clone(),
                source,
            })?;
        report.field_ends.push(reader.offset());
        decoded.push(value);
    }
    report.consumed = reader.offset();

    for (index, (ins, value)) in instructions.iter().zip(decoded).enumerate() {
        let source = ins.validate(index)?;
        let Some(value) = value else {
            report.dropped += 1;
            continue;
        };
        match provider.set(source, &ins.variable, value) {
            SetOutcome::Applied => report.applied += 1,
            SetOutcome::Ignored => {
                warn!(source = %source, variable = %ins.variable, "source ignored restored value");
                report.ignored += 1;
            }
        }
    }

    debug!(
        applied = report.applied,
        ignored = report.ignored,
        dropped = report.dropped,
        consumed = report.consumed,
        "unpacked buffer"
    );
    Ok(report)
}
