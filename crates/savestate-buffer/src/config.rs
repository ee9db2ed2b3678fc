use savestate_codec::FieldType;
use serde::{Deserialize, Serialize};

use crate::error::{BufferError, Result};
use crate::instruction::{Instruction, SourceId};
use crate::layout::Layout;

/// The persisted shape of an instruction list: parallel arrays plus the
/// total byte count the transfer reserves.
///
/// Type names may be canonical (`int32`) or host names (`System.Int32`).
/// Unknown names load as unsupported fields rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionTable {
    pub sources: Vec<Option<String>>,
    pub variables: Vec<Option<String>>,
    pub types: Vec<String>,
    /// Bytes reserved for the transfer. Derived from the layout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_count: Option<usize>,
}

impl InstructionTable {
    /// Build a table from an instruction list.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let mut table = Self::default();
        for ins in instructions {
            table
                .sources
                .push(ins.source.as_ref().map(|s| s.as_str().to_string()));
            table.variables.push(Some(ins.variable.clone()));
            table.types.push(match &ins.field {
                FieldType::Supported(tag) => tag.name().to_string(),
                FieldType::Unsupported(name) => name.clone(),
            });
        }
        table
    }

    /// Zip the arrays into instructions.
    ///
    /// Null variable names become empty strings, which pack and unpack reject.
    pub fn instructions(&self) -> Result<Vec<Instruction>> {
        if self.sources.len() != self.variables.len() || self.sources.len() != self.types.len() {
            return Err(BufferError::LengthMismatch {
                sources: self.sources.len(),
                variables: self.variables.len(),
                types: self.types.len(),
            });
        }

        Ok(self
            .sources
            .iter()
            .zip(&self.variables)
            .zip(&self.types)
            .map(|((source, variable), ty)| Instruction {
                source: source.as_deref().map(SourceId::new),
                variable: variable.clone().unwrap_or_default(),
                field: FieldType::parse(ty),
            })
            .collect())
    }

    /// The byte count a transfer of this table moves.
    ///
    /// Uses the explicit `byte_count` when set; otherwise derives it from the
    /// layout, which requires every field to be fixed width.
    pub fn resolved_byte_count(&self) -> Result<usize> {
        Layout::plan(&self.instructions()?).resolve_byte_count(self.byte_count)
    }
}
