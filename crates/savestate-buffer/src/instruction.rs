use std::fmt;

use savestate_codec::{FieldType, TypeTag};
use serde::{Deserialize, Serialize};

use crate::error::{BufferError, Result};

/// Opaque handle naming an object that owns variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One field of the flat buffer: where the value lives and how it is encoded.
///
/// Instruction order defines byte offsets, so the same list must be used to
/// pack and unpack one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub source: Option<SourceId>,
    pub variable: String,
    pub field: FieldType,
}

impl Instruction {
    pub fn new(source: impl Into<SourceId>, variable: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            source: Some(source.into()),
            variable: variable.into(),
            field: FieldType::Supported(tag),
        }
    }

    /// Check that the instruction names a source and a variable.
    pub fn validate(&self, index: usize) -> Result<&SourceId> {
        let source = self
            .source
            .as_ref()
            .ok_or(BufferError::MissingSource { index })?;
        if self.variable.is_empty() {
            return Err(BufferError::EmptyVariable { index });
        }
        Ok(source)
    }
}

/// Validate every instruction up front, so a pass never starts on a bad list.
pub fn validate_instructions(instructions: &[Instruction]) -> Result<()> {
    for (index, instruction) in instructions.iter().enumerate() {
        instruction.validate(index)?;
    }
    Ok(())
}
