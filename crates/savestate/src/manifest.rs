//! Manifest and value documents read by the CLI.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use savestate_buffer::{
    value_from_json, value_to_json, Instruction, InstructionTable, MemorySource, SourceProvider,
};
use savestate_codec::FieldType;
use savestate_sequencer::SequencerConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::exit::{buffer_error, io_error, json_error, CliError, CliResult, USAGE};

/// An instruction table plus transfer settings.
///
/// ```json
/// {
///   "sources": ["player", "player"],
///   "variables": ["health", "pos"],
///   "types": ["int32", "vector3"],
///   "slots": 4,
///   "timing": { "slot_timeout_ms": 30000 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub table: InstructionTable,
    /// Data slots configured for the transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<usize>,
    #[serde(default)]
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub slot_timeout_ms: u64,
    pub grace_timeout_ms: u64,
    pub clear_settle_ticks: u32,
}

impl Default for Timing {
    fn default() -> Self {
        let config = SequencerConfig::default();
        Self {
            slot_timeout_ms: config.slot_timeout.as_millis() as u64,
            grace_timeout_ms: config.grace_timeout.as_millis() as u64,
            clear_settle_ticks: config.clear_settle_ticks,
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        serde_json::from_str(&text).map_err(|e| json_error(&path.display().to_string(), e))
    }

    pub fn instructions(&self) -> CliResult<Vec<Instruction>> {
        self.table
            .instructions()
            .map_err(|e| buffer_error("manifest", e))
    }

    pub fn slot_count(&self) -> usize {
        self.slots
            .unwrap_or_else(|| SequencerConfig::default().slot_count)
    }

    pub fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            slot_timeout: Duration::from_millis(self.timing.slot_timeout_ms),
            grace_timeout: Duration::from_millis(self.timing.grace_timeout_ms),
            clear_settle_ticks: self.timing.clear_settle_ticks,
            slot_count: self.slot_count(),
            byte_count: self.table.byte_count,
        }
    }
}

/// Values keyed by source, then variable.
pub type ValueDoc = BTreeMap<String, BTreeMap<String, Json>>;

/// Read a value document from inline JSON or a file.
pub fn read_values(inline: Option<&str>, file: Option<&Path>) -> CliResult<ValueDoc> {
    match (inline, file) {
        (Some(text), _) => serde_json::from_str(text).map_err(|e| json_error("--values", e)),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
            serde_json::from_str(&text).map_err(|e| json_error(&path.display().to_string(), e))
        }
        (None, None) => Err(CliError::new(
            USAGE,
            "one of --values or --values-file is required",
        )),
    }
}

/// Build a source holding every value the document gives for the list.
///
/// Each instruction's source is registered even without values, so unpacking
/// into the result applies every field.
pub fn source_from_values(instructions: &[Instruction], doc: &ValueDoc) -> CliResult<MemorySource> {
    let mut mem = MemorySource::new();
    for ins in instructions {
        let Some(source) = &ins.source else {
            continue;
        };
        mem.add_source(source.clone());

        let FieldType::Supported(tag) = &ins.field else {
            continue;
        };
        let Some(json) = doc
            .get(source.as_str())
            .and_then(|vars| vars.get(&ins.variable))
        else {
            continue;
        };
        let value = value_from_json(*tag, json)
            .map_err(|e| buffer_error(&format!("{source}.{}", ins.variable), e))?;
        mem.insert(source.clone(), ins.variable.clone(), value);
    }
    Ok(mem)
}

/// Render the values the list covers as a document.
pub fn values_to_doc<P: SourceProvider + ?Sized>(instructions: &[Instruction], provider: &P) -> ValueDoc {
    let mut doc = ValueDoc::new();
    for ins in instructions {
        let Some(source) = &ins.source else {
            continue;
        };
        if let Some(value) = provider.get(source, &ins.variable) {
            doc.entry(source.to_string())
                .or_default()
                .insert(ins.variable.clone(), value_to_json(&value));
        }
    }
    doc
}
