//! Buffer assembly for save-state instruction lists.
//!
//! An instruction list names, in order, which variable of which source is
//! stored and under what type. [`pack`] walks the list and encodes every
//! current value into one contiguous [`PackedBuffer`]; [`unpack`] walks the
//! same list over a buffer and writes the decoded values back.
//!
//! The buffer is later split into 32-byte slots ([`SLOT_BYTES`]) for
//! transport. [`Layout`] computes offsets and slot usage statically.

pub mod assembler;
pub mod buffer;
pub mod config;
pub mod error;
pub mod instruction;
pub mod json;
pub mod layout;
pub mod source;

pub use assembler::{pack, unpack, UnpackReport};
pub use buffer::{PackedBuffer, SLOT_BITS, SLOT_BYTES};
pub use config::InstructionTable;
pub use error::{BufferError, Result};
pub use instruction::{validate_instructions, Instruction, SourceId};
pub use json::{value_from_json, value_to_json};
pub use layout::{slots_for, FieldLayout, Layout};
pub use source::{MemorySource, SetOutcome, SourceProvider};
