//! Chunk sequencer for slot-based save and load.
//!
//! [`ChunkSequencer`] packs the instruction list into a buffer, splits it
//! into 32-byte chunks and moves each chunk through its storage slot, one
//! step per external [`tick`](ChunkSequencer::tick). A load walks the same
//! slots, samples them back and unpacks the result.
//!
//! Outcomes are reported to an [`EventSink`]; transport timeouts never
//! surface as errors.

pub mod config;
pub mod error;
pub mod event;
pub mod sequencer;
pub mod state;

pub use config::SequencerConfig;
pub use error::{Result, SequencerError};
pub use event::{EventFn, EventSink, Failure, SequencerEvent};
pub use sequencer::{ChunkSequencer, Request};
pub use state::{FinalPhase, Operation, SavePhase, SequencerState, Status};
