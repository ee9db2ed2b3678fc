//! Slot transport abstraction.
//!
//! A transport moves 256-bit chunks in and out of numbered storage slots.
//! Switching slots is asynchronous: the caller activates a slot, then polls
//! [`SlotTransport::is_slot_ready`] once per tick until the switch lands.
//!
//! Writing sets single parameter bits on the active slot. Reading samples 16
//! float parameters, each carrying one 16-bit word (see [`sampling`]).
//!
//! [`SimulatedTransport`] keeps slots in memory and is what the sequencer
//! tests and the diagnostics CLI run against.

pub mod sampling;
pub mod simulated;
pub mod traits;

pub use sampling::{
    bit_position, bytes_from_words, sample_to_word, word_to_sample, words_from_bytes,
    PARAMETER_BITS, PARAMETER_BYTES, SAMPLED_PARAMETERS,
};
pub use simulated::{SimulatedTransport, SimulatedTransportConfig};
pub use traits::{read_slot, SlotTarget, SlotTransport};
