//! Typed save-state buffers chunked through 256-bit storage slots.
//!
//! # Crate Structure
//!
//! - [`codec`]: bit-exact encoding of typed values
//! - [`buffer`]: instruction lists, sources, pack and unpack
//! - [`transport`]: slot transport abstraction and simulator (behind `sequencer` feature)
//! - [`sequencer`]: tick-driven save/load state machine (behind `sequencer` feature)

/// Re-export codec types.
pub mod codec {
    pub use savestate_codec::*;
}

/// Re-export buffer types.
pub mod buffer {
    pub use savestate_buffer::*;
}

/// Re-export transport types (requires `sequencer` feature).
#[cfg(feature = "sequencer")]
pub mod transport {
    pub use savestate_transport::*;
}

/// Re-export sequencer types (requires `sequencer` feature).
#[cfg(feature = "sequencer")]
pub mod sequencer {
    pub use savestate_sequencer::*;
}
