/// Errors raised when configuring or starting a sequencer pass.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// Instruction list or buffer error.
    #[error("buffer error: {0}")]
    Buffer(#[from] savestate_buffer::BufferError),

    /// The buffer needs more slots than are configured.
    #[error("{bytes} bytes need {needed} slots, only {available} configured")]
    SlotCapacity {
        bytes: usize,
        needed: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, SequencerError>;
