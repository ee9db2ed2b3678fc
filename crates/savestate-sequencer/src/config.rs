use std::time::Duration;

/// Configuration for a [`ChunkSequencer`](crate::ChunkSequencer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// How long to wait for a slot switch before the pass fails.
    pub slot_timeout: Duration,
    /// Quiet period after the fallback slot lands. Re-triggers restart it.
    pub grace_timeout: Duration,
    /// Ticks between clearing a slot and its first bit write. `0` writes on
    /// the tick that clears.
    pub clear_settle_ticks: u32,
    /// Number of data slots available.
    pub slot_count: usize,
    /// Bytes reserved for the buffer. Derived from the layout when `None`;
    /// required when the list holds a variable-width field.
    pub byte_count: Option<usize>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            slot_timeout: Duration::from_secs(30),
            grace_timeout: Duration::from_secs(2),
            clear_settle_ticks: 2,
            slot_count: 8,
            byte_count: None,
        }
    }
}
