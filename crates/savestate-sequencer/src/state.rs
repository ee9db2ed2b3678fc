use std::fmt;
use std::time::Duration;

/// Which pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Save,
    Load,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Save => f.write_str("save"),
            Operation::Load => f.write_str("load"),
        }
    }
}

/// Step within a save's current slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    /// Waiting for the data slot to become active.
    Locating,
    /// Parameters cleared; waiting for the clear to settle.
    Clearing,
    /// Setting one 1-bit per tick.
    Writing,
}

/// Step of the return to the fallback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalPhase {
    /// Waiting for the fallback slot to become active.
    Locating,
    /// Fallback active; waiting out re-triggers.
    Grace,
}

/// Top-level sequencer status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Saving(SavePhase),
    /// Waiting for the current data slot; sampled on detection.
    Loading,
    Finalizing(Operation, FinalPhase),
    /// A pass aborted. Cleared to `Idle` on the next tick.
    Failed(Operation),
}

impl Status {
    /// `true` while data slots are being written or read.
    pub fn is_transferring(&self) -> bool {
        matches!(self, Status::Saving(_) | Status::Loading)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Status::Idle)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Saving(SavePhase::Locating) => f.write_str("saving/locating"),
            Status::Saving(SavePhase::Clearing) => f.write_str("saving/clearing"),
            Status::Saving(SavePhase::Writing) => f.write_str("saving/writing"),
            Status::Loading => f.write_str("loading"),
            Status::Finalizing(op, FinalPhase::Locating) => write!(f, "finalizing {op}/locating"),
            Status::Finalizing(op, FinalPhase::Grace) => write!(f, "finalizing {op}/grace"),
            Status::Failed(op) => write!(f, "failed {op}"),
        }
    }
}

/// Status plus the cursors of the pass in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerState {
    pub status: Status,
    pub slot_index: usize,
    pub byte_in_slot: usize,
    pub bit_in_byte: u8,
    /// Countdown for the pending slot switch or grace period.
    pub timeout_remaining: Option<Duration>,
    pub settle_remaining: u32,
}

impl SequencerState {
    pub(crate) fn reset_cursors(&mut self) {
        self.slot_index = 0;
        self.byte_in_slot = 0;
        self.bit_in_byte = 0;
        self.timeout_remaining = None;
        self.settle_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_data_phases_are_transferring() {
        assert!(Status::Saving(SavePhase::Writing).is_transferring());
        assert!(Status::Loading.is_transferring());
        assert!(!Status::Finalizing(Operation::Save, FinalPhase::Grace).is_transferring());
        assert!(!Status::Failed(Operation::Load).is_transferring());
        assert!(Status::default().is_idle());
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Saving(SavePhase::Clearing).to_string(), "saving/clearing");
        assert_eq!(
            Status::Finalizing(Operation::Load, FinalPhase::Grace).to_string(),
            "finalizing load/grace"
        );
    }
}
