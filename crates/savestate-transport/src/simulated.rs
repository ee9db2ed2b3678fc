use tracing::{debug, trace, warn};

use crate::sampling::{
    bit_position, bytes_from_words, word_to_sample, words_from_bytes, PARAMETER_BITS,
    PARAMETER_BYTES, SAMPLED_PARAMETERS,
};
use crate::traits::{SlotTarget, SlotTransport};

/// Behavior of a [`SimulatedTransport`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedTransportConfig {
    /// Polls answered "not ready" after each activation before the switch lands.
    pub ready_delay_polls: u32,
    /// Data slots that never become ready.
    pub stalled_slots: Vec<usize>,
    /// Whether the fallback slot never becomes ready.
    pub stall_fallback: bool,
    /// Extra detections reported on the polls right after the fallback lands.
    pub fallback_retriggers: u32,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    target: SlotTarget,
    delay: u32,
}

/// In-memory transport: every data slot holds 16 words.
///
/// Bit writes and clears apply to the active data slot only; while the
/// fallback slot is active they are dropped, and samples read zero.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    config: SimulatedTransportConfig,
    slots: Vec<[u16; SAMPLED_PARAMETERS]>,
    active: Option<SlotTarget>,
    pending: Option<Pending>,
    retriggers_left: u32,
    activations: Vec<SlotTarget>,
    bit_writes: usize,
    clears: usize,
}

impl SimulatedTransport {
    pub fn new(config: SimulatedTransportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SimulatedTransportConfig {
        &self.config
    }

    /// Slot whose switch has landed, if any.
    pub fn active(&self) -> Option<SlotTarget> {
        self.active
    }

    /// Every activation request, in order.
    pub fn activations(&self) -> &[SlotTarget] {
        &self.activations
    }

    /// Number of data-slot activation requests.
    pub fn data_activations(&self) -> usize {
        self.activations
            .iter()
            .filter(|t| matches!(t, SlotTarget::Data(_)))
            .count()
    }

    /// Bit writes that landed on a data slot.
    pub fn bit_writes(&self) -> usize {
        self.bit_writes
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Stop or resume answering for a data slot.
    pub fn set_stalled(&mut self, index: usize, stalled: bool) {
        self.config.stalled_slots.retain(|s| *s != index);
        if stalled {
            self.config.stalled_slots.push(index);
        }
    }

    pub fn slot_words(&self, index: usize) -> Option<&[u16; SAMPLED_PARAMETERS]> {
        self.slots.get(index)
    }

    pub fn slot_bytes(&self, index: usize) -> Option<[u8; PARAMETER_BYTES]> {
        self.slots.get(index).map(bytes_from_words)
    }

    /// Overwrite a data slot's stored bytes (zero-extended past `bytes`).
    pub fn store_slot(&mut self, index: usize, bytes: &[u8]) {
        *self.slot_mut(index) = words_from_bytes(bytes);
    }

    fn slot_mut(&mut self, index: usize) -> &mut [u16; SAMPLED_PARAMETERS] {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, [0; SAMPLED_PARAMETERS]);
        }
        &mut self.slots[index]
    }

    fn active_data_slot(&self) -> Option<usize> {
        match self.active {
            Some(SlotTarget::Data(index)) => Some(index),
            _ => None,
        }
    }

    fn is_stalled(&self, target: SlotTarget) -> bool {
        match target {
            SlotTarget::Data(index) => self.config.stalled_slots.contains(&index),
            SlotTarget::Fallback => self.config.stall_fallback,
        }
    }
}

impl SlotTransport for SimulatedTransport {
    fn activate_slot(&mut self, target: SlotTarget) {
        debug!(%target, "activating slot");
        self.activations.push(target);
        self.retriggers_left = 0;
        self.pending = Some(Pending {
            target,
            delay: self.config.ready_delay_polls,
        });
    }

    fn is_slot_ready(&mut self) -> bool {
        if let Some(mut pending) = self.pending {
            if self.is_stalled(pending.target) {
                return false;
            }
            if pending.delay > 0 {
                pending.delay -= 1;
                self.pending = Some(pending);
                return false;
            }
            self.pending = None;
            self.active = Some(pending.target);
            if pending.target == SlotTarget::Fallback {
                self.retriggers_left = self.config.fallback_retriggers;
            }
            trace!(target = %pending.target, "slot ready");
            return true;
        }

        if self.retriggers_left > 0 {
            self.retriggers_left -= 1;
            trace!("slot re-triggered");
            return true;
        }
        false
    }

    fn clear_parameters(&mut self) {
        match self.active_data_slot() {
            Some(index) => {
                *self.slot_mut(index) = [0; SAMPLED_PARAMETERS];
                self.clears += 1;
            }
            None => debug!("clear without an active data slot dropped"),
        }
    }

    fn set_parameter_bit(&mut self, index: usize, value: bool) {
        if index >= PARAMETER_BITS {
            warn!(index, "bit parameter out of range");
            return;
        }
        let Some(slot) = self.active_data_slot() else {
            debug!(index, "bit write without an active data slot dropped");
            return;
        };
        let (word, bit) = bit_position(index);
        let words = self.slot_mut(slot);
        if value {
            words[word] |= 1 << bit;
        } else {
            words[word] &= !(1 << bit);
        }
        self.bit_writes += 1;
    }

    fn sample_parameter(&self, index: usize) -> f32 {
        self.active_data_slot()
            .and_then(|slot| self.slots.get(slot))
            .and_then(|words| words.get(index))
            .map_or(0.0, |word| word_to_sample(*word))
    }
}
