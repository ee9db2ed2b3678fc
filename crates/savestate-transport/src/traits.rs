use std::fmt;

use crate::sampling::{bytes_from_words, sample_to_word, PARAMETER_BYTES, SAMPLED_PARAMETERS};

/// Slot to switch the transport to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotTarget {
    /// Data slot by position in the configured slot list.
    Data(usize),
    /// The slot the user returns to once a transfer is done.
    Fallback,
}

impl fmt::Display for SlotTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotTarget::Data(index) => write!(f, "data slot {index}"),
            SlotTarget::Fallback => f.write_str("fallback slot"),
        }
    }
}

/// Moves 256-bit chunks between storage slots.
///
/// Operations never fail; a slot that never comes up is detected by the
/// caller through its own timeout.
pub trait SlotTransport {
    /// Begin switching to `target`.
    fn activate_slot(&mut self, target: SlotTarget);

    /// Poll for a completed switch.
    ///
    /// Returns `true` once per detection. A slot may be detected again after
    /// it is already active (a re-trigger).
    fn is_slot_ready(&mut self) -> bool;

    /// Zero every parameter of the active slot.
    fn clear_parameters(&mut self);

    /// Set bit parameter `index` (0..256) of the active slot.
    fn set_parameter_bit(&mut self, index: usize, value: bool);

    /// Sample float parameter `index` (0..16) of the active slot.
    fn sample_parameter(&self, index: usize) -> f32;
}

impl<T: SlotTransport + ?Sized> SlotTransport for &mut T {
    fn activate_slot(&mut self, target: SlotTarget) {
        (**self).activate_slot(target)
    }

    fn is_slot_ready(&mut self) -> bool {
        (**self).is_slot_ready()
    }

    fn clear_parameters(&mut self) {
        (**self).clear_parameters()
    }

    fn set_parameter_bit(&mut self, index: usize, value: bool) {
        (**self).set_parameter_bit(index, value)
    }

    fn sample_parameter(&self, index: usize) -> f32 {
        (**self).sample_parameter(index)
    }
}

impl<T: SlotTransport + ?Sized> SlotTransport for Box<T> {
    fn activate_slot(&mut self, target: SlotTarget) {
        (**self).activate_slot(target)
    }

    fn is_slot_ready(&mut self) -> bool {
        (**self).is_slot_ready()
    }

    fn clear_parameters(&mut self) {
        (**self).clear_parameters()
    }

    fn set_parameter_bit(&mut self, index: usize, value: bool) {
        (**self).set_parameter_bit(index, value)
    }

    fn sample_parameter(&self, index: usize) -> f32 {
        (**self).sample_parameter(index)
    }
}

/// Sample all 16 parameters of the active slot and return its 32 bytes.
pub fn read_slot<T: SlotTransport + ?Sized>(transport: &T) -> [u8; PARAMETER_BYTES] {
    let mut words = [0u16; SAMPLED_PARAMETERS];
    for (index, word) in words.iter_mut().enumerate() {
        *word = sample_to_word(transport.sample_parameter(index));
    }
    bytes_from_words(&words)
}
