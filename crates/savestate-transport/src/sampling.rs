//! Mapping between bit parameters, sampled words and slot bytes.
//!
//! A slot holds 256 bit parameters. Reading samples 16 floats in `[0, 1)`;
//! each scales to a 16-bit word whose low byte comes first in the slot.
//! Bit parameter `p` is therefore byte `p / 8`, bit `p % 8` (LSB first),
//! which is bit `p % 16` of word `p / 16`.

/// Bit parameters per slot.
pub const PARAMETER_BITS: usize = 256;

/// Bytes carried by one slot.
pub const PARAMETER_BYTES: usize = PARAMETER_BITS / 8;

/// Float parameters sampled per slot.
pub const SAMPLED_PARAMETERS: usize = 16;

const WORD_SCALE: f64 = 65536.0;

/// `round(sample * 65536) & 0xFFFF`.
pub fn sample_to_word(sample: f32) -> u16 {
    ((f64::from(sample) * WORD_SCALE).round() as i64 & 0xFFFF) as u16
}

/// Inverse of [`sample_to_word`]. Exact: every word is representable.
pub fn word_to_sample(word: u16) -> f32 {
    (f64::from(word) / WORD_SCALE) as f32
}

/// `(word, bit)` location of bit parameter `index`.
pub fn bit_position(index: usize) -> (usize, u32) {
    (index / 16, (index % 16) as u32)
}

/// Lay out sampled words as slot bytes, low byte first.
pub fn bytes_from_words(words: &[u16; SAMPLED_PARAMETERS]) -> [u8; PARAMETER_BYTES] {
    let mut bytes = [0u8; PARAMETER_BYTES];
    for (pair, word) in bytes.chunks_exact_mut(2).zip(words) {
        pair.copy_from_slice(&word.to_le_bytes());
    }
    bytes
}

/// Pack slot bytes (up to 32, zero-extended) into words.
pub fn words_from_bytes(bytes: &[u8]) -> [u16; SAMPLED_PARAMETERS] {
    let mut words = [0u16; SAMPLED_PARAMETERS];
    for (word, pair) in words.iter_mut().zip(bytes.chunks(2)) {
        let lo = pair[0];
        let hi = pair.get(1).copied().unwrap_or(0);
        *word = u16::from_le_bytes([lo, hi]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_survive_sampling() {
        for word in [0u16, 1, 0x00FF, 0x8000, 0xABCD, u16::MAX] {
            assert_eq!(sample_to_word(word_to_sample(word)), word);
        }
    }

    #[test]
    fn sample_rounding_wraps_at_one() {
        assert_eq!(sample_to_word(0.0), 0);
        assert_eq!(sample_to_word(0.5), 0x8000);
        // 1.0 scales to 65536, which masks to zero.
        assert_eq!(sample_to_word(1.0), 0);
        assert_eq!(sample_to_word(1.4 / 65536.0), 1);
    }

    #[test]
    fn bit_parameters_are_lsb_first() {
        assert_eq!(bit_position(0), (0, 0));
        assert_eq!(bit_position(7), (0, 7));
        assert_eq!(bit_position(8), (0, 8));
        assert_eq!(bit_position(17), (1, 1));
        assert_eq!(bit_position(255), (15, 15));
    }

    #[test]
    fn word_bytes_are_low_first() {
        let mut words = [0u16; SAMPLED_PARAMETERS];
        words[0] = 0x1234;
        words[15] = 0xFF00;
        let bytes = bytes_from_words(&words);
        assert_eq!(&bytes[..2], &[0x34, 0x12]);
        assert_eq!(&bytes[30..], &[0x00, 0xFF]);
        assert_eq!(words_from_bytes(&bytes), words);
    }

    #[test]
    fn short_byte_runs_zero_extend() {
        let words = words_from_bytes(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(words[0], 0xBBAA);
        assert_eq!(words[1], 0x00CC);
        assert!(words[2..].iter().all(|w| *w == 0));
    }
}
