//! IEEE-754 single precision assembled by arithmetic.
//!
//! The storage side of the transport has no bit-cast primitive, so the layout
//! is built and taken apart with multiply/divide-by-two normalization loops.
//! Every step is exact in `f32` arithmetic: halving or doubling a finite
//! value never rounds, and the extracted mantissa is always an integer below
//! 2^23.

pub const SIGN_BIT: u32 = 0x8000_0000;
pub const EXPONENT_MASK: u32 = 0x7F80_0000;
pub const FRACTION_MASK: u32 = 0x007F_FFFF;

/// Canonical NaN: every exponent and fraction bit set, sign clear.
pub const CANONICAL_NAN: u32 = EXPONENT_MASK | FRACTION_MASK;

const EXPONENT_BIAS: i32 = 127;
const MIN_EXPONENT: i32 = -126;
const FRACTION_SCALE: f32 = 8_388_608.0; // 2^23

/// Assemble the bit pattern of `value`.
///
/// All NaNs collapse to [`CANONICAL_NAN`].
pub fn f32_to_bits(value: f32) -> u32 {
    if value.is_nan() {
        return CANONICAL_NAN;
    }

    let mut bits = 0u32;
    if value.is_sign_negative() {
        bits |= SIGN_BIT;
    }
    if value.is_infinite() {
        return bits | EXPONENT_MASK;
    }
    if value == 0.0 {
        return bits;
    }

    let mut magnitude = value.abs();
    let mut exponent = 0i32;
    while magnitude >= 2.0 {
        magnitude *= 0.5;
        exponent += 1;
    }

    let mut normal = true;
    while magnitude < 1.0 {
        if exponent == MIN_EXPONENT {
            normal = false;
            break;
        }
        magnitude *= 2.0;
        exponent -= 1;
    }

    let biased = if normal {
        magnitude -= 1.0;
        (exponent + EXPONENT_BIAS) as u32
    } else {
        0
    };

    bits |= (biased << 23) & EXPONENT_MASK;
    bits |= ((magnitude * FRACTION_SCALE) as u32) & FRACTION_MASK;
    bits
}

/// Disassemble a bit pattern into a value.
pub fn f32_from_bits(bits: u32) -> f32 {
    let negative = bits & SIGN_BIT != 0;
    let biased = ((bits & EXPONENT_MASK) >> 23) as i32;
    let fraction = bits & FRACTION_MASK;

    if biased == 0xFF {
        if fraction != 0 {
            return f32::NAN;
        }
        return if negative {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
    }

    let normal = biased != 0;
    let exponent = if normal {
        biased - EXPONENT_BIAS
    } else {
        MIN_EXPONENT
    };

    let mut result = fraction as f32 / FRACTION_SCALE;
    if normal {
        result += 1.0;
    }
    result *= pow2(exponent);

    if negative {
        -result
    } else {
        result
    }
}

/// 2^exponent for exponents in the normal range, by repeated scaling.
fn pow2(exponent: i32) -> f32 {
    let mut result = 1.0f32;
    if exponent >= 0 {
        for _ in 0..exponent {
            result *= 2.0;
        }
    } else {
        for _ in 0..exponent.unsigned_abs() {
            result *= 0.5;
        }
    }
    result
}
