use crate::type_tag::TypeTag;

/// Errors that can occur during value encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The buffer ended before the field was fully read.
    #[error("unexpected end of buffer ({needed} bytes needed, {remaining} remaining)")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// The value does not match the declared field type.
    #[error("type mismatch (expected {expected}, found {found})")]
    TypeMismatch { expected: TypeTag, found: TypeTag },

    /// A length prefix was negative.
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),

    /// A text field is longer than its length prefix can describe.
    #[error("text too long ({0} bytes)")]
    TextTooLong(usize),

    /// A decimal carried a scale outside 0..=28.
    #[error("invalid decimal scale {0} (max 28)")]
    InvalidDecimalScale(u32),

    /// Decimal text did not parse or does not fit 96 bits.
    #[error("invalid decimal text {0:?}")]
    InvalidDecimalText(String),

    /// A float64 text field did not parse.
    #[error("invalid float64 text {0:?}")]
    InvalidFloatText(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
