use savestate_codec::{CodecError, TypeTag};

/// Errors that can occur while packing or unpacking a buffer.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// An instruction has no source object.
    #[error("instruction {index} has no source")]
    MissingSource { index: usize },

    /// An instruction has an empty variable name.
    #[error("instruction {index} has an empty variable name")]
    EmptyVariable { index: usize },

    /// The persisted instruction arrays differ in length.
    #[error(
        "instruction table length mismatch (sources {sources}, variables {variables}, types {types})"
    )]
    LengthMismatch {
        sources: usize,
        variables: usize,
        types: usize,
    },

    /// A variable-width field makes the byte count underivable.
    #[error("instruction {index} has a variable-width type; byte_count must be set explicitly")]
    VariableWidth { index: usize },

    /// A single field failed to encode or decode.
    #[error("field {index} ({variable}): {source}")]
    Field {
        index: usize,
        variable: String,
        #[source]
        source: CodecError,
    },

    /// A buffer does not fit the space reserved for it.
    #[error("buffer of {size} bytes exceeds capacity of {capacity} bytes")]
    CapacityExceeded { size: usize, capacity: usize },

    /// A JSON value could not be converted to the declared type.
    #[error("cannot read {tag} from JSON: {message}")]
    Json { tag: TypeTag, message: String },

    /// Codec-level error outside a specific field.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, BufferError>;
