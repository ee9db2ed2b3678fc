use std::fmt;
use std::io;
use std::path::Path;

use savestate_buffer::BufferError;
use savestate_sequencer::SequencerError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(path: &Path, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{}: {err}", path.display()))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn buffer_error(context: &str, err: BufferError) -> CliError {
    let code = match err {
        BufferError::MissingSource { .. }
        | BufferError::EmptyVariable { .. }
        | BufferError::LengthMismatch { .. }
        | BufferError::VariableWidth { .. } => USAGE,
        BufferError::Field { .. }
        | BufferError::CapacityExceeded { .. }
        | BufferError::Json { .. }
        | BufferError::Codec(_) => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn sequencer_error(context: &str, err: SequencerError) -> CliError {
    match err {
        SequencerError::Buffer(err) => buffer_error(context, err),
        SequencerError::SlotCapacity { .. } => CliError::new(USAGE, format!("{context}: {err}")),
    }
}
