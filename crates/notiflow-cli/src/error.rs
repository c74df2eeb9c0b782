//! CLI-specific error types and mappings.
//!
//! Maps core errors to exit codes and user-facing messages.

use notiflow_core::{CodecError, OperationError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything that does not fit a more specific category.
    #[error("{0}")]
    Core(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The input document could not be decoded.
    #[error("Invalid document: {0}")]
    Data(String),

    /// The input file does not exist.
    #[error("Cannot open input: {0}")]
    NoInput(String),

    /// IO error while reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Data(_) => 65,     // EX_DATAERR
            Self::NoInput(_) => 66,  // EX_NOINPUT
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        if err.is_data_error() {
            Self::Data(err.to_string())
        } else {
            Self::Core(err.to_string())
        }
    }
}

impl From<OperationError> for CliError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Codec(codec) => codec.into(),
            OperationError::Security(security) => Self::Config(security.to_string()),
            OperationError::MissingPathParam { .. }
            | OperationError::MissingBody { .. }
            | OperationError::UnknownOperation(_)
            | OperationError::Http(_) => Self::Arguments(err.to_string()),
            OperationError::Api { .. } | OperationError::UnexpectedStatus { .. } => {
                Self::Core(err.to_string())
            }
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
