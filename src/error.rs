//! wllvm error Type

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::constants::GENERIC_FAILURE_EXIT_CODE;

#[derive(Debug, Error)]
pub enum Error {
    /// Unusable configuration: unknown backend, missing prefix, unsupported mode
    #[error("configuration error: {0}")]
    Config(String),
    /// Invalid arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Io error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A child process exited with a non-zero status
    #[error("`{program}` failed with exit code {code}")]
    CommandFailed { program: String, code: i32 },
    /// Configuration file error
    #[error("failed to load configuration file: {0}")]
    ConfigFile(#[from] confy::ConfyError),
    /// String error
    #[error("string error: {0}")]
    StringError(String),
    /// Logger error
    #[error("logger error: {0}")]
    Logger(String),
}

impl Error {
    /// The process exit code this error terminates the wrapper with
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(value: FromUtf8Error) -> Self {
        Self::StringError(format!("{}", value))
    }
}
