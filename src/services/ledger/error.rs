use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LedgerError {
    /// No target blocks were supplied for a token with transfer history
    MissingTargets(String),
    StorageError(String),
}

impl LedgerError {
    fn format_message(&self) -> String {
        match self {
            Self::MissingTargets(msg) => format!("Missing targets: {}", msg),
            Self::StorageError(msg) => format!("Storage error: {}", msg),
        }
    }

    pub fn missing_targets(msg: impl Into<String>) -> Self {
        let error = Self::MissingTargets(msg.into());
        error!("{}", error.format_message());
        error
    }

    pub fn storage_error(msg: impl Into<String>) -> Self {
        let error = Self::StorageError(msg.into());
        error!("{}", error.format_message());
        error
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl Error for LedgerError {}
