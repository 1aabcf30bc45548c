use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ClassifierError {
    /// An expected snapshot artifact is absent; the proposal is skipped
    SnapshotMissing(String),
    InputError(String),
}

impl ClassifierError {
    fn format_message(&self) -> String {
        match self {
            Self::SnapshotMissing(msg) => format!("Snapshot missing: {}", msg),
            Self::InputError(msg) => format!("Input error: {}", msg),
        }
    }

    pub fn snapshot_missing(msg: impl Into<String>) -> Self {
        let error = Self::SnapshotMissing(msg.into());
        error!("{}", error.format_message());
        error
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        let error = Self::InputError(msg.into());
        error!("{}", error.format_message());
        error
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl Error for ClassifierError {}
