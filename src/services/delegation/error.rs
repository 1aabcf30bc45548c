use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum DelegationError {
    FileError(String),
    ParseError(String),
}

impl DelegationError {
    fn format_message(&self) -> String {
        match self {
            Self::FileError(msg) => format!("File error: {}", msg),
            Self::ParseError(msg) => format!("Parse error: {}", msg),
        }
    }

    pub fn file_error(msg: impl Into<String>) -> Self {
        let error = Self::FileError(msg.into());
        error!("{}", error.format_message());
        error
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        let error = Self::ParseError(msg.into());
        error!("{}", error.format_message());
        error
    }
}

impl fmt::Display for DelegationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl Error for DelegationError {}

impl From<std::io::Error> for DelegationError {
    fn from(err: std::io::Error) -> Self {
        Self::file_error(err.to_string())
    }
}

impl From<serde_json::Error> for DelegationError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}
