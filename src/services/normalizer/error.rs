use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NormalizerError {
    FileError(String),
    ParseError(String),
    AmountError(String),
}

impl NormalizerError {
    fn format_message(&self) -> String {
        match self {
            Self::FileError(msg) => format!("File error: {}", msg),
            Self::ParseError(msg) => format!("Parse error: {}", msg),
            Self::AmountError(msg) => format!("Amount error: {}", msg),
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

    pub fn amount_error(msg: impl Into<String>) -> Self {
        let error = Self::AmountError(msg.into());
        error!("{}", error.format_message());
        error
    }
}

impl fmt::Display for NormalizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl Error for NormalizerError {}

impl From<std::io::Error> for NormalizerError {
    fn from(err: std::io::Error) -> Self {
        Self::file_error(err.to_string())
    }
}

impl From<serde_json::Error> for NormalizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

impl From<csv::Error> for NormalizerError {
    fn from(err: csv::Error) -> Self {
        Self::file_error(err.to_string())
    }
}
