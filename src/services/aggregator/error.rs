use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum AggregatorError {
    /// Source and sink totals of a transaction differ beyond tolerance
    ConservationViolation(String),
    InternalError(String),
}

impl AggregatorError {
    fn format_message(&self) -> String {
        match self {
            Self::ConservationViolation(msg) => format!("Conservation violation: {}", msg),
            Self::InternalError(msg) => format!("Internal error: {}", msg),
        }
    }

    pub fn conservation_violation(msg: impl Into<String>) -> Self {
        let error = Self::ConservationViolation(msg.into());
        error!("{}", error.format_message());
        error
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        let error = Self::InternalError(msg.into());
        error!("{}", error.format_message());
        error
    }
}

impl fmt::Display for AggregatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl Error for AggregatorError {}
