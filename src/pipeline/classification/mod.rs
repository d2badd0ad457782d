pub mod types;
pub mod prompt;
pub mod parser;
pub mod validation;
pub mod explanation;
pub mod cancel;
pub mod gemini;
pub mod mock;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use validation::*;
pub use explanation::*;
pub use cancel::*;
pub use gemini::*;
pub use mock::*;
pub use orchestrator::*;

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong between a validated payload and a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Vision model is not configured: {0}")]
    Configuration(String),

    #[error("Could not reach the vision model: {0}")]
    Transport(String),

    #[error("Vision model returned an error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Vision model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Classification was cancelled")]
    Cancelled,

    #[error("Model reply is not parsable: {0}")]
    ParseFailure(String),

    #[error("Model reply stayed unparsable after {attempts} attempts: {last_error}")]
    InvalidResponseFormat { attempts: u32, last_error: String },

    #[error("Model reply has an invalid {field}: '{value}'")]
    SchemaViolation { field: &'static str, value: String },

    #[error("Model reply is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Coarse failure category exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Configuration,
    Transport,
    ParseFailure,
    InvalidResponseFormat,
    SchemaViolation,
    MissingField,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration => "CONFIGURATION",
            Self::Transport => "TRANSPORT",
            Self::ParseFailure => "PARSE_FAILURE",
            Self::InvalidResponseFormat => "INVALID_RESPONSE_FORMAT",
            Self::SchemaViolation => "SCHEMA_VIOLATION",
            Self::MissingField => "MISSING_FIELD",
        }
    }
}

impl ClassificationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Transport(_) | Self::Api { .. } | Self::Timeout(_) | Self::Cancelled => {
                FailureKind::Transport
            }
            Self::ParseFailure(_) => FailureKind::ParseFailure,
            Self::InvalidResponseFormat { .. } => FailureKind::InvalidResponseFormat,
            Self::SchemaViolation { .. } => FailureKind::SchemaViolation,
            Self::MissingField(_) => FailureKind::MissingField,
        }
    }

    /// Only an unparsable reply is worth a fresh model call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ParseFailure(_))
    }
}

/// The single failure surfaced by the classification service.
/// `cause` keeps the underlying error for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Classification failed ({kind:?})")]
pub struct ClassificationFailed {
    pub kind: FailureKind,
    #[source]
    pub cause: ClassificationError,
}

impl From<ClassificationError> for ClassificationFailed {
    fn from(cause: ClassificationError) -> Self {
        Self {
            kind: cause.kind(),
            cause,
        }
    }
}
