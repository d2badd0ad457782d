pub mod format;
pub mod payload;
pub mod importer;

pub use format::*;
pub use payload::*;
pub use importer::*;

use thiserror::Error;

use crate::models::enums::MediaSubtype;

/// Why an uploaded file was refused before reaching the model.
#[derive(Error, Debug)]
pub enum RejectionReason {
    #[error("File content is not a recognizable image")]
    NotAnImage,

    #[error("Unsupported file format: {0} (accepted: JPEG, PNG, GIF, WebP)")]
    UnsupportedFormat(String),

    #[error("File too large: {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("File is labelled {declared} but its content is {detected}")]
    SignatureMismatch {
        declared: MediaSubtype,
        detected: MediaSubtype,
    },

    #[error("Could not read file: {0}")]
    ReadFailure(#[from] std::io::Error),
}

/// Ingestion-time failures under their taxonomy name.
pub type ValidationError = RejectionReason;

impl RejectionReason {
    /// Stable code for logs and for the UI message lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnImage => "NOT_AN_IMAGE",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::TooLarge { .. } => "TOO_LARGE",
            Self::SignatureMismatch { .. } => "SIGNATURE_MISMATCH",
            Self::ReadFailure(_) => "READ_FAILURE",
        }
    }
}
