//! Submission entry point: ingest → classify.
//!
//! Rejected images never reach the model. The model is injected through
//! `ClassificationService`, so the whole flow runs against mocks in tests.

use std::path::Path;

use crate::config::ClassifierConfig;
use crate::pipeline::classification::{
    CancelSignal, ClassificationFailed, ClassificationResult, ClassificationService,
};
use crate::pipeline::import::{ingest_data_url, ingest_file, ImagePayload, RejectionReason};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a submission produced no classification.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Image rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error(transparent)]
    Classification(#[from] ClassificationFailed),
}

impl SubmitError {
    /// Taxonomy code of the underlying failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.code(),
            Self::Classification(failed) => failed.kind.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct WasteClassifier {
    service: ClassificationService,
}

impl WasteClassifier {
    pub fn new(service: ClassificationService) -> Self {
        Self { service }
    }

    /// Classifier backed by the configured remote model.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassificationFailed> {
        Ok(Self::new(ClassificationService::from_config(config)?))
    }

    pub fn service(&self) -> &ClassificationService {
        &self.service
    }

    /// Validate an image file and classify it.
    pub async fn submit_file(
        &self,
        path: &Path,
        declared_type: Option<&str>,
    ) -> Result<ClassificationResult, SubmitError> {
        let payload = ingest_file(path, declared_type)?;
        self.submit_payload(&payload, None).await
    }

    /// Same as `submit_file`, abortable through `cancel`.
    pub async fn submit_file_with_cancel(
        &self,
        path: &Path,
        declared_type: Option<&str>,
        cancel: &CancelSignal,
    ) -> Result<ClassificationResult, SubmitError> {
        let payload = ingest_file(path, declared_type)?;
        self.submit_payload(&payload, Some(cancel)).await
    }

    /// Validate a `data:` URL image and classify it.
    pub async fn submit_data_url(
        &self,
        data_url: &str,
    ) -> Result<ClassificationResult, SubmitError> {
        let payload = ingest_data_url(data_url)?;
        self.submit_payload(&payload, None).await
    }

    async fn submit_payload(
        &self,
        payload: &ImagePayload,
        cancel: Option<&CancelSignal>,
    ) -> Result<ClassificationResult, SubmitError> {
        tracing::info!(
            mime_type = payload.mime_type(),
            image_bytes = payload.byte_len(),
            "Submitting image for classification"
        );
        let result = match cancel {
            Some(signal) => self.service.classify_with_cancel(payload, signal).await?,
            None => self.service.classify(payload).await?,
        };
        Ok(result)
    }
}
