use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;
use uuid::Uuid;

use super::cancel::{CancelSignal, CancelToken};
use super::gemini::GeminiClient;
use super::parser::parse_model_reply;
use super::prompt::build_classification_prompt;
use super::types::{ClassificationResult, VisionModel};
use super::validation::validate_reply;
use super::{ClassificationError, ClassificationFailed};
use crate::config::{ClassifierConfig, DEFAULT_TIMEOUT_SECS};
use crate::pipeline::import::ImagePayload;

/// Model calls per classification when replies are unparsable (one retry).
const MAX_PARSE_ATTEMPTS: u32 = 2;

/// Orchestrates one classification:
/// prompt → model → extract JSON → parse (retry once) → validate → result
pub struct ClassificationService {
    model: Arc<dyn VisionModel>,
    timeout: Duration,
}

impl ClassificationService {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Bound on each individual model call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Service backed by the Gemini API.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassificationFailed> {
        let client = GeminiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)).with_timeout(config.timeout()))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify a validated image.
    pub async fn classify(
        &self,
        payload: &ImagePayload,
    ) -> Result<ClassificationResult, ClassificationFailed> {
        self.run(payload, None).await
    }

    /// Like `classify`, aborting with `Cancelled` once `cancel` fires.
    pub async fn classify_with_cancel(
        &self,
        payload: &ImagePayload,
        cancel: &CancelSignal,
    ) -> Result<ClassificationResult, ClassificationFailed> {
        self.run(payload, Some(cancel.token())).await
    }

    async fn run(
        &self,
        payload: &ImagePayload,
        cancel: Option<CancelToken>,
    ) -> Result<ClassificationResult, ClassificationFailed> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "classify_image",
            request_id = %request_id,
            model = self.model.name(),
            mime_type = payload.mime_type(),
            image_bytes = payload.byte_len(),
        );

        async move {
            let started = Instant::now();
            let outcome = self.classify_inner(payload, cancel).await;
            match &outcome {
                Ok(result) => tracing::info!(
                    disposal_type = %result.disposal_type(),
                    confidence = result.confidence(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Classification complete"
                ),
                Err(e) => tracing::error!(
                    kind = ?e.kind(),
                    error = %e,
                    "Classification failed"
                ),
            }
            outcome.map_err(ClassificationFailed::from)
        }
        .instrument(span)
        .await
    }

    async fn classify_inner(
        &self,
        payload: &ImagePayload,
        mut cancel: Option<CancelToken>,
    ) -> Result<ClassificationResult, ClassificationError> {
        let prompt = build_classification_prompt();
        let mut last_error = String::new();

        for attempt in 1..=MAX_PARSE_ATTEMPTS {
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(ClassificationError::Cancelled);
            }

            // An empty model reply is a parse failure too, so it shares the retry.
            let parsed = self
                .invoke_once(&prompt, payload, cancel.as_mut())
                .await
                .and_then(|reply| parse_model_reply(&reply));

            match parsed {
                Ok(raw) => return validate_reply(&raw),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        attempt,
                        max_attempts = MAX_PARSE_ATTEMPTS,
                        error = %e,
                        "Model reply unparsable"
                    );
                    last_error = e.to_string();
                }
                Err(e) => return Err(e),
            }
        }

        Err(ClassificationError::InvalidResponseFormat {
            attempts: MAX_PARSE_ATTEMPTS,
            last_error,
        })
    }

    /// One model call, bounded by the timeout and raced against `cancel`.
    async fn invoke_once(
        &self,
        prompt: &str,
        payload: &ImagePayload,
        cancel: Option<&mut CancelToken>,
    ) -> Result<String, ClassificationError> {
        let call = async {
            tokio::time::timeout(self.timeout, self.model.invoke(prompt, payload))
                .await
                .unwrap_or(Err(ClassificationError::Timeout(self.timeout)))
        };

        match cancel {
            Some(token) => tokio::select! {
                result = call => result,
                () = token.cancelled() => Err(ClassificationError::Cancelled),
            },
            None => call.await,
        }
    }
}
