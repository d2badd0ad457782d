use async_trait::async_trait;
use serde::Serialize;

use super::ClassificationError;
use crate::models::enums::{DisposalType, Locale};
use crate::pipeline::import::ImagePayload;

/// A fully validated classification.
///
/// Built only by `validation::validate_reply`, so every instance has a known
/// type, a confidence in [0, 1] and a non-empty item name and explanations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    disposal_type: DisposalType,
    confidence: f64,
    item_name: String,
    #[serde(flatten)]
    explanations: Explanations,
}

impl ClassificationResult {
    pub(crate) fn new(
        disposal_type: DisposalType,
        confidence: f64,
        item_name: String,
        explanations: Explanations,
    ) -> Self {
        Self {
            disposal_type,
            confidence,
            item_name,
            explanations,
        }
    }

    pub fn disposal_type(&self) -> DisposalType {
        self.disposal_type
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn explanations(&self) -> &Explanations {
        &self.explanations
    }

    /// Explanation in the user's display language.
    pub fn explanation(&self, locale: Locale) -> &str {
        self.explanations.get(locale)
    }
}

/// One explanation per supported locale.
///
/// Parallel fields mirror the model's wire format; a locale-keyed map would
/// replace them if more languages are added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanations {
    #[serde(rename = "englishExplanation")]
    pub english: String,
    #[serde(rename = "urduExplanation")]
    pub urdu: String,
    #[serde(rename = "arabicExplanation")]
    pub arabic: String,
}

impl Explanations {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.english,
            Locale::Ur => &self.urdu,
            Locale::Ar => &self.arabic,
        }
    }
}

/// Remote vision-language model abstraction (allows mocking).
///
/// Implementations send the prompt and the inline image in a single request
/// and return the model's raw reply text, untouched.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider/model label for logs.
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        prompt: &str,
        payload: &ImagePayload,
    ) -> Result<String, ClassificationError>;
}
