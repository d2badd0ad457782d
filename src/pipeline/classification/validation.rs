// Post-parse validation of model replies. Every field is treated as untrusted:
// repairable fields get deterministic fallbacks, the rest fail the call.

use std::str::FromStr;

use serde_json::Value;

use super::explanation::fallback_explanation;
use super::parser::RawReply;
use super::types::{ClassificationResult, Explanations};
use super::ClassificationError;
use crate::models::enums::{DisposalType, Locale};

/// Used when the model's confidence is missing, non-numeric or negative.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Turn raw reply fields into a fully valid result, or fail.
pub fn validate_reply(raw: &RawReply) -> Result<ClassificationResult, ClassificationError> {
    let disposal_type = normalize_type(raw.disposal_type.as_ref())?;
    let item_name = normalize_item_name(raw.item_name.as_ref())?;
    let confidence = normalize_confidence(raw.confidence.as_ref());

    let explanations = Explanations {
        english: normalize_explanation(
            raw.english_explanation.as_ref(),
            Locale::En,
            disposal_type,
            &item_name,
        ),
        urdu: normalize_explanation(
            raw.urdu_explanation.as_ref(),
            Locale::Ur,
            disposal_type,
            &item_name,
        ),
        arabic: normalize_explanation(
            raw.arabic_explanation.as_ref(),
            Locale::Ar,
            disposal_type,
            &item_name,
        ),
    };

    Ok(ClassificationResult::new(
        disposal_type,
        confidence,
        item_name,
        explanations,
    ))
}

/// Case-insensitive match against the four categories.
pub fn normalize_type(value: Option<&Value>) -> Result<DisposalType, ClassificationError> {
    let raw = match value {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ClassificationError::SchemaViolation {
                field: "type",
                value: other.to_string(),
            })
        }
        None => {
            return Err(ClassificationError::SchemaViolation {
                field: "type",
                value: "<missing>".into(),
            })
        }
    };

    DisposalType::from_str(&raw.trim().to_uppercase()).map_err(|_| {
        ClassificationError::SchemaViolation {
            field: "type",
            value: raw.clone(),
        }
    })
}

/// Repair a confidence value into [0, 1], rounded to two decimals.
///
/// Values above 1 are read as percentages (95 → 0.95) before clamping.
pub fn normalize_confidence(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    let mut confidence = match parsed {
        Some(c) if c.is_finite() && c >= 0.0 => c,
        _ => DEFAULT_CONFIDENCE,
    };

    if confidence > 1.0 {
        confidence /= 100.0;
    }

    (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// The item name has no fallback: the explanation templates depend on it.
pub fn normalize_item_name(value: Option<&Value>) -> Result<String, ClassificationError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ClassificationError::MissingField("itemName")),
    }
}

/// Trimmed explanation, or the category template for this locale.
pub fn normalize_explanation(
    value: Option<&Value>,
    locale: Locale,
    disposal_type: DisposalType,
    item_name: &str,
) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback_explanation(locale, disposal_type, item_name),
    }
}
