use serde::Deserialize;
use serde_json::Value;

use super::ClassificationError;

/// Fields as the model sent them, before any validation.
///
/// Every field is optional and untyped: the model is a best-effort text
/// generator, so types are checked per field in `validation`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReply {
    #[serde(rename = "type", alias = "category", default)]
    pub disposal_type: Option<Value>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(rename = "itemName", alias = "item_name", default)]
    pub item_name: Option<Value>,
    #[serde(rename = "englishExplanation", alias = "english_explanation", default)]
    pub english_explanation: Option<Value>,
    #[serde(rename = "urduExplanation", alias = "urdu_explanation", default)]
    pub urdu_explanation: Option<Value>,
    #[serde(rename = "arabicExplanation", alias = "arabic_explanation", default)]
    pub arabic_explanation: Option<Value>,
}

/// Parse the model's free-text reply into raw fields.
pub fn parse_model_reply(reply: &str) -> Result<RawReply, ClassificationError> {
    let json_str = extract_json_object(reply)?;
    serde_json::from_str(json_str).map_err(|e| ClassificationError::ParseFailure(e.to_string()))
}

/// Slice from the first `{` to the last `}`.
///
/// Prose or code fences around the object are dropped. Greedy, so
/// nested objects stay intact.
pub fn extract_json_object(reply: &str) -> Result<&str, ClassificationError> {
    let start = reply
        .find('{')
        .ok_or_else(|| ClassificationError::ParseFailure("No JSON object in reply".into()))?;
    let end = reply
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| ClassificationError::ParseFailure("Unclosed JSON object in reply".into()))?;
    Ok(&reply[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let reply = r#"Sure! {"type":"RECYCLE","confidence":0.9,"itemName":"Bottle","englishExplanation":"...","urduExplanation":"...","arabicExplanation":"..."} Hope that helps!"#;
        let raw = parse_model_reply(reply).unwrap();
        assert_eq!(raw.disposal_type, Some(Value::from("RECYCLE")));
        assert_eq!(raw.item_name, Some(Value::from("Bottle")));
    }

    #[test]
    fn extracts_from_markdown_fence() {
        let reply = "```json\n{\"type\": \"TRASH\", \"confidence\": 0.7, \"itemName\": \"Chip bag\"}\n```";
        let raw = parse_model_reply(reply).unwrap();
        assert_eq!(raw.disposal_type, Some(Value::from("TRASH")));
        assert!(raw.urdu_explanation.is_none());
    }

    #[test]
    fn greedy_extraction_keeps_nested_objects() {
        let reply = r#"{"type":"HAZARD","meta":{"source":"x"},"itemName":"Battery"} trailing"#;
        assert_eq!(
            extract_json_object(reply).unwrap(),
            r#"{"type":"HAZARD","meta":{"source":"x"},"itemName":"Battery"}"#
        );
        let raw = parse_model_reply(reply).unwrap();
        assert_eq!(raw.item_name, Some(Value::from("Battery")));
    }

    #[test]
    fn no_braces_is_parse_failure() {
        let err = parse_model_reply("I cannot see any item in this photo.").unwrap_err();
        assert!(matches!(err, ClassificationError::ParseFailure(_)));
    }

    #[test]
    fn reversed_braces_is_parse_failure() {
        let err = extract_json_object("} nothing here {").unwrap_err();
        assert!(matches!(err, ClassificationError::ParseFailure(_)));
    }

    #[test]
    fn malformed_json_is_parse_failure() {
        let err = parse_model_reply("{type: RECYCLE, confidence: high}").unwrap_err();
        assert!(matches!(err, ClassificationError::ParseFailure(_)));
    }

    #[test]
    fn two_objects_with_prose_between_fail_to_parse() {
        let err = parse_model_reply(r#"{"type":"TRASH"} or maybe {"type":"RECYCLE"}"#).unwrap_err();
        assert!(matches!(err, ClassificationError::ParseFailure(_)));
    }

    #[test]
    fn accepts_snake_case_aliases() {
        let raw = parse_model_reply(r#"{"category":"COMPOST","item_name":"Banana peel"}"#).unwrap();
        assert_eq!(raw.disposal_type, Some(Value::from("COMPOST")));
        assert_eq!(raw.item_name, Some(Value::from("Banana peel")));
    }

    #[test]
    fn empty_object_parses_with_no_fields() {
        let raw = parse_model_reply("{}").unwrap();
        assert!(raw.disposal_type.is_none());
        assert!(raw.confidence.is_none());
    }
}
