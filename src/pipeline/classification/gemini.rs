use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::VisionModel;
use super::ClassificationError;
use crate::config::ClassifierConfig;
use crate::pipeline::import::ImagePayload;

/// Error bodies are cut to this many characters before they reach logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Gemini `generateContent` client for image classification.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_output_tokens: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build a client from config. Endpoint and model name are checked here;
    /// a missing key is reported by `invoke` so it surfaces per request.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassificationError> {
        let base_url = validate_base_url(&config.base_url)?;
        validate_model_name(&config.model)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ClassificationError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClassificationError {
        if e.is_timeout() {
            ClassificationError::Timeout(Duration::from_secs(self.timeout_secs))
        } else if e.is_connect() {
            ClassificationError::Transport(format!("Cannot connect to {}", self.base_url))
        } else {
            ClassificationError::Transport(e.to_string())
        }
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Response body from `generateContent`
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined in order.
    fn into_text(self) -> Result<String, ClassificationError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            ClassificationError::ParseFailure(match block_reason {
                Some(reason) => format!("Model returned no candidates (blocked: {reason})"),
                None => "Model returned no candidates".into(),
            })
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ClassificationError::ParseFailure(format!(
                "Model returned an empty reply (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        prompt: &str,
        payload: &ImagePayload,
    ) -> Result<String, ClassificationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ClassificationError::Configuration(
                "No API key set (GEMINI_API_KEY or API_KEY)".into(),
            )
        })?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: payload.mime_type(),
                            data: payload.base64_data(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        tracing::debug!(
            model = %self.model,
            mime_type = payload.mime_type(),
            image_bytes = payload.byte_len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(match status.as_u16() {
                401 | 403 => ClassificationError::Configuration(format!(
                    "API key rejected (HTTP {})",
                    status.as_u16()
                )),
                code => ClassificationError::Api { status: code, body },
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassificationError::Timeout(Duration::from_secs(self.timeout_secs))
            } else {
                ClassificationError::ParseFailure(format!("Unreadable response body: {e}"))
            }
        })?;

        parsed.into_text()
    }
}

/// Accept `https://`, or plain `http://` on a loopback host. Trailing
/// slashes are dropped.
pub fn validate_base_url(raw: &str) -> Result<String, ClassificationError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| {
        ClassificationError::Configuration(format!("Invalid API base URL '{trimmed}': {e}"))
    })?;

    match url.scheme() {
        "https" => Ok(trimmed.to_string()),
        "http" if url.host_str().is_some_and(is_loopback_host) => Ok(trimmed.to_string()),
        _ => Err(ClassificationError::Configuration(format!(
            "API base URL must use https (http is allowed only for localhost): '{trimmed}'"
        ))),
    }
}

fn is_loopback_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

/// Model names end up in the request path, so only `[A-Za-z0-9._-]` is allowed.
pub fn validate_model_name(model: &str) -> Result<(), ClassificationError> {
    let valid = !model.is_empty()
        && !model.starts_with(['.', '-'])
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ClassificationError::Configuration(format!(
            "Invalid model name '{model}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::MediaSubtype;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-2.0-flash:generateContent";

    fn payload() -> ImagePayload {
        ImagePayload::from_verified_bytes(MediaSubtype::Png, &[0x89, 0x50, 0x4E, 0x47])
    }

    fn config_for(server: &MockServer) -> ClassifierConfig {
        ClassifierConfig {
            base_url: server.uri(),
            ..ClassifierConfig::default()
        }
        .with_api_key("test-key")
    }

    fn reply_with_text(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{
                    "parts": [
                        { "text": "classify" },
                        { "inline_data": { "mime_type": "image/png", "data": "iVBORw==" } }
                    ]
                }],
                "generationConfig": { "maxOutputTokens": 1024 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_text(&["{\"type\":", "\"TRASH\"}"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::from_config(&config_for(&server)).unwrap();
        let reply = client.invoke("classify", &payload()).await.unwrap();
        assert_eq!(reply, "{\"type\":\"TRASH\"}");
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = ClassifierConfig {
            base_url: server.uri(),
            ..ClassifierConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert!(matches!(err, ClassificationError::Configuration(_)));
    }

    #[tokio::test]
    async fn rejected_key_is_configuration_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = GeminiClient::from_config(&config_for(&server)).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert!(matches!(err, ClassificationError::Configuration(_)));
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = GeminiClient::from_config(&config_for(&server)).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert_eq!(
            err,
            ClassificationError::Api {
                status: 503,
                body: "overloaded".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_candidates_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::from_config(&config_for(&server)).unwrap();
        match client.invoke("p", &payload()).await.unwrap_err() {
            ClassificationError::ParseFailure(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn candidate_without_text_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "MAX_TOKENS" }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::from_config(&config_for(&server)).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply_with_text(&["{}"]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ClassifierConfig {
            timeout_secs: 1,
            ..config_for(&server)
        };
        let client = GeminiClient::from_config(&config).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert_eq!(err, ClassificationError::Timeout(Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ClassifierConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            ..ClassifierConfig::default()
        }
        .with_api_key("k");
        let client = GeminiClient::from_config(&config).unwrap();
        let err = client.invoke("p", &payload()).await.unwrap_err();
        assert!(matches!(err, ClassificationError::Transport(_)));
    }

    #[test]
    fn base_url_rules() {
        assert_eq!(
            validate_base_url("https://generativelanguage.googleapis.com/v1beta/").unwrap(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert!(validate_base_url("http://localhost:8080").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080/v1beta").is_ok());
        assert!(validate_base_url("http://[::1]:8080").is_ok());
        assert!(validate_base_url("http://example.com/v1beta").is_err());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn model_name_rules() {
        assert!(validate_model_name("gemini-2.0-flash").is_ok());
        assert!(validate_model_name("gemini_1.5.pro").is_ok());
        assert!(validate_model_name("").is_err());
        assert!(validate_model_name("../admin").is_err());
        assert!(validate_model_name("-flag").is_err());
        assert!(validate_model_name("a b").is_err());
        assert!(validate_model_name("models/x").is_err());
    }

    #[test]
    fn from_config_rejects_bad_settings() {
        let config = ClassifierConfig {
            base_url: "http://example.com".into(),
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(ClassificationError::Configuration(_))
        ));
        let config = ClassifierConfig {
            model: "bad/model".into(),
            ..ClassifierConfig::default()
        };
        assert!(GeminiClient::from_config(&config).is_err());
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::from_config(&ClassifierConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.name(), "gemini-2.0-flash");
    }
}
