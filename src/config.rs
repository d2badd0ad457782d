use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "EcoSort";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted image size: 5 MiB.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Low randomness: the same photo should land in the same bin.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
const MODEL_VAR: &str = "ECOSORT_MODEL";
const API_BASE_VAR: &str = "ECOSORT_API_BASE";
const TIMEOUT_VAR: &str = "ECOSORT_TIMEOUT_SECS";

/// Credential values shipped in templates and `.env.example` files.
const PLACEHOLDER_KEYS: &[&str] = &["placeholder_api_key", "your_api_key", "your-api-key-here"];

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "ecosort=info,ecosort_lib=info,warn"
}

/// Settings for the remote vision model.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// `None` when unset or a known placeholder.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl ClassifierConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests inject a map here).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(*var))
            .find_map(|raw| sanitize_api_key(&raw));

        if let Some(model) = lookup(MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            config.base_url = base.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => tracing::warn!(
                    value = %raw,
                    default = DEFAULT_TIMEOUT_SECS,
                    "Ignoring invalid {TIMEOUT_VAR}"
                ),
            }
        }

        config
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = sanitize_api_key(key);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Trim a credential and drop it if it is empty or a template placeholder.
pub fn sanitize_api_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() {
        return None;
    }
    let lowered = key.to_ascii_lowercase();
    if PLACEHOLDER_KEYS.contains(&lowered.as_str()) {
        return None;
    }
    Some(key.to_string())
}
