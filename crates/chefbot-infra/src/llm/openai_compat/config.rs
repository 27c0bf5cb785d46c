//! Configuration and defaults for OpenAI-compatible chat providers.
//!
//! OpenRouter is the default endpoint; any service speaking the OpenAI chat
//! completions protocol works by pointing `base_url` at it.

use secrecy::SecretString;

use chefbot_observe::genai_attrs;
use chefbot_types::config::ChatSettings;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
///
/// Does not derive Debug so the key cannot end up in logs.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openrouter", "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://openrouter.ai/api/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model when a request leaves it empty.
    pub model: String,
    /// Extra headers sent on every request (OpenRouter app attribution).
    pub extra_headers: Vec<(String, String)>,
}

/// OpenRouter default configuration.
///
/// Base URL: `https://openrouter.ai/api/v1`
pub fn openrouter_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: genai_attrs::PROVIDER_OPENROUTER.into(),
        base_url: "https://openrouter.ai/api/v1".into(),
        api_key,
        model: model.into(),
        extra_headers: Vec::new(),
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
        extra_headers: Vec::new(),
    }
}

/// Build a configuration from the `[chat]` settings table.
///
/// The provider name is inferred from the base URL; the attribution headers
/// are attached only when set.
pub fn from_settings(settings: &ChatSettings, api_key: SecretString) -> OpenAiCompatConfig {
    let mut config = if settings.base_url.contains("api.openai.com") {
        openai_defaults(api_key, &settings.model)
    } else {
        openrouter_defaults(api_key, &settings.model)
    };
    config.base_url = settings.base_url.trim_end_matches('/').to_string();

    if let Some(referer) = &settings.app_referer {
        config
            .extra_headers
            .push(("HTTP-Referer".into(), referer.clone()));
    }
    if let Some(title) = &settings.app_title {
        config.extra_headers.push(("X-Title".into(), title.clone()));
    }
    config
}
