//! Application configuration types for Chefbot.
//!
//! `ChefConfig` represents the `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file yields a working setup.
//! The config is read once at startup and treated as immutable afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChefConfig {
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub image: ImageSettings,
    #[serde(default)]
    pub trigger: TriggerSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Chat service endpoint and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Sent as `HTTP-Referer` to OpenRouter for app attribution.
    pub app_referer: Option<String>,
    /// Sent as `X-Title` to OpenRouter for app attribution.
    pub app_title: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: 2048,
            temperature: None,
            app_referer: Some("http://de-ai-course".to_string()),
            app_title: Some("DeAI-Course".to_string()),
        }
    }
}

/// Image service endpoint and generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub enabled: bool,
    pub api_url: String,
    pub cfg_scale: f32,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    /// `{prompt}` is replaced with the turn's prompt text.
    pub prompt_template: String,
    /// Ceiling on how long a finished stream waits for an outstanding image.
    pub artifact_wait_secs: u64,
}

impl ImageSettings {
    pub fn artifact_wait(&self) -> Duration {
        Duration::from_secs(self.artifact_wait_secs)
    }

    pub fn render_prompt(&self, prompt: &str) -> String {
        self.prompt_template.replace("{prompt}", prompt)
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image"
                .to_string(),
            cfg_scale: 7.0,
            steps: 30,
            width: 1024,
            height: 1024,
            prompt_template:
                "Professional food photography of {prompt}, restaurant presentation, soft lighting, 4k"
                    .to_string(),
            artifact_wait_secs: 15,
        }
    }
}

/// How trigger keywords are matched against the streamed answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Case-insensitive match that must not be flanked by alphanumerics.
    WordBoundary,
}

/// Content trigger for the side-channel image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub keywords: Vec<String>,
    pub match_mode: MatchMode,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            keywords: vec!["ingredients".to_string()],
            match_mode: MatchMode::Substring,
        }
    }
}

/// Terminal display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Upper bound on live re-renders per second while streaming.
    pub refresh_per_second: u32,
    /// Number of recent turns shown in the history table.
    pub history_window: usize,
    pub question_preview_len: usize,
    pub answer_preview_len: usize,
    /// Column width of the ASCII image preview.
    pub ascii_width: u32,
}

impl DisplaySettings {
    /// Minimum spacing between partial renders.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.refresh_per_second.max(1)))
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            refresh_per_second: 10,
            history_window: 3,
            question_preview_len: 27,
            answer_preview_len: 37,
            ascii_width: 80,
        }
    }
}
