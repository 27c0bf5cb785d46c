//! Environment variable credentials.
//!
//! Each credential has a primary variable and a fallback. Values are read
//! once at startup and wrapped in [`SecretString`] so they never reach a
//! log line. Empty or non-Unicode values count as unset.

use secrecy::SecretString;

/// Primary and fallback variables for the chat API key.
pub const CHAT_KEY_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "API_KEY"];

/// Primary and fallback variables for the image API key.
pub const IMAGE_KEY_VARS: [&str; 2] = ["STABILITY_KEY", "STABILITY_API_KEY"];

/// Credentials resolved from the environment.
pub struct EnvCredentials {
    pub chat_api_key: Option<SecretString>,
    pub image_api_key: Option<SecretString>,
}

impl EnvCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            chat_api_key: first_set(&lookup, &CHAT_KEY_VARS),
            image_api_key: first_set(&lookup, &IMAGE_KEY_VARS),
        }
    }

    pub fn has_chat_key(&self) -> bool {
        self.chat_api_key.is_some()
    }

    pub fn has_image_key(&self) -> bool {
        self.image_api_key.is_some()
    }
}

fn first_set<F>(lookup: &F, names: &[&str]) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    })
}
