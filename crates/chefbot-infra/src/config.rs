//! Configuration loader for Chefbot.
//!
//! Reads `config.toml` from the data directory (`~/.chefbot/` by default)
//! and deserializes it into [`ChefConfig`]. Falls back to defaults when the
//! file is missing or malformed, then clamps values the engine cannot use.

use std::path::{Path, PathBuf};

use chefbot_types::config::ChefConfig;
use chefbot_types::error::ConfigError;

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority: `CHEFBOT_DATA_DIR`, then `~/.chefbot`, then `./.chefbot`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHEFBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chefbot");
    }

    PathBuf::from(".chefbot")
}

/// Read and parse `{data_dir}/config.toml` without falling back.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn read_config(data_dir: &Path) -> Result<Option<ChefConfig>, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<ChefConfig>(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: config_path.display().to_string(),
            message: err.to_string(),
        })
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning and uses defaults.
/// - Parsed file: the parsed config.
///
/// The result is always passed through [`sanitize`].
pub async fn load_config(data_dir: &Path) -> ChefConfig {
    let config = match read_config(data_dir).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!(
                "No {CONFIG_FILE} found in {}, using defaults",
                data_dir.display()
            );
            ChefConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            ChefConfig::default()
        }
    };
    sanitize(config)
}

/// Clamp values that would stall or break the turn engine.
pub fn sanitize(mut config: ChefConfig) -> ChefConfig {
    if config.display.refresh_per_second == 0 {
        tracing::warn!("display.refresh_per_second must be at least 1, using 1");
        config.display.refresh_per_second = 1;
    }
    if config.display.ascii_width < 2 {
        tracing::warn!("display.ascii_width must be at least 2, using 2");
        config.display.ascii_width = 2;
    }
    if config.chat.max_tokens == 0 {
        let default = ChefConfig::default().chat.max_tokens;
        tracing::warn!("chat.max_tokens must be positive, using {default}");
        config.chat.max_tokens = default;
    }
    if !config.image.prompt_template.contains("{prompt}") {
        tracing::warn!("image.prompt_template has no {{prompt}} placeholder, appending one");
        config.image.prompt_template.push_str(" {prompt}");
    }
    config
        .trigger
        .keywords
        .retain(|keyword| !keyword.trim().is_empty());
    config
}
