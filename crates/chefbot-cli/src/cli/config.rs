//! `chefbot config`: print the effective configuration.

use std::path::Path;

use anyhow::Result;
use console::style;

use chefbot_infra::config::CONFIG_FILE;
use chefbot_infra::secret::env::EnvCredentials;
use chefbot_types::config::ChefConfig;

pub fn show_config(
    config: &ChefConfig,
    data_dir: &Path,
    credentials: &EnvCredentials,
    json: bool,
) -> Result<()> {
    let config_path = data_dir.join(CONFIG_FILE);

    if json {
        let out = serde_json::json!({
            "config_path": config_path.display().to_string(),
            "config_exists": config_path.exists(),
            "chat_key_set": credentials.has_chat_key(),
            "image_key_set": credentials.has_image_key(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let set_mark = |ok: bool| {
        if ok {
            format!("{}", style("set").green())
        } else {
            format!("{}", style("missing").red())
        }
    };

    println!();
    println!(
        "  {}  {}{}",
        style("Config file:").bold(),
        style(config_path.display()).dim(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!(
        "  {}  {}",
        style("Chat key:").bold(),
        set_mark(credentials.has_chat_key())
    );
    println!(
        "  {}  {}",
        style("Image key:").bold(),
        set_mark(credentials.has_image_key())
    );
    println!();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
