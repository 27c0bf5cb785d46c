//! Wiring the turn engine to real providers for a chat session.

use std::sync::Arc;

use anyhow::Context;
use console::style;
use tracing::info;

use chefbot_core::image::box_provider::BoxImageProvider;
use chefbot_core::turn::orchestrator::{TurnOrchestrator, TurnSettings};
use chefbot_core::turn::trigger::KeywordTrigger;
use chefbot_infra::image::stability::StabilityImageProvider;
use chefbot_infra::llm::openai_compat::OpenAiCompatibleProvider;
use chefbot_infra::llm::openai_compat::config::from_settings;
use chefbot_infra::secret::env::{CHAT_KEY_VARS, EnvCredentials};
use chefbot_types::config::ChefConfig;

use super::loop_runner::run_chat_loop;
use crate::cli::chefs::choose_chef;

/// Options from the `chat` subcommand.
pub struct ChatOptions {
    pub chef: Option<usize>,
    pub model: Option<String>,
    pub no_images: bool,
}

/// Build the orchestrator for a session.
///
/// The chat key is required. Images are requested only when enabled in
/// config, not disabled on the command line, and an image key is present.
pub fn build_orchestrator(
    config: &ChefConfig,
    credentials: EnvCredentials,
    no_images: bool,
) -> anyhow::Result<TurnOrchestrator> {
    let chat_key = credentials.chat_api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "{} not set. Export it or add it to a .env file.",
            CHAT_KEY_VARS[0]
        )
    })?;

    let chat = OpenAiCompatibleProvider::new(from_settings(&config.chat, chat_key))
        .context("failed to create chat provider")?;
    let predicate = KeywordTrigger::from_settings(&config.trigger);
    let mut orchestrator = TurnOrchestrator::new(
        Arc::new(chat),
        Arc::new(predicate),
        TurnSettings::from_config(config),
    );

    match credentials.image_api_key {
        Some(key) if config.image.enabled && !no_images => {
            let images = StabilityImageProvider::new(Some(key), config.image.clone());
            orchestrator = orchestrator.with_images(Arc::new(BoxImageProvider::new(images)));
            info!("dish images enabled");
        }
        _ => info!("dish images disabled"),
    }
    Ok(orchestrator)
}

/// Pick a persona and run the chat loop until the user exits.
pub async fn start_chat(
    mut config: ChefConfig,
    credentials: EnvCredentials,
    options: ChatOptions,
) -> anyhow::Result<()> {
    if let Some(model) = options.model {
        config.chat.model = model;
    }
    let orchestrator = build_orchestrator(&config, credentials, options.no_images)?;
    let persona = choose_chef(options.chef)?;
    println!(
        "  {} {}",
        style("Cooking with").dim(),
        style(persona.label).cyan().bold()
    );
    run_chat_loop(orchestrator, persona, config.display).await
}
