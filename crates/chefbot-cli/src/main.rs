//! Chefbot CLI entry point.
//!
//! Binary name: `chefbot`
//!
//! Loads `.env`, parses arguments, sets up tracing, reads configuration and
//! credentials, then dispatches to the chosen command.

mod cli;

use clap::Parser;
use clap_complete::generate;

use chefbot_infra::config::{load_config, resolve_data_dir};
use chefbot_infra::secret::env::EnvCredentials;
use chefbot_observe::tracing_setup::{default_directive, init_tracing, shutdown_tracing};

use cli::chat::setup::{ChatOptions, start_chat};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(default_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let command = cli.command.unwrap_or_else(Commands::default_chat);

    // Shell completions need neither config nor credentials
    if let Commands::Completions { shell } = &command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chefbot", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = cli.data_dir.unwrap_or_else(resolve_data_dir);
    let config = load_config(&data_dir).await;
    let credentials = EnvCredentials::from_env();

    let result = match command {
        Commands::Chat {
            chef,
            model,
            no_images,
        } => {
            start_chat(
                config,
                credentials,
                ChatOptions {
                    chef,
                    model,
                    no_images,
                },
            )
            .await
        }
        Commands::Chefs => cli::chefs::list_chefs(cli.json),
        Commands::Config => cli::config::show_config(&config, &data_dir, &credentials, cli.json),
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
