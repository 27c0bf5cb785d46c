//! CLI command definitions for the `chefbot` binary.
//!
//! Running `chefbot` with no subcommand starts a chat session.

pub mod chat;
pub mod chefs;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with a personal AI chef.
#[derive(Parser)]
#[command(name = "chefbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding config.toml.
    #[arg(long, env = "CHEFBOT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive cooking chat (the default).
    Chat {
        /// Chef persona number (see `chefbot chefs`); prompts when omitted.
        #[arg(long)]
        chef: Option<usize>,

        /// Override the chat model from config.
        #[arg(long)]
        model: Option<String>,

        /// Never request dish images.
        #[arg(long)]
        no_images: bool,
    },

    /// List the available chef personas.
    Chefs,

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Commands {
    /// The subcommand run when none is given.
    pub fn default_chat() -> Self {
        Commands::Chat {
            chef: None,
            model: None,
            no_images: false,
        }
    }
}
