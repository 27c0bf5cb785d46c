//! Main chat loop orchestration.
//!
//! Coordinates the session lifecycle: banner, history table, prompt input,
//! slash commands, streamed turns with Ctrl+C cancellation, and artifact
//! cleanup on exit.

use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use chefbot_core::chat::context::ConversationContext;
use chefbot_core::render::RenderSurface;
use chefbot_core::turn::artifacts::ReleaseReport;
use chefbot_core::turn::orchestrator::TurnOrchestrator;
use chefbot_types::config::DisplaySettings;
use chefbot_types::error::RenderError;
use chefbot_types::persona::ChefPersona;

use super::banner::BannerInfo;
use super::commands::{self, ChatCommand};
use super::input::{InputEvent, read_multiline, read_once};
use super::renderer::TerminalRenderer;

struct ChatSession {
    orchestrator: TurnOrchestrator,
    context: ConversationContext,
    renderer: TerminalRenderer,
    display: DisplaySettings,
}

impl ChatSession {
    fn show_history(&self) {
        if self.orchestrator.store().is_empty() {
            println!("\n  {}\n", style("No conversations yet.").dim());
            return;
        }
        let rendered = self
            .renderer
            .render_history(self.orchestrator.store().as_slice(), self.display.history_window);
        if let Some(notice) = render_failure_notice(rendered) {
            println!("{notice}");
        }
    }

    fn show_turn(&self, number: usize) {
        let turn = number
            .checked_sub(1)
            .and_then(|idx| self.orchestrator.store().get(idx));
        match turn {
            Some(turn) => {
                if let Some(notice) = render_failure_notice(self.renderer.render_turn(turn)) {
                    println!("{notice}");
                }
            }
            None => println!("\n  {}\n", style("No conversation found.").yellow()),
        }
    }

    async fn ask(&mut self, prompt: &str) {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });

        let report = self
            .orchestrator
            .run_turn(prompt, &self.context, &self.renderer, &cancel)
            .await;
        watcher.abort();

        self.context.record_turn(&report.turn);
        let model = self.orchestrator.settings().model.clone();
        self.renderer
            .print_stats_footer(&report.turn, report.usage, &model);
        info!(
            turn = self.orchestrator.store().len(),
            interrupted = report.turn.is_interrupted(),
            has_image = report.turn.artifact_path.is_some(),
            "turn recorded"
        );
    }
}

/// Run the interactive chat loop with a chosen chef persona.
pub async fn run_chat_loop(
    orchestrator: TurnOrchestrator,
    persona: &ChefPersona,
    display: DisplaySettings,
) -> anyhow::Result<()> {
    let banner = BannerInfo {
        persona_label: persona.label.to_string(),
        persona_description: persona.description.to_string(),
        model: orchestrator.settings().model.clone(),
    };
    let guard = orchestrator.artifacts().guard();
    let mut session = ChatSession {
        orchestrator,
        context: ConversationContext::for_persona(persona),
        renderer: TerminalRenderer::new(banner, display.clone()),
        display,
    };

    session.renderer.clear_screen()?;
    if !session.orchestrator.images_enabled() {
        println!(
            "  {}\n",
            style("Dish images are off (no STABILITY_KEY or disabled in config).").dim()
        );
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    loop {
        if !session.orchestrator.store().is_empty() {
            session.show_history();
        }

        let text = match read_once(&prompt).await? {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => text,
        };
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::History => session.show_history(),
                ChatCommand::Show(n) => session.show_turn(n),
                ChatCommand::Clear => session.renderer.clear_screen()?,
                ChatCommand::Exit => break,
                ChatCommand::Recipe => {
                    println!(
                        "\n  {}",
                        style("Paste your recipe, then an empty line to send:").dim()
                    );
                    match read_multiline("  | ").await? {
                        Some(recipe) if !recipe.trim().is_empty() => {
                            session.ask(&recipe).await
                        }
                        _ => println!("  {}\n", style("Recipe discarded.").dim()),
                    }
                }
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                }
            }
            continue;
        }

        if let Some(n) = commands::parse_history_selection(&text) {
            session.show_turn(n);
            continue;
        }

        session.ask(&text).await;
    }

    let report = guard.release();
    print_release_failures(&report);
    debug!(removed = report.removed.len(), "session artifacts released");
    println!("\n  {}", style("Thanks for cooking with me! Goodbye!").cyan());
    Ok(())
}

/// Inline line for a failed render; rendering never ends the session.
fn render_failure_notice(result: Result<(), RenderError>) -> Option<String> {
    result
        .err()
        .map(|e| format!("\n  {} {e}", style("!").red().bold()))
}

fn print_release_failures(report: &ReleaseReport) {
    for (path, err) in &report.failed {
        eprintln!(
            "  {} Error deleting {}: {err}",
            style("!").red().bold(),
            path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_is_reported_inline() {
        let notice = render_failure_notice(Err(RenderError::ArtifactMissing(
            "/tmp/dish.png".to_string(),
        )))
        .unwrap();
        assert!(notice.contains("/tmp/dish.png"));
    }

    #[test]
    fn successful_render_has_no_notice() {
        assert!(render_failure_notice(Ok(())).is_none());
    }
}
