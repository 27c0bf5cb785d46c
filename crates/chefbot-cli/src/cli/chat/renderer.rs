//! Terminal rendering for chat turns.
//!
//! `TerminalRenderer` is the CLI's [`RenderSurface`]. While an answer
//! streams, only the newly arrived suffix is printed raw. Once the turn is
//! finished the screen is cleared and the whole turn is redrawn: question,
//! markdown answer (termimad for prose, syntect for code fences), and the
//! ASCII preview of the dish image when there is one.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use console::style;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use indicatif::{ProgressBar, ProgressStyle};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use chefbot_core::render::RenderSurface;
use chefbot_types::config::DisplaySettings;
use chefbot_types::error::RenderError;
use chefbot_types::llm::Usage;
use chefbot_types::turn::Turn;

use super::ascii::ascii_preview;
use super::banner::{BannerInfo, print_welcome_banner};
use super::history::history_table;

#[derive(Default)]
struct StreamState {
    spinner: Option<ProgressBar>,
    printed: usize,
    header_shown: bool,
}

/// Terminal markdown renderer with syntax highlighting.
pub struct TerminalRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    banner: BannerInfo,
    display: DisplaySettings,
    stream: Mutex<StreamState>,
}

impl TerminalRenderer {
    pub fn new(banner: BannerInfo, display: DisplaySettings) -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[0].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[1].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            banner,
            display,
            stream: Mutex::new(StreamState::default()),
        }
    }

    fn stream_state(&self) -> MutexGuard<'_, StreamState> {
        self.stream.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn stop_spinner(state: &mut StreamState) {
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Clear the terminal and redraw the banner.
    pub fn clear_screen(&self) -> Result<(), RenderError> {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        print_welcome_banner(&self.banner);
        Ok(())
    }

    /// Render a complete markdown answer with syntax-highlighted code blocks.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&format!("{}", self.skin.term_text(line)));
            }
        }

        // Unclosed fence from a cut-off answer
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let Some(theme) = self.theme_set.themes.get("base16-ocean.dark") else {
            return code.to_string();
        };
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            style(format!("--- {lang} ---")).dim()
        ));
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }
        output
    }

    /// Print the stats footer after an answer.
    ///
    /// Format: "| {tokens} tokens . {time}s . {model}", with the token count
    /// left out when the provider did not report usage.
    pub fn print_stats_footer(&self, turn: &Turn, usage: Option<Usage>, model: &str) {
        let seconds = turn.elapsed_ms() as f64 / 1000.0;
        let dot = style("\u{00b7}").dim();
        let mut footer = format!("\n  {}", style("|").dim());
        if let Some(usage) = usage {
            footer.push_str(&format!(
                " {} tokens {dot}",
                style(usage.output_tokens).dim()
            ));
        }
        footer.push_str(&format!(
            " {:.1}s {dot} {}",
            style(seconds).dim(),
            style(model).dim()
        ));
        if turn.is_interrupted() {
            footer.push_str(&format!(" {}", style("(interrupted)").yellow()));
        }
        println!("{footer}");
        println!();
    }
}

impl RenderSurface for TerminalRenderer {
    fn begin_stream(&self) {
        let mut state = self.stream_state();
        Self::stop_spinner(&mut state);
        *state = StreamState::default();

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("Preparing your recipe...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        state.spinner = Some(spinner);
    }

    fn render_partial(&self, text: &str) -> Result<(), RenderError> {
        let mut state = self.stream_state();
        if !state.header_shown {
            Self::stop_spinner(&mut state);
            println!("\n  {}", style("Chef's Response:").cyan().bold());
            state.header_shown = true;
        }

        // A shorter text means a new answer began without begin_stream.
        let suffix = text.get(state.printed..).unwrap_or(text);
        let mut stdout = io::stdout();
        stdout.write_all(suffix.as_bytes())?;
        stdout.flush()?;
        state.printed = text.len();
        Ok(())
    }

    fn render_turn(&self, turn: &Turn) -> Result<(), RenderError> {
        {
            let mut state = self.stream_state();
            Self::stop_spinner(&mut state);
            *state = StreamState::default();
        }

        self.clear_screen()?;
        println!("  {}", style("Question:").green().bold());
        println!("  {}", turn.prompt);
        println!();
        println!("  {}", style("Chef's Response:").cyan().bold());
        print!("{}", self.render_final(&turn.answer));
        if turn.is_interrupted() {
            println!("  {}", style("[answer interrupted]").yellow());
        }

        if let Some(path) = turn.artifact() {
            if let Err(e) = self.render_artifact_preview(path) {
                println!("\n  {} {e}", style("!").red().bold());
            }
        }
        io::stdout().flush()?;
        Ok(())
    }

    fn render_history(&self, turns: &[Arc<Turn>], window: usize) -> Result<(), RenderError> {
        if let Some(table) = history_table(turns, window, &self.display) {
            println!("{table}");
            println!();
        }
        Ok(())
    }

    fn render_artifact_preview(&self, path: &Path) -> Result<(), RenderError> {
        let art = ascii_preview(path, self.display.ascii_width)?;
        println!();
        println!("  {}", style("Dish Image:").magenta().bold());
        print!("{art}");
        println!("  {}", style(format!("file://{}", path.display())).underlined());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TerminalRenderer {
        TerminalRenderer::new(
            BannerInfo {
                persona_label: "Italian pasta chef".into(),
                persona_description: "A seasoned Italian chef".into(),
                model: "openai/gpt-4o-mini".into(),
            },
            DisplaySettings::default(),
        )
    }

    #[test]
    fn render_final_highlights_code_fences() {
        let out = renderer().render_final("Mix well.\n```python\nprint('salt')\n```\n");
        assert!(out.contains("--- python ---"));
        assert!(out.contains("salt"));
    }

    #[test]
    fn render_final_handles_unclosed_fence() {
        let out = renderer().render_final("```\nboil water");
        assert!(out.contains("boil water"));
    }

    #[test]
    fn partial_renders_track_printed_prefix() {
        let r = renderer();
        r.render_partial("Hello").unwrap();
        r.render_partial("Hello, chef").unwrap();
        assert_eq!(r.stream_state().printed, "Hello, chef".len());
        assert!(r.stream_state().header_shown);
    }

    #[test]
    fn missing_artifact_preview_is_an_error() {
        let err = renderer()
            .render_artifact_preview(Path::new("/no/such/dish.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::ArtifactMissing(_)));
    }
}
