//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.
//!
//! `Readline` keeps the terminal in raw mode while it lives, so the loop
//! creates one per read and drops it before streaming an answer. That
//! restores normal output and lets Ctrl+C reach the turn's signal watcher.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    pub fn new(prompt: String) -> Result<Self, ReadlineError> {
        let (rl, _writer) = Readline::new(prompt)?;
        Ok(Self { rl })
    }

    /// Read a line of input.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    self.rl.add_history_entry(trimmed.clone());
                }
                InputEvent::Message(trimmed)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Restore the terminal before output resumes.
    pub fn finish(mut self) {
        let _ = self.rl.flush();
    }
}

/// Read one line with a fresh prompt, releasing the terminal afterwards.
pub async fn read_once(prompt: &str) -> anyhow::Result<InputEvent> {
    let mut input = ChatInput::new(prompt.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let event = input.read_line().await;
    input.finish();
    Ok(event)
}

/// Collect lines until an empty line, then join them with newlines.
///
/// Returns `None` when the user aborts with Ctrl+C or Ctrl+D before
/// finishing.
pub async fn read_multiline(prompt: &str) -> anyhow::Result<Option<String>> {
    let mut lines = Vec::new();
    loop {
        match read_once(prompt).await? {
            InputEvent::Message(line) if line.is_empty() => break,
            InputEvent::Message(line) => lines.push(line),
            InputEvent::Eof | InputEvent::Interrupted => return Ok(None),
        }
    }
    Ok(Some(join_lines(lines)))
}

fn join_lines(lines: Vec<String>) -> String {
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_lines_preserves_order() {
        assert_eq!(
            join_lines(vec!["2 eggs".into(), "200g flour".into()]),
            "2 eggs\n200g flour"
        );
        assert_eq!(join_lines(Vec::new()), "");
    }
}
