//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. A bare number is not a command: the loop
//! treats it as a history selection (see [`parse_history_selection`]).

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Show the recent-turns table.
    History,
    /// Re-display turn N (1-based).
    Show(usize),
    /// Enter a multi-line recipe for critique.
    Recipe,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/history" | "/hist" => Some(ChatCommand::History),
        "/show" => match arg.and_then(parse_history_selection) {
            Some(n) => Some(ChatCommand::Show(n)),
            None => Some(ChatCommand::Unknown(
                "/show requires a turn number".to_string(),
            )),
        },
        "/recipe" => Some(ChatCommand::Recipe),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Interpret input consisting only of digits as a 1-based turn number.
pub fn parse_history_selection(input: &str) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}       {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/history").cyan(), "Show recent conversations");
    println!("  {}     {}", style("/show N").cyan(), "Show conversation N in full");
    println!(
        "  {}     {}",
        style("/recipe").cyan(),
        "Paste a multi-line recipe for critique"
    );
    println!("  {}      {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}       {}", style("/exit").cyan(), "End the session");
    println!();
    println!(
        "  {}",
        style("Type a number to revisit a conversation. Ctrl+C stops an answer, Ctrl+D exits.")
            .dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /q  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn parse_show_with_number() {
        assert_eq!(parse("/show 2"), Some(ChatCommand::Show(2)));
        assert_eq!(parse("/show   12 "), Some(ChatCommand::Show(12)));
    }

    #[test]
    fn parse_show_without_number() {
        assert!(matches!(parse("/show"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/show two"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn parse_recipe_history_clear() {
        assert_eq!(parse("/recipe"), Some(ChatCommand::Recipe));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
    }

    #[test]
    fn parse_not_command() {
        assert_eq!(parse("chicken, rice, saffron"), None);
        assert_eq!(parse("3"), None);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn history_selection_accepts_only_digits() {
        assert_eq!(parse_history_selection("3"), Some(3));
        assert_eq!(parse_history_selection(" 10 "), Some(10));
        assert_eq!(parse_history_selection("3 eggs"), None);
        assert_eq!(parse_history_selection("-1"), None);
        assert_eq!(parse_history_selection(""), None);
    }
}
