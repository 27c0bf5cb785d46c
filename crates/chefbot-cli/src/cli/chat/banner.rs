//! Welcome banner display for chat sessions.

use console::style;

/// What the banner shows about the running session.
#[derive(Debug, Clone)]
pub struct BannerInfo {
    pub persona_label: String,
    pub persona_description: String,
    pub model: String,
}

/// Print the welcome banner at the top of the chat screen.
///
/// Also reprinted after each screen clear, so the persona and model stay
/// visible above every answer.
pub fn print_welcome_banner(info: &BannerInfo) {
    println!();
    println!("  {} {}", style("*").yellow(), style("Chef AI").cyan().bold());
    println!("  {}", style("Hi! I'm your personal chef!").bold());
    println!("  {}", style("Ask me anything about cooking!").dim());
    println!();
    println!(
        "  {}  {}",
        style("Chef:").bold(),
        style(&info.persona_label).cyan()
    );
    println!("  {}", style(&info.persona_description).dim());
    println!("  {}  {}", style("Model:").bold(), style(&info.model).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
