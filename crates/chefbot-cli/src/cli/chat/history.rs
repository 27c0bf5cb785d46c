//! Compact table of the most recent turns.

use std::sync::Arc;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

use chefbot_core::chat::store::recent_window;
use chefbot_types::config::DisplaySettings;
use chefbot_types::turn::Turn;

/// Shorten `text` to at most `max_len` characters, ending in "..." when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Collapse newlines so a preview stays on one table row.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the history table for the last `window` turns, numbered from 1.
///
/// Returns `None` when there is nothing to show.
pub fn history_table(
    turns: &[Arc<Turn>],
    window: usize,
    display: &DisplaySettings,
) -> Option<Table> {
    let (start, recent) = recent_window(turns, window);
    if recent.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::DarkGrey),
        Cell::new("Previous Questions").fg(Color::Magenta),
        Cell::new("Preview").fg(Color::Magenta),
    ]);

    for (offset, turn) in recent.iter().enumerate() {
        let mut preview = truncate_text(&single_line(&turn.answer), display.answer_preview_len);
        if turn.is_interrupted() {
            preview.push_str(" (interrupted)");
        }
        table.add_row(vec![
            Cell::new(start + offset + 1).fg(Color::DarkGrey),
            Cell::new(truncate_text(
                &single_line(&turn.prompt),
                display.question_preview_len,
            ))
            .fg(Color::Cyan),
            Cell::new(preview).fg(Color::Green),
        ]);
    }
    Some(table)
}
