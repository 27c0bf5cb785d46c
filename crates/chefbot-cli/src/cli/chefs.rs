//! Chef persona listing and selection.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Select;

use chefbot_types::persona::{ChefPersona, PERSONAS, persona_by_number};

/// Print the persona menu as a table, or JSON with `--json`.
pub fn list_chefs(json: bool) -> Result<()> {
    if json {
        let chefs: Vec<_> = PERSONAS
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                serde_json::json!({
                    "number": idx + 1,
                    "label": p.label,
                    "description": p.description,
                    "cuisine": p.cuisine,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&chefs)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Chef").fg(Color::White),
        Cell::new("Cuisine").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);
    for (idx, p) in PERSONAS.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1).fg(Color::DarkGrey),
            Cell::new(p.label).fg(Color::Cyan),
            Cell::new(p.cuisine),
            Cell::new(p.description).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} Start a chat with one: {}",
        style("i").blue().bold(),
        style("chefbot chat --chef <N>").yellow()
    );
    println!();
    Ok(())
}

/// Resolve the persona for a session.
///
/// An explicit number must exist. Without one the user picks from a menu;
/// dismissing the menu (Esc) keeps the first persona.
pub fn choose_chef(number: Option<usize>) -> Result<&'static ChefPersona> {
    if let Some(n) = number {
        return persona_by_number(n).ok_or_else(|| {
            anyhow::anyhow!(
                "No chef number {n}. Pick 1-{} (see `chefbot chefs`).",
                PERSONAS.len()
            )
        });
    }

    let labels: Vec<&str> = PERSONAS.iter().map(|p| p.label).collect();
    let picked = Select::new()
        .with_prompt("Choose your chef")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(&PERSONAS[picked.unwrap_or(0)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_number_selects_persona() {
        let chef = choose_chef(Some(4)).unwrap();
        assert_eq!(chef.cuisine, "Argentinian");
    }

    #[test]
    fn out_of_range_number_is_an_error() {
        let err = choose_chef(Some(9)).unwrap_err();
        assert!(err.to_string().contains("No chef number 9"));
        assert!(choose_chef(Some(0)).is_err());
    }
}
