//! `prism identity`: print the trait snapshot.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

pub async fn show_identity(state: &AppState, json: bool) -> Result<()> {
    let traits = state.dispatcher.identity().get_identity().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&traits)?);
        return Ok(());
    }

    if traits.is_empty() {
        println!();
        println!(
            "  {} No identity traits yet. They are written by identity_tracker update_trait.",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Trait").fg(Color::White),
        Cell::new("Confidence").fg(Color::White),
        Cell::new("Value").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for t in &traits {
        table.add_row(vec![
            Cell::new(&t.name).fg(Color::Cyan),
            Cell::new(format!("{:.2}", t.confidence)),
            Cell::new(t.value.to_string()),
            Cell::new(t.last_updated.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
