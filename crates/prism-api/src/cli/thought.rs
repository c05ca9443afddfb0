//! `prism thoughts`: print the most recent entries of the thought log.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use prism_core::repository::thought::ThoughtRepository;

use crate::state::AppState;

pub async fn list_thoughts(state: &AppState, limit: u32, json: bool) -> Result<()> {
    let thoughts = state.dispatcher.thoughts().recent(i64::from(limit)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&thoughts)?);
        return Ok(());
    }

    if thoughts.is_empty() {
        println!();
        println!("  {} No thoughts logged yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Type").fg(Color::White),
        Cell::new("Thought").fg(Color::White),
        Cell::new("Outcome").fg(Color::White),
        Cell::new("Time").fg(Color::White),
    ]);

    for t in &thoughts {
        table.add_row(vec![
            Cell::new(&t.thought_type).fg(Color::Yellow),
            Cell::new(&t.content),
            Cell::new(&t.outcome),
            Cell::new(t.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
