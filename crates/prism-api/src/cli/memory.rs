//! `prism memories`: run a memory retrieval from the command line.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use prism_core::repository::memory::MemoryRepository;
use prism_types::memory::MemoryQuery;
use prism_types::user::UserId;

use crate::state::AppState;

/// List memories for a user, by type or by substring search.
///
/// # Examples
///
/// ```bash
/// prism memories --user +15550100 --type user_preference
/// prism memories --query coffee --json
/// ```
pub async fn list_memories(
    state: &AppState,
    user: Option<String>,
    memory_type: Option<String>,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    let user_id = match user {
        Some(raw) => UserId::new(raw).context("--user must not be blank")?,
        None => state
            .config
            .fallback_user()
            .context("no --user given and no fallback_user_id configured")?,
    };
    let query =
        MemoryQuery::from_parts(memory_type, query).context("pass --type or --query")?;

    let memories = state
        .dispatcher
        .memories()
        .retrieve(&user_id, &query)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&memories)?);
        return Ok(());
    }

    if memories.is_empty() {
        println!();
        println!(
            "  {} No memories for '{}'.",
            style("i").blue().bold(),
            style(&user_id).cyan(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Type").fg(Color::White),
        Cell::new("Content").fg(Color::White),
        Cell::new("Emotion").fg(Color::White),
        Cell::new("Topic").fg(Color::White),
        Cell::new("Date").fg(Color::White),
    ]);

    for mem in &memories {
        let content = mem.content.to_string();
        let content_display = if content.chars().count() > 60 {
            format!("{}...", content.chars().take(57).collect::<String>())
        } else {
            content
        };

        table.add_row(vec![
            Cell::new(&mem.memory_type).fg(Color::Magenta),
            Cell::new(content_display),
            Cell::new(mem.emotion.as_deref().unwrap_or("")),
            Cell::new(mem.topic.as_deref().unwrap_or("")),
            Cell::new(mem.timestamp.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} {} memor{} for {}",
        style("i").blue().bold(),
        memories.len(),
        if memories.len() == 1 { "y" } else { "ies" },
        style(&user_id).cyan(),
    );
    println!();
    Ok(())
}
