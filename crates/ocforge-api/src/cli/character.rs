//! Saved character CLI commands: list, show, delete, export.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use ocforge_infra::filesystem::write_card;
use ocforge_types::character::Character;

use super::{dashboard_error, parse_character_id, spinner, workbench_error};
use crate::state::AppState;

/// List the signed-in user's characters in a table, newest first.
pub async fn list_characters(state: &AppState, json: bool) -> Result<()> {
    let mut dashboard = state.dashboard();
    let characters = dashboard.load().await.map_err(dashboard_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(characters)?);
        return Ok(());
    }

    if characters.is_empty() {
        println!();
        println!(
            "  {} No characters yet. Forge one with: {}",
            style("i").blue().bold(),
            style("ocforge forge").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Traits").fg(Color::White),
        Cell::new("Bio").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for character in characters {
        table.add_row(vec![
            Cell::new(&character.name).fg(Color::Cyan),
            Cell::new(character.keywords.join(", ")).fg(Color::Magenta),
            Cell::new(character.bio.as_deref().unwrap_or("No bio yet")),
            Cell::new(character.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
            Cell::new(character.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} character{}",
        style(characters.len()).bold(),
        if characters.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show one saved character in full.
pub async fn show_character(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_character_id(id)?;
    let workbench = state.open_workbench(&id).await.map_err(workbench_error)?;
    let draft = workbench.draft();

    if json {
        println!("{}", serde_json::to_string_pretty(&workbench.export_snapshot())?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&draft.name).cyan().bold());
    if !draft.keywords.is_empty() {
        println!("  {}", style(draft.keywords.as_slice().join(" · ")).magenta());
    }
    println!();

    println!("  {}", style("── Persona ──").dim());
    if draft.persona.trim().is_empty() {
        println!("  {}", style("(empty)").dim());
    } else {
        for line in draft.persona.lines() {
            println!("  {line}");
        }
    }
    println!();

    println!("  {}", style("── Details ──").dim());
    println!(
        "  {}  {}",
        style("Avatar:").bold(),
        draft.avatar_url.as_deref().unwrap_or("(none)")
    );
    println!("  {}      {}", style("ID:").bold(), style(id.to_string()).dim());
    println!();

    Ok(())
}

/// Delete a saved character with confirmation.
pub async fn delete_character(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_character_id(id)?;
    let mut dashboard = state.dashboard();
    dashboard.load().await.map_err(dashboard_error)?;

    let name = dashboard
        .find(&id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| id.to_string());

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete '{}'?",
                style(&name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let spinner = spinner("red", format!("Deleting {name}..."));
    let result = dashboard.delete(&id).await;
    spinner.finish_and_clear();
    let deleted: Character = result.map_err(dashboard_error)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "id": deleted.id.to_string()})
        );
    } else {
        println!(
            "  {} '{}' deleted. {} left.",
            style("✓").red().bold(),
            deleted.name,
            dashboard.characters().len()
        );
    }

    Ok(())
}

/// Write a saved character's card as `{name}_card.json` into `out`.
pub async fn export_character(state: &AppState, id: &str, out: &Path, json: bool) -> Result<()> {
    let id = parse_character_id(id)?;
    let workbench = state.open_workbench(&id).await.map_err(workbench_error)?;
    let card = workbench.export_snapshot();
    let path = write_card(out, &card).await?;

    if json {
        println!("{}", serde_json::json!({"path": path}));
    } else {
        println!(
            "  {} Exported {} to {}",
            style("✓").green().bold(),
            style(&card.name).cyan(),
            style(path.display()).dim()
        );
    }

    Ok(())
}
